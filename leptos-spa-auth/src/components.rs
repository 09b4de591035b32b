use leptos::either::EitherOf4;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::client::IdentityClient;
use crate::config::ValidatedConfig;
use crate::messages;
use crate::state::AuthStatus;
use crate::{init_spa_auth, use_spa_auth};

/// Initialize authentication and provide it to child components.
///
/// This component wraps [`init_spa_auth`] with a declarative API. Must be rendered below a
/// `<Router>`.
///
/// # Example
/// ```no_run
/// use leptos::prelude::*;
/// use leptos_router::components::Router;
/// use leptos_spa_auth::components::AuthProvider;
/// use leptos_spa_auth::load_config;
/// # use leptos_spa_auth::{IdentityClient, ClientError, SignInOptions, BasicUserInfo, Hook, HookCallback, AuthorizationCallback, JsonObject, ValidatedConfig};
/// # struct MyOidcClient;
/// # impl IdentityClient for MyOidcClient {
/// #     async fn initialize(&self, _: &ValidatedConfig) -> Result<(), ClientError> { Ok(()) }
/// #     async fn is_authenticated(&self) -> Result<bool, ClientError> { Ok(false) }
/// #     async fn basic_user_info(&self) -> Result<BasicUserInfo, ClientError> { Ok(BasicUserInfo::default()) }
/// #     async fn id_token(&self) -> Result<String, ClientError> { Ok(String::new()) }
/// #     async fn decoded_id_token(&self) -> Result<JsonObject, ClientError> { Ok(JsonObject::new()) }
/// #     async fn sign_in(&self, _: SignInOptions, _: Option<AuthorizationCallback>) -> Result<Option<BasicUserInfo>, ClientError> { Ok(None) }
/// #     async fn sign_out(&self) -> Result<bool, ClientError> { Ok(true) }
/// #     fn on(&self, _: Hook, _: HookCallback) {}
/// # }
///
/// # #[component]
/// # fn Example() -> impl IntoView {
/// let config = load_config(r#"{
///     "clientID": "my-client",
///     "baseUrl": "https://idp.example.com/t/acme",
///     "signInRedirectURL": "http://localhost:3000/auth/callback",
///     "signOutRedirectURL": "http://localhost:3000/",
///     "scope": ["openid", "profile"]
/// }"#).expect("valid auth configuration");
/// view! {
///     <Router>
///         <AuthProvider config=config factory=|| MyOidcClient>
///             <p>"<Routes> and further app content..."</p>
///         </AuthProvider>
///     </Router>
/// }
/// # }
/// ```
#[allow(clippy::must_use_candidate)]
#[component]
pub fn AuthProvider<C, F>(
    /// Validated application configuration, see [`crate::load_config`].
    config: ValidatedConfig,

    /// Creates the identity client. Called once, when the client is first needed.
    factory: F,

    children: Children,
) -> impl IntoView
where
    C: IdentityClient,
    F: Fn() -> C + Send + Sync + 'static,
{
    let _auth = init_spa_auth(config, factory);

    view! {
        { children() }
    }
}

/// Show `children` only when the user is authenticated. Renders `fallback` otherwise.
///
/// # Example
/// ```no_run
/// use leptos::prelude::*;
/// use leptos_spa_auth::components::ShowWhenAuthenticated;
/// use leptos_spa_auth::use_spa_auth;
///
/// # #[component]
/// # fn Component() -> impl IntoView {
/// let auth = use_spa_auth();
/// view! {
///     <ShowWhenAuthenticated fallback=move || view! {
///         <button on:click=move |_| auth.sign_in()>"Login"</button>
///     }>
///         <p>"Your secure content here"</p>
///     </ShowWhenAuthenticated>
/// }
/// # }
/// ```
#[component(transparent)]
#[allow(clippy::must_use_candidate)]
pub fn ShowWhenAuthenticated(
    #[prop(optional, into)] fallback: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = use_spa_auth();

    view! {
        <Show when=move || auth.is_authenticated.get() fallback=fallback>
            { children() }
        </Show>
    }
}

/// Show `children` only when the user is NOT authenticated and no operation is in flight.
/// Renders `fallback` otherwise.
///
/// Useful for login pages or content only visible to guests.
#[component(transparent)]
#[allow(clippy::must_use_candidate)]
pub fn ShowWhenUnauthenticated(
    #[prop(optional, into)] fallback: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = use_spa_auth();

    view! {
        <Show
            when=move || !auth.is_authenticated.get() && !auth.is_loading.get()
            fallback=fallback
        >
            { children() }
        </Show>
    }
}

/// Completes the sign-in when rendered. Render this at the route the identity provider
/// redirects back to (the configured sign-in redirect URL, usually
/// [`AUTH_CALLBACK_PATH`](messages::AUTH_CALLBACK_PATH)).
///
/// Shows a progress message while processing and an error with a retry button on failure.
/// Renders `children` once the user is signed in.
#[component]
#[allow(clippy::must_use_candidate)]
pub fn AuthCallback(#[prop(optional)] children: Option<ChildrenFn>) -> impl IntoView {
    let auth = use_spa_auth();
    let query = use_query_map();
    let has_code = Memo::new(move |_| {
        query
            .read()
            .get("code")
            .is_some_and(|code| !code.is_empty())
    });

    // Only ever on the client.
    Effect::new(move |_| {
        if has_code.get() {
            tracing::trace!("Processing authentication callback...");
            untrack(|| auth.sign_in());
        }
    });

    let retry = move |_: leptos::ev::MouseEvent| auth.sign_in();

    move || {
        if !has_code.get() {
            return EitherOf4::A(view! {
                <CallbackError message=messages::NO_AUTHORIZATION_CODE.to_owned()/>
            });
        }
        match auth.status.get() {
            AuthStatus::Loading => EitherOf4::B(view! {
                <div class="auth-callback">
                    <h2>{ messages::PROCESSING_AUTH }</h2>
                    <p>{ messages::PROCESSING_AUTH_DESCRIPTION }</p>
                </div>
            }),
            AuthStatus::Failed | AuthStatus::Unauthenticated => {
                let message = auth
                    .error
                    .get()
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| messages::LOGIN_FAILED.to_owned());
                EitherOf4::C(view! {
                    <CallbackError message=message/>
                    <button on:click=retry>{ messages::TRY_AGAIN }</button>
                })
            }
            AuthStatus::Authenticated => EitherOf4::D(children.as_ref().map(|children| children())),
        }
    }
}

#[component]
fn CallbackError(message: String) -> impl IntoView {
    view! {
        <div class="auth-callback auth-error">
            <h2>{ messages::AUTHENTICATION_ERROR }</h2>
            <p>{ message }</p>
            <a href={ messages::HOME_PATH }>{ messages::GO_BACK_TO_HOME }</a>
        </div>
    }
}

/// Immediately signs the user out when rendered.
///
/// You may use this in your router and render it as the only component when the user hits
/// the local "/logout" path. The user always ends up at the configured sign-out redirect URL,
/// even if the identity client fails to end the session.
#[component]
#[allow(clippy::must_use_candidate)]
pub fn SignOut() -> impl IntoView {
    let auth = use_spa_auth();

    // The session MUST only be ended on the client, not on the server.
    Effect::new(move |_| {
        tracing::trace!("Logging out...");
        untrack(|| auth.sign_out());
    });

    view! {
        <div class="auth-sign-out">
            <p>{ messages::LOGGING_OUT }</p>
        </div>
    }
}

/// Displays the signed-in user's info and their ID token, encoded and decoded.
///
/// Renders nothing while no token data is loaded.
#[component]
#[allow(clippy::must_use_candidate)]
pub fn IdTokenDetails() -> impl IntoView {
    let auth = use_spa_auth();

    move || {
        auth.derived_state.get().map(|derived| {
            let user_info = pretty(&derived.authenticate_response);
            let header = pretty(&derived.decoded_id_token_header);
            let payload = pretty(&derived.decoded_id_token_payload);
            let segments = derived.id_token;

            view! {
                <section class="auth-user-info">
                    <h2>{ messages::AUTHENTICATION_RESPONSE }</h2>
                    <h3>{ messages::USER_INFORMATION }</h3>
                    <pre>{ user_info }</pre>
                </section>

                <section class="auth-id-token">
                    <h2>{ messages::ID_TOKEN }</h2>

                    <h3>{ messages::ENCODED }</h3>
                    <code class="id-token-encoded">
                        <span class="id-token-header">{ segments.header }</span>
                        "."
                        <span class="id-token-payload">{ segments.payload }</span>
                        "."
                        <span class="id-token-signature">{ segments.signature.clone() }</span>
                    </code>

                    <h3>{ messages::DECODED }</h3>
                    <h4>{ messages::HEADER }</h4>
                    <pre class="id-token-header">{ header }</pre>
                    <h4>{ messages::PAYLOAD }</h4>
                    <pre class="id-token-payload">{ payload }</pre>
                    <h4>{ messages::SIGNATURE }</h4>
                    <code class="id-token-signature">{ segments.signature }</code>
                </section>
            }
        })
    }
}

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
