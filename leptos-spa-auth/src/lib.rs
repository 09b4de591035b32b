//! Sign-in, sign-out and session state for Leptos single page applications, backed by an
//! external OpenID Connect client.
//!
//! This crate does not speak OIDC itself. Plug in any client by implementing
//! [`IdentityClient`]. This crate creates and initializes that client once, forwards sign-in and
//! sign-out to it, decodes the ID token for display and mirrors everything into reactive state.
//!
//! ```no_run
//! use leptos::prelude::*;
//! use leptos_router::{path, components::{Route, Router, Routes}};
//! use leptos_spa_auth::components::{AuthCallback, AuthProvider, IdTokenDetails, ShowWhenAuthenticated, SignOut};
//! use leptos_spa_auth::{load_config, use_spa_auth, IdentityClient};
//!
//! # use leptos_spa_auth::{ClientError, SignInOptions, BasicUserInfo, Hook, HookCallback, AuthorizationCallback, JsonObject, ValidatedConfig};
//! # struct MyOidcClient;
//! # impl IdentityClient for MyOidcClient {
//! #     async fn initialize(&self, _: &ValidatedConfig) -> Result<(), ClientError> { Ok(()) }
//! #     async fn is_authenticated(&self) -> Result<bool, ClientError> { Ok(false) }
//! #     async fn basic_user_info(&self) -> Result<BasicUserInfo, ClientError> { Ok(BasicUserInfo::default()) }
//! #     async fn id_token(&self) -> Result<String, ClientError> { Ok(String::new()) }
//! #     async fn decoded_id_token(&self) -> Result<JsonObject, ClientError> { Ok(JsonObject::new()) }
//! #     async fn sign_in(&self, _: SignInOptions, _: Option<AuthorizationCallback>) -> Result<Option<BasicUserInfo>, ClientError> { Ok(None) }
//! #     async fn sign_out(&self) -> Result<bool, ClientError> { Ok(true) }
//! #     fn on(&self, _: Hook, _: HookCallback) {}
//! # }
//! # const AUTH_CONFIG: &str = r#"{
//! #     "clientID": "my-client",
//! #     "baseUrl": "https://idp.example.com/t/acme",
//! #     "signInRedirectURL": "http://localhost:3000/auth/callback",
//! #     "signOutRedirectURL": "http://localhost:3000/",
//! #     "scope": ["openid", "profile"]
//! # }"#;
//! #[component]
//! pub fn App() -> impl IntoView {
//!     // Note: Invalid configuration is fatal. Values can be overridden with
//!     //       APP_CLIENT_ID, APP_BASE_URL, APP_SIGN_IN_REDIRECT_URL and APP_SIGN_OUT_REDIRECT_URL.
//!     let config = load_config(AUTH_CONFIG).expect("valid auth configuration");
//!
//!     view! {
//!         <main>
//!             <Router>
//!                 <AuthProvider config=config factory=|| MyOidcClient>
//!                     <Routes fallback=|| view! { "Page not found." }>
//!                         <Route path=path!("/") view=Home/>
//!                         // Must match the configured `signInRedirectURL`.
//!                         <Route path=path!("/auth/callback") view=|| view! { <AuthCallback/> }/>
//!                         <Route path=path!("/logout") view=SignOut/>
//!                     </Routes>
//!                 </AuthProvider>
//!             </Router>
//!         </main>
//!     }
//! }
//!
//! #[component]
//! pub fn Home() -> impl IntoView {
//!     let auth = use_spa_auth();
//!
//!     view! {
//!         <ShowWhenAuthenticated fallback=move || view! { <button on:click=move |_| auth.sign_in()>"Login"</button> }>
//!             <IdTokenDetails/>
//!             <a href="/logout">"Logout"</a>
//!         </ShowWhenAuthenticated>
//!     }
//! }
//! ```

mod adapter;
mod browser;
mod client;
pub mod components;
mod config;
mod error;
mod hooks;
mod internal;
pub mod messages;
mod state;
mod token;
mod user_info;
pub mod validation;

#[cfg(test)]
mod test_support;

// Library exports (additional to pub modules).
pub use adapter::AuthAdapter;
pub use browser::{AuthorizationCallback, Browser};
pub use client::{Hook, HookCallback, HookEvent, IdentityClient, SignInOptions};
pub use config::*;
pub use error::{ClientError, SpaAuthError};
pub use hooks::*;
pub use internal::client_manager::ClientManager;
pub use state::*;
pub use token::{DerivedAuthState, IdTokenError, IdTokenSegments, JsonObject};
pub use user_info::BasicUserInfo;
pub use validation::{ConfigViolation, ValidationReport, validate_auth_config};
pub mod url {
    pub use url::Url;
}

#[cfg(feature = "internals")]
pub mod internals {
    pub use crate::token::decode_segment;
}

type AuthorizationCode = String;
type SessionState = String;
type CallbackState = String;
