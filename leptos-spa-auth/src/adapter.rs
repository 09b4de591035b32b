use std::sync::Arc;

use leptos::prelude::*;
use snafu::ResultExt;

use crate::browser::Browser;
use crate::client::{Hook, HookEvent, IdentityClient, SignInOptions};
use crate::config::ValidatedConfig;
use crate::error::{ClientSnafu, IdTokenSnafu, InitializeSnafu, SpaAuthError};
use crate::internal::client_manager::ClientManager;
use crate::state::{AuthState, SignInOutcome, SignOutOutcome};
use crate::token::DerivedAuthState;

/// Drives sign-in, sign-out and session loading through an [`IdentityClient`] and mirrors the
/// results into reactive state.
///
/// The adapter is the only writer of its state. Everything else reads it through the signals
/// returned by [`AuthAdapter::state`] and [`AuthAdapter::derived_state`].
pub struct AuthAdapter<C: IdentityClient> {
    config: StoredValue<ValidatedConfig>,
    clients: StoredValue<ClientManager<C>>,
    browser: StoredValue<Arc<dyn Browser>>,
    state: RwSignal<AuthState>,
    derived_state: RwSignal<Option<DerivedAuthState>>,

    /// Number of operations in flight. `is_loading` is only reset once this drops to zero.
    in_flight: StoredValue<usize>,
}

impl<C: IdentityClient> Clone for AuthAdapter<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: IdentityClient> Copy for AuthAdapter<C> {}

impl<C: IdentityClient> AuthAdapter<C> {
    pub fn new(
        config: ValidatedConfig,
        clients: ClientManager<C>,
        browser: Arc<dyn Browser>,
    ) -> Self {
        Self {
            config: StoredValue::new(config),
            clients: StoredValue::new(clients),
            browser: StoredValue::new(browser),
            state: RwSignal::new(AuthState::default()),
            derived_state: RwSignal::new(None),
            in_flight: StoredValue::new(0),
        }
    }

    pub fn config(&self) -> ValidatedConfig {
        self.config.get_value()
    }

    pub fn state(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    pub fn derived_state(&self) -> ReadSignal<Option<DerivedAuthState>> {
        self.derived_state.read_only()
    }

    #[cfg(feature = "internals")]
    pub fn client_manager(&self) -> ClientManager<C> {
        self.clients.get_value()
    }

    /// The initialized identity client. Initializes it on first use. Safe to call concurrently.
    pub async fn initialize(&self) -> Result<Arc<C>, SpaAuthError> {
        let clients = self.clients.get_value();
        let config = self.config.get_value();
        clients
            .get_or_initialize(&config)
            .await
            .context(InitializeSnafu {})
    }

    /// Restore the session state from the identity client, e.g. on application start.
    ///
    /// Never fails. Errors end up in the state's `error` field.
    pub async fn initialize_auth(&self) {
        self.begin_operation();

        let result = async {
            let client = self.initialize().await?;
            let is_authenticated = client.is_authenticated().await.context(ClientSnafu {
                operation: "check authentication",
            })?;
            tracing::trace!(is_authenticated, "Restored authentication status");
            self.state
                .update(|state| state.is_authenticated = is_authenticated);
            if is_authenticated {
                self.load_user_data().await?;
            }
            Ok::<(), SpaAuthError>(())
        }
        .await;

        if let Err(err) = &result {
            tracing::error!(%err, "Error initializing auth");
        }
        self.finish_operation(result.err().map(Arc::new));
    }

    /// Complete a sign-in the identity provider redirected back from, or start a new one.
    ///
    /// If the current URL carries an authorization `code`, the code is handed to the identity
    /// client to complete the flow. Otherwise, an interactive sign-in is started, which is
    /// expected to navigate away from the application.
    pub async fn sign_in(&self) -> Result<SignInOutcome, Arc<SpaAuthError>> {
        self.begin_operation();

        let result = self.perform_sign_in().await.map_err(Arc::new);

        if let Err(err) = &result {
            tracing::error!(%err, "Sign-in failed");
        }
        self.finish_operation(result.as_ref().err().cloned());
        result
    }

    async fn perform_sign_in(&self) -> Result<SignInOutcome, SpaAuthError> {
        let client = self.initialize().await?;
        let callback = self
            .browser
            .with_value(|browser| browser.authorization_callback());

        let completing = callback.is_some();
        if completing {
            tracing::trace!("Completing sign-in with authorization code");
        } else {
            tracing::trace!("Starting interactive sign-in");
        }

        let user_info = client
            .sign_in(SignInOptions::default(), callback)
            .await
            .context(ClientSnafu {
                operation: match completing {
                    true => "complete sign-in",
                    false => "start sign-in",
                },
            })?;

        match (user_info, completing) {
            (Some(_), _) => {
                self.load_user_data().await?;
                self.state.update(|state| state.is_authenticated = true);
                tracing::trace!("Sign-in completed");
                Ok(SignInOutcome::Completed)
            }
            (None, true) => {
                tracing::trace!("Identity client did not complete the sign-in");
                Ok(SignInOutcome::Incomplete)
            }
            (None, false) => Ok(SignInOutcome::Redirecting),
        }
    }

    /// End the session and navigate to the configured sign-out redirect URL.
    ///
    /// Always ends up unauthenticated with the redirect performed. Failures of the identity
    /// client are recorded in the state's `error` field.
    pub async fn sign_out(&self) -> SignOutOutcome {
        self.begin_operation();

        let (outcome, error) = match self.perform_sign_out().await {
            Ok(outcome) => (outcome, None),
            Err(err) => {
                tracing::error!(%err, "Sign-out failed, falling back to redirect");
                self.clear_session();
                self.redirect_after_sign_out();
                (SignOutOutcome::FallbackRedirect, Some(Arc::new(err)))
            }
        };

        self.finish_operation(error);
        outcome
    }

    async fn perform_sign_out(&self) -> Result<SignOutOutcome, SpaAuthError> {
        let client = self.initialize().await?;
        let is_authenticated = client.is_authenticated().await.context(ClientSnafu {
            operation: "check authentication",
        })?;

        if !is_authenticated {
            tracing::trace!("Not authenticated, only redirecting");
            self.clear_session();
            self.redirect_after_sign_out();
            return Ok(SignOutOutcome::NotAuthenticated);
        }

        let this = *self;
        client.on(
            Hook::SignOut,
            Arc::new(move |_| {
                tracing::trace!("Sign-out hook triggered, clearing local session");
                this.clear_session();
            }),
        );
        client.on(
            Hook::SignOutFailed,
            Arc::new(move |event| {
                if let HookEvent::SignOutFailed(source) = event {
                    tracing::error!(err = %source, "Sign-out failed hook triggered");
                    this.state.update(|state| {
                        state.error = Some(Arc::new(SpaAuthError::Client {
                            operation: "sign out",
                            source,
                        }));
                    });
                }
            }),
        );

        client
            .sign_out()
            .await
            .context(ClientSnafu { operation: "sign out" })?;

        // Identity clients that redirect on their own never get here.
        self.clear_session();
        self.redirect_after_sign_out();
        Ok(SignOutOutcome::SignedOut)
    }

    /// Fetch user info and ID token from the identity client and rebuild the derived state.
    ///
    /// Does not touch the state's `error` field. Callers decide what a failure means.
    pub async fn load_user_data(&self) -> Result<(), SpaAuthError> {
        let result = async {
            let client = self.initialize().await?;
            let user_info = client.basic_user_info().await.context(ClientSnafu {
                operation: "load user info",
            })?;
            let id_token = client.id_token().await.context(ClientSnafu {
                operation: "load ID token",
            })?;
            let payload = client.decoded_id_token().await.context(ClientSnafu {
                operation: "decode ID token",
            })?;
            DerivedAuthState::new(user_info, &id_token, payload).context(IdTokenSnafu {})
        }
        .await;

        match result {
            Ok(derived) => {
                self.derived_state.set(Some(derived));
                Ok(())
            }
            Err(err) => {
                tracing::error!(%err, "Error loading user data");
                Err(err)
            }
        }
    }

    /// [`AuthAdapter::load_user_data`], recording a failure in the state's `error` field.
    pub(crate) async fn reload_user_data(&self) {
        if let Err(err) = self.load_user_data().await {
            self.record_error(err);
        }
    }

    pub(crate) fn record_error(&self, err: SpaAuthError) {
        self.state.update(|state| state.error = Some(Arc::new(err)));
    }

    fn begin_operation(&self) {
        self.in_flight.update_value(|count| *count += 1);
        self.state.update(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    fn finish_operation(&self, error: Option<Arc<SpaAuthError>>) {
        self.in_flight
            .update_value(|count| *count = count.saturating_sub(1));
        let still_running = self.in_flight.with_value(|count| *count > 0);
        self.state.update(|state| {
            state.is_loading = still_running;
            if error.is_some() {
                state.error = error;
            }
        });
    }

    fn clear_session(&self) {
        self.state.update(|state| state.is_authenticated = false);
        self.derived_state.set(None);
    }

    fn redirect_after_sign_out(&self) {
        let url = self
            .config
            .with_value(|config| config.sign_out_redirect_url().clone());
        self.browser.with_value(|browser| browser.navigate(&url));
    }
}
