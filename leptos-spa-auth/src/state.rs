use std::sync::Arc;

use leptos::prelude::*;

use crate::adapter::AuthAdapter;
use crate::client::IdentityClient;
use crate::config::ValidatedConfig;
use crate::error::SpaAuthError;
use crate::token::DerivedAuthState;
use crate::user_info::BasicUserInfo;

/// Authentication state as tracked by the [`AuthAdapter`].
#[derive(Debug, Clone)]
pub struct AuthState {
    pub is_authenticated: bool,

    /// `true` while any operation is in flight, and initially until the session was restored.
    pub is_loading: bool,

    /// Error of the last failed operation. Cleared when the next operation starts.
    pub error: Option<Arc<SpaAuthError>>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            is_loading: true,
            error: None,
        }
    }
}

/// Position in the authentication state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Loading,
    Authenticated,
    Unauthenticated,
    Failed,
}

impl From<&AuthState> for AuthStatus {
    fn from(state: &AuthState) -> Self {
        if state.is_loading {
            AuthStatus::Loading
        } else if state.error.is_some() {
            AuthStatus::Failed
        } else if state.is_authenticated {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// The identity client completed the sign-in and user data was loaded.
    Completed,

    /// The identity client was handed an authorization code but did not complete the sign-in.
    Incomplete,

    /// An interactive sign-in was started. The browser is expected to navigate away.
    Redirecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutOutcome {
    /// There was no session to end. Only the redirect was performed.
    NotAuthenticated,

    /// The identity client ended the session.
    SignedOut,

    /// The identity client failed. Local state was cleared and the redirect performed anyway.
    FallbackRedirect,
}

/// The authentication state and operations this library provides.
///
/// Provided as context. Use
/// ```no_run
/// use leptos_spa_auth::use_spa_auth;
///
/// let auth = use_spa_auth();
/// ```
/// to get access to it in any component rendered below the component that called
/// `init_spa_auth` (or rendered an `AuthProvider`).
///
/// All signals are read-only. State only ever changes through the operations below.
#[derive(Clone, Copy)]
pub struct SpaAuth {
    config: StoredValue<ValidatedConfig>,

    pub state: Signal<AuthState>,

    /// User info and decoded ID token. `None` unless signed in and loaded.
    pub derived_state: Signal<Option<DerivedAuthState>>,

    pub is_authenticated: Signal<bool>,

    pub is_loading: Signal<bool>,

    pub error: Signal<Option<Arc<SpaAuthError>>>,

    pub status: Signal<AuthStatus>,

    /// Derived signal giving the signed-in user, if loaded.
    pub user_info: Signal<Option<BasicUserInfo>>,

    sign_in: Action<(), ()>,
    sign_out: Action<(), ()>,
    load_user_data: Action<(), ()>,
    initialize_auth: Action<(), ()>,
}

impl SpaAuth {
    pub(crate) fn new<C: IdentityClient>(adapter: AuthAdapter<C>) -> Self {
        let state = adapter.state();
        let derived_state = adapter.derived_state();
        let status = Memo::new(move |_| state.with(|it| AuthStatus::from(it)));

        Self {
            config: StoredValue::new(adapter.config()),
            state: state.into(),
            derived_state: derived_state.into(),
            is_authenticated: Signal::derive(move || state.with(|it| it.is_authenticated)),
            is_loading: Signal::derive(move || state.with(|it| it.is_loading)),
            error: Signal::derive(move || state.with(|it| it.error.clone())),
            status: status.into(),
            user_info: Signal::derive(move || {
                derived_state.with(|it| it.as_ref().map(|it| it.authenticate_response.clone()))
            }),
            sign_in: Action::new(move |_: &()| async move {
                leptos::task::spawn_local(async move {
                    // Failures are recorded in state.
                    let _ = adapter.sign_in().await;
                });
            }),
            sign_out: Action::new(move |_: &()| async move {
                leptos::task::spawn_local(async move {
                    let outcome = adapter.sign_out().await;
                    tracing::trace!(?outcome, "Sign-out finished");
                });
            }),
            load_user_data: Action::new(move |_: &()| async move {
                leptos::task::spawn_local(async move {
                    adapter.reload_user_data().await;
                });
            }),
            initialize_auth: Action::new(move |_: &()| async move {
                leptos::task::spawn_local(async move {
                    adapter.initialize_auth().await;
                });
            }),
        }
    }

    /// Configuration this auth context was initialized with.
    pub fn config(&self) -> ValidatedConfig {
        self.config.get_value()
    }

    /// Complete a pending sign-in (on the callback route) or start a new one.
    pub fn sign_in(&self) {
        self.sign_in.dispatch(());
    }

    /// End the session and navigate to the sign-out redirect URL.
    pub fn sign_out(&self) {
        self.sign_out.dispatch(());
    }

    /// Reload user info and ID token from the identity client. A failure ends up in `error`.
    pub fn load_user_data(&self) {
        self.load_user_data.dispatch(());
    }

    /// Restore the session from the identity client.
    pub fn initialize_auth(&self) {
        self.initialize_auth.dispatch(());
    }

    /// Returns a reactive function that pretty prints the current authentication state.
    ///
    /// Useful for debugging purposes.
    pub fn state_pretty_printer(&self) -> impl Fn() -> String + use<> {
        let state = self.state;
        let derived_state = self.derived_state;
        move || {
            #[derive(Debug)]
            #[expect(unused)]
            struct Pretty {
                status: AuthStatus,
                error: Option<String>,
                subject: Option<String>,
            }
            let state = state.get();
            format!(
                "SpaAuth {:#?}",
                Pretty {
                    status: AuthStatus::from(&state),
                    error: state.error.as_ref().map(|err| err.to_string()),
                    subject: derived_state
                        .with(|it| it.as_ref().map(|it| it.authenticate_response.sub.clone())),
                }
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assertr::prelude::*;

    use crate::error::{ClientError, SpaAuthError};

    use super::{AuthState, AuthStatus};

    #[test]
    fn initial_state_is_loading() {
        let state = AuthState::default();
        assert_that(state.is_loading).is_true();
        assert_that(state.is_authenticated).is_false();
        assert_that(AuthStatus::from(&state)).is_equal_to(AuthStatus::Loading);
    }

    #[test]
    fn status_prefers_error_over_authentication() {
        let state = AuthState {
            is_authenticated: true,
            is_loading: false,
            error: Some(Arc::new(SpaAuthError::Initialize {
                source: ClientError::new("boom"),
            })),
        };
        assert_that(AuthStatus::from(&state)).is_equal_to(AuthStatus::Failed);

        let state = AuthState {
            error: None,
            ..state
        };
        assert_that(AuthStatus::from(&state)).is_equal_to(AuthStatus::Authenticated);
    }
}
