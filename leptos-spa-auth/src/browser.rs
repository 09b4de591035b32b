use leptos::prelude::*;
use leptos_router::hooks::use_query;
use leptos_router::params::{ParamsError, ParamsMap};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{AuthorizationCode, CallbackState, SessionState};

/// Query parameters the identity provider appends when redirecting back after sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthorizationCallback {
    pub code: AuthorizationCode,
    pub session_state: Option<SessionState>,
    pub state: Option<CallbackState>,
}

impl leptos_router::params::Params for AuthorizationCallback {
    fn from_map(map: &ParamsMap) -> Result<Self, ParamsError> {
        let Some(code) = map.get("code").filter(|it| !it.is_empty()) else {
            // Expected whenever we are not on a sign-in callback.
            return Err(ParamsError::MissingParam(
                "Missing query parameter 'code'.".to_string(),
            ));
        };

        Ok(AuthorizationCallback {
            code,
            session_state: map.get("session_state"),
            state: map.get("state"),
        })
    }
}

/// The adapter's view of the browser: the current page's query string and the location bar.
pub trait Browser: Send + Sync + 'static {
    /// Callback parameters of the current page, if the page is a sign-in callback.
    fn authorization_callback(&self) -> Option<AuthorizationCallback>;

    /// Navigate the page to `url`.
    fn navigate(&self, url: &Url);
}

/// [`Browser`] reading callback parameters through the Leptos router. Must be created below a
/// `<Router>`.
///
/// Navigation does not go through the router. It always is a full page load, so nothing the
/// identity client kept in memory survives a sign-out.
pub(crate) struct RouterBrowser {
    callback: Memo<Result<AuthorizationCallback, ParamsError>>,
}

impl RouterBrowser {
    pub(crate) fn new() -> Self {
        Self {
            callback: use_query::<AuthorizationCallback>(),
        }
    }
}

impl Browser for RouterBrowser {
    fn authorization_callback(&self) -> Option<AuthorizationCallback> {
        self.callback.get_untracked().ok()
    }

    fn navigate(&self, url: &Url) {
        tracing::trace!(%url, "Navigating");
        if let Err(err) = location().set_href(url.as_str()) {
            tracing::error!(?err, "Could not navigate");
        }
    }
}
