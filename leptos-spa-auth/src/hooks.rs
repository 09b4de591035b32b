use std::sync::Arc;

use leptos::prelude::*;

use crate::adapter::AuthAdapter;
use crate::browser::{Browser, RouterBrowser};
use crate::client::IdentityClient;
use crate::config::ValidatedConfig;
use crate::internal::client_manager::ClientManager;
use crate::state::SpaAuth;

/// Initializes authentication for this application, using `factory` to create the identity client
/// once it is first needed, and provides the resulting [`SpaAuth`] as context.
///
/// Must be called below a `<Router>`, as callback parameters are read from and navigation is
/// performed through the Leptos router.
///
/// Calling this again below a component that already initialized auth returns the existing
/// instance. There is only ever one identity client per application.
///
/// The existing session is restored (`initialize_auth`) once, on the client.
pub fn init_spa_auth<C: IdentityClient>(
    config: ValidatedConfig,
    factory: impl Fn() -> C + Send + Sync + 'static,
) -> SpaAuth {
    if let Some(auth) = use_context::<SpaAuth>() {
        tracing::trace!("SPA auth already initialized. Reusing it.");
        return auth;
    }

    let browser: Arc<dyn Browser> = Arc::new(RouterBrowser::new());
    init_spa_auth_with_adapter(AuthAdapter::new(
        config,
        ClientManager::new(factory),
        browser,
    ))
}

/// Like [`init_spa_auth`], but with a fully constructed adapter, e.g. one using a custom
/// [`Browser`]. Always provides a new context.
pub fn init_spa_auth_with_adapter<C: IdentityClient>(adapter: AuthAdapter<C>) -> SpaAuth {
    tracing::trace!("Initializing SPA auth...");

    let auth = SpaAuth::new(adapter);

    // Effects only run on the client.
    Effect::new(move |_| {
        untrack(|| auth.initialize_auth());
    });

    provide_context(auth);

    auth
}

/// Get access to the current authentication state.
///
/// Panics if `init_spa_auth` was not called in a parent component.
pub fn use_spa_auth() -> SpaAuth {
    expect_context::<SpaAuth>()
}

/// Get access to the current authentication state, if auth was initialized in a parent component.
pub fn try_use_spa_auth() -> Option<SpaAuth> {
    use_context::<SpaAuth>()
}
