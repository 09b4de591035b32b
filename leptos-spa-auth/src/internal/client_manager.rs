use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::client::{Hook, HookEvent, IdentityClient};
use crate::config::ValidatedConfig;
use crate::error::ClientError;

/// Owns the application's single identity client and initializes it at most once.
///
/// The client is created lazily through the factory given on construction. Concurrent first
/// callers of [`ClientManager::get_or_initialize`] wait for the one ongoing initialization
/// instead of starting their own. A failed initialization leaves the manager empty, so a later
/// call retries with a fresh client instance.
///
/// Needed to construct an [`AuthAdapter`](crate::AuthAdapter) by hand. The manager of a running
/// adapter is only reachable through the `internals` feature flag, for testing or debugging.
pub struct ClientManager<C: IdentityClient> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    factory: Box<dyn Fn() -> C + Send + Sync>,
    client: OnceCell<Arc<C>>,
}

impl<C: IdentityClient> Clone for ClientManager<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: IdentityClient> Debug for ClientManager<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientManager")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl<C: IdentityClient> ClientManager<C> {
    pub fn new(factory: impl Fn() -> C + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                factory: Box::new(factory),
                client: OnceCell::new(),
            }),
        }
    }

    /// The initialized client. Creates and initializes it with `config` on first use.
    pub async fn get_or_initialize(&self, config: &ValidatedConfig) -> Result<Arc<C>, ClientError> {
        self.inner
            .client
            .get_or_try_init(|| async {
                tracing::trace!("Creating identity client");
                let client = Arc::new((self.inner.factory)());

                client.on(
                    Hook::SignOut,
                    Arc::new(|_| tracing::trace!("Sign-out hook triggered")),
                );
                client.on(
                    Hook::SignOutFailed,
                    Arc::new(|event| {
                        if let HookEvent::SignOutFailed(err) = event {
                            tracing::error!(%err, "Sign-out failed hook triggered");
                        }
                    }),
                );

                match client.initialize(config).await {
                    Ok(()) => {
                        tracing::trace!(client_id = %config.client_id(), "Identity client initialized");
                        Ok(client)
                    }
                    Err(err) => {
                        tracing::error!(%err, "Could not initialize identity client");
                        Err(err)
                    }
                }
            })
            .await
            .cloned()
    }

    /// The client, if it was successfully initialized before.
    pub fn get(&self) -> Option<Arc<C>> {
        self.inner.client.get().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.client.initialized()
    }
}
