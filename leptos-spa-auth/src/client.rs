use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::browser::AuthorizationCallback;
use crate::config::ValidatedConfig;
use crate::error::ClientError;
use crate::user_info::BasicUserInfo;

/// Lifecycle events of an [`IdentityClient`] that observers can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// The client completed a sign-out.
    SignOut,

    /// The client failed to sign out.
    SignOutFailed,
}

/// Payload handed to a [`HookCallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    SignedOut,
    SignOutFailed(ClientError),
}

pub type HookCallback = Arc<dyn Fn(HookEvent) + Send + Sync>;

/// Extra parameters for an authorization request. Empty by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInOptions {
    /// Additional query parameters appended to the authorization request.
    pub params: HashMap<String, String>,
}

/// An OpenID Connect client performing the actual protocol work: authorization requests, code
/// exchange, PKCE, token storage and session management.
///
/// Implement this for the client SDK used by the application. The adapter only ever calls
/// these methods and never talks to the identity provider itself.
#[allow(async_fn_in_trait)]
pub trait IdentityClient: Send + Sync + 'static {
    /// Prepare the client for use. Called exactly once per client instance.
    async fn initialize(&self, config: &ValidatedConfig) -> Result<(), ClientError>;

    async fn is_authenticated(&self) -> Result<bool, ClientError>;

    async fn basic_user_info(&self) -> Result<BasicUserInfo, ClientError>;

    /// The raw, encoded ID token (`header.payload.signature`).
    async fn id_token(&self) -> Result<String, ClientError>;

    /// The ID token payload as decoded by the client.
    async fn decoded_id_token(&self)
    -> Result<serde_json::Map<String, serde_json::Value>, ClientError>;

    /// Without a `callback`, start an interactive sign-in. This usually redirects the browser
    /// away and never resolves with user info.
    ///
    /// With a `callback`, complete the flow the identity provider redirected back from.
    /// Resolves to the signed-in user, or `None` if the flow did not complete.
    async fn sign_in(
        &self,
        options: SignInOptions,
        callback: Option<AuthorizationCallback>,
    ) -> Result<Option<BasicUserInfo>, ClientError>;

    /// End the session. The client may redirect the browser to the identity provider.
    async fn sign_out(&self) -> Result<bool, ClientError>;

    /// Register `callback` for `hook`, replacing any callback registered before.
    fn on(&self, hook: Hook, callback: HookCallback);
}
