//! In-memory identity client and browser used by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use url::Url;

use crate::browser::{AuthorizationCallback, Browser};
use crate::client::{Hook, HookCallback, HookEvent, IdentityClient, SignInOptions};
use crate::config::{AuthConfig, ValidatedConfig};
use crate::error::ClientError;
use crate::token::{self, JsonObject};
use crate::user_info::BasicUserInfo;

pub(crate) fn validated_config() -> ValidatedConfig {
    AuthConfig {
        client_id: "spa-client".to_owned(),
        base_url: "https://idp.example.com/t/acme".to_owned(),
        sign_in_redirect_url: "https://app.example.com/auth/callback".to_owned(),
        sign_out_redirect_url: "https://app.example.com/".to_owned(),
        scope: vec!["openid".to_owned(), "profile".to_owned()],
        ..AuthConfig::default()
    }
    .validate()
    .unwrap()
}

pub(crate) fn user_info() -> BasicUserInfo {
    BasicUserInfo {
        sub: "u-1".to_owned(),
        email: Some("jane@example.com".to_owned()),
        ..BasicUserInfo::default()
    }
}

/// State shared by all clients the factory hands out, standing in for the identity provider.
pub(crate) struct MockIdp {
    pub authenticated: AtomicBool,
    pub complete_sign_in: AtomicBool,
    pub fail_initialize: AtomicBool,
    pub fail_is_authenticated: AtomicBool,
    pub fail_user_info: AtomicBool,
    pub fail_sign_in: AtomicBool,
    pub fail_sign_out: AtomicBool,
    pub id_token: Mutex<String>,
    /// Number of times `sign_in` yields before answering.
    pub sign_in_delay: AtomicUsize,

    pub instances: AtomicUsize,
    pub initialize_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
    pub sign_in_calls: Mutex<Vec<Option<AuthorizationCallback>>>,
    hooks: Mutex<HashMap<Hook, HookCallback>>,
}

impl MockIdp {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            authenticated: AtomicBool::new(false),
            complete_sign_in: AtomicBool::new(true),
            fail_initialize: AtomicBool::new(false),
            fail_is_authenticated: AtomicBool::new(false),
            fail_user_info: AtomicBool::new(false),
            fail_sign_in: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
            id_token: Mutex::new(token::tests::id_token()),
            sign_in_delay: AtomicUsize::new(0),
            instances: AtomicUsize::new(0),
            initialize_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            sign_in_calls: Mutex::new(Vec::new()),
            hooks: Mutex::new(HashMap::new()),
        })
    }

    pub(crate) fn factory(self: &Arc<Self>) -> impl Fn() -> MockClient + Send + Sync + 'static {
        let idp = Arc::clone(self);
        move || {
            idp.instances.fetch_add(1, Ordering::SeqCst);
            MockClient {
                idp: Arc::clone(&idp),
            }
        }
    }

    pub(crate) fn has_hook(&self, hook: Hook) -> bool {
        self.hooks.lock().unwrap().contains_key(&hook)
    }

    pub(crate) fn sign_in_calls(&self) -> Vec<Option<AuthorizationCallback>> {
        self.sign_in_calls.lock().unwrap().clone()
    }

    fn fire(&self, hook: Hook, event: HookEvent) {
        let callback = self.hooks.lock().unwrap().get(&hook).cloned();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    fn check(flag: &AtomicBool, message: &str) -> Result<(), ClientError> {
        match flag.load(Ordering::SeqCst) {
            true => Err(ClientError::new(message)),
            false => Ok(()),
        }
    }
}

pub(crate) struct MockClient {
    idp: Arc<MockIdp>,
}

impl IdentityClient for MockClient {
    async fn initialize(&self, _config: &ValidatedConfig) -> Result<(), ClientError> {
        self.idp.initialize_calls.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to interleave.
        tokio::task::yield_now().await;
        MockIdp::check(&self.idp.fail_initialize, "initialization failed")
    }

    async fn is_authenticated(&self) -> Result<bool, ClientError> {
        MockIdp::check(&self.idp.fail_is_authenticated, "session check failed")?;
        Ok(self.idp.authenticated.load(Ordering::SeqCst))
    }

    async fn basic_user_info(&self) -> Result<BasicUserInfo, ClientError> {
        MockIdp::check(&self.idp.fail_user_info, "user info unavailable")?;
        Ok(user_info())
    }

    async fn id_token(&self) -> Result<String, ClientError> {
        Ok(self.idp.id_token.lock().unwrap().clone())
    }

    async fn decoded_id_token(&self) -> Result<JsonObject, ClientError> {
        Ok(token::tests::decoded_payload())
    }

    async fn sign_in(
        &self,
        _options: SignInOptions,
        callback: Option<AuthorizationCallback>,
    ) -> Result<Option<BasicUserInfo>, ClientError> {
        let completing = callback.is_some();
        self.idp.sign_in_calls.lock().unwrap().push(callback);
        for _ in 0..self.idp.sign_in_delay.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        MockIdp::check(&self.idp.fail_sign_in, "sign-in failed")?;
        if completing && self.idp.complete_sign_in.load(Ordering::SeqCst) {
            self.idp.authenticated.store(true, Ordering::SeqCst);
            return Ok(Some(user_info()));
        }
        Ok(None)
    }

    async fn sign_out(&self) -> Result<bool, ClientError> {
        self.idp.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.idp.fail_sign_out.load(Ordering::SeqCst) {
            let err = ClientError::with_code("SIGN_OUT", "sign-out failed");
            self.idp.fire(Hook::SignOutFailed, HookEvent::SignOutFailed(err.clone()));
            return Err(err);
        }
        self.idp.authenticated.store(false, Ordering::SeqCst);
        self.idp.fire(Hook::SignOut, HookEvent::SignedOut);
        Ok(true)
    }

    fn on(&self, hook: Hook, callback: HookCallback) {
        self.idp.hooks.lock().unwrap().insert(hook, callback);
    }
}

#[derive(Default)]
pub(crate) struct MockBrowser {
    pub callback: Mutex<Option<AuthorizationCallback>>,
    pub navigations: Mutex<Vec<Url>>,
}

impl MockBrowser {
    pub(crate) fn at_callback(code: &str) -> Arc<Self> {
        Arc::new(Self {
            callback: Mutex::new(Some(AuthorizationCallback {
                code: code.to_owned(),
                session_state: Some("session-1".to_owned()),
                state: Some("state-1".to_owned()),
            })),
            navigations: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .unwrap()
            .iter()
            .map(|url| url.to_string())
            .collect()
    }
}

impl Browser for MockBrowser {
    fn authorization_callback(&self) -> Option<AuthorizationCallback> {
        self.callback.lock().unwrap().clone()
    }

    fn navigate(&self, url: &Url) {
        self.navigations.lock().unwrap().push(url.clone());
    }
}
