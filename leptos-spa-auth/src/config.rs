use std::time::Duration;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use url::Url;

use crate::validation::{self, ConfigViolation};

/// Environment variable overriding `clientID`.
pub const ENV_CLIENT_ID: &str = "APP_CLIENT_ID";
/// Environment variable overriding `baseUrl`.
pub const ENV_BASE_URL: &str = "APP_BASE_URL";
/// Environment variable overriding `signInRedirectURL`.
pub const ENV_SIGN_IN_REDIRECT_URL: &str = "APP_SIGN_IN_REDIRECT_URL";
/// Environment variable overriding `signOutRedirectURL`.
pub const ENV_SIGN_OUT_REDIRECT_URL: &str = "APP_SIGN_OUT_REDIRECT_URL";

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("ConfigError: Could not parse configuration: {source}"))]
    Parse { source: serde_json::Error },

    #[snafu(display(
        "Configuration validation failed: {}",
        violations.iter().join(", ")
    ))]
    Invalid { violations: Vec<ConfigViolation> },
}

/// Configuration as written in the checked-in JSON file, before validation.
///
/// Every field defaults to an empty value so that a missing field surfaces as a validation
/// error naming that field instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(rename = "clientID")]
    pub client_id: String,

    /// Base URL of the identity provider (tenant), e.g. "https://api.asgardeo.io/t/acme".
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    /// Where the identity provider sends the user after sign-in.
    #[serde(rename = "signInRedirectURL")]
    pub sign_in_redirect_url: String,

    /// Where the user ends up after sign-out.
    #[serde(rename = "signOutRedirectURL")]
    pub sign_out_redirect_url: String,

    pub scope: Vec<String>,

    #[serde(rename = "enableOIDCSessionManagement")]
    pub enable_oidc_session_management: bool,

    /// Check-session iframe poll interval in seconds. Interpreted by the identity client only.
    #[serde(rename = "checkSessionInterval")]
    pub check_session_interval: u64,

    pub environment: String,

    #[serde(flatten)]
    pub features: FeatureFlags,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            base_url: String::new(),
            sign_in_redirect_url: String::new(),
            sign_out_redirect_url: String::new(),
            scope: Vec::new(),
            enable_oidc_session_management: false,
            check_session_interval: 3,
            environment: "production".to_owned(),
            features: FeatureFlags::default(),
        }
    }
}

/// UI feature flags carried along with the auth configuration.
/// Only `enable_debug_mode` is interpreted here (it enables a configuration summary log).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    #[serde(rename = "enableDebugMode")]
    pub enable_debug_mode: bool,
    #[serde(rename = "enableHotReload")]
    pub enable_hot_reload: bool,
    #[serde(rename = "enableErrorBoundary")]
    pub enable_error_boundary: bool,
    #[serde(rename = "enableTypeChecking")]
    pub enable_type_checking: bool,
}

impl AuthConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).context(ParseSnafu {})
    }

    /// Apply overrides found through `lookup`. Overrides take precedence over file values.
    /// Unset or blank values leave the file value in place.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fields: [(&str, &mut String); 4] = [
            (ENV_CLIENT_ID, &mut self.client_id),
            (ENV_BASE_URL, &mut self.base_url),
            (ENV_SIGN_IN_REDIRECT_URL, &mut self.sign_in_redirect_url),
            (ENV_SIGN_OUT_REDIRECT_URL, &mut self.sign_out_redirect_url),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|it| validation::is_not_empty(it)) {
                tracing::trace!(key, "Applying configuration override");
                *field = value;
            }
        }
        self
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn report(&self) -> validation::ValidationReport {
        validation::validate_auth_config(self)
    }

    /// Validate and freeze this configuration. Fails with all violations at once.
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let violations = validation::violations(&self);
        if !violations.is_empty() {
            return Err(InvalidSnafu { violations }.build());
        }

        let parse = |value: &str, violation: ConfigViolation| {
            Url::parse(value).map_err(|_| {
                InvalidSnafu {
                    violations: vec![violation],
                }
                .build()
            })
        };

        let validated = ValidatedConfig {
            client_id: self.client_id.trim().to_owned(),
            base_url: parse(&self.base_url, ConfigViolation::InvalidBaseUrl)?,
            sign_in_redirect_url: parse(
                &self.sign_in_redirect_url,
                ConfigViolation::InvalidSignInRedirectUrl,
            )?,
            sign_out_redirect_url: parse(
                &self.sign_out_redirect_url,
                ConfigViolation::InvalidSignOutRedirectUrl,
            )?,
            scope: self.scope.iter().map(|it| it.trim().to_owned()).collect(),
            enable_oidc_session_management: self.enable_oidc_session_management,
            check_session_interval: Duration::from_secs(self.check_session_interval),
            environment: self.environment,
            features: self.features,
        };

        if validated.features.enable_debug_mode {
            validated.log_summary();
        }

        Ok(validated)
    }
}

/// Parse `json`, apply process-environment overrides and validate.
///
/// This is the usual way to obtain the application's configuration at startup. A failure is
/// meant to be fatal.
pub fn load_config(json: &str) -> Result<ValidatedConfig, ConfigError> {
    AuthConfig::from_json(json)?.with_env_overrides().validate()
}

/// Configuration that passed validation. Immutable for the lifetime of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    client_id: String,
    base_url: Url,
    sign_in_redirect_url: Url,
    sign_out_redirect_url: Url,
    scope: Vec<String>,
    enable_oidc_session_management: bool,
    check_session_interval: Duration,
    environment: String,
    features: FeatureFlags,
}

impl ValidatedConfig {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn sign_in_redirect_url(&self) -> &Url {
        &self.sign_in_redirect_url
    }

    pub fn sign_out_redirect_url(&self) -> &Url {
        &self.sign_out_redirect_url
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Scopes in the space separated form used in authorization requests.
    pub fn scope_string(&self) -> String {
        self.scope.iter().join(" ")
    }

    pub fn enable_oidc_session_management(&self) -> bool {
        self.enable_oidc_session_management
    }

    pub fn check_session_interval(&self) -> Duration {
        self.check_session_interval
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    fn log_summary(&self) {
        tracing::debug!(
            environment = %self.environment,
            client_id = %self.client_id,
            base_url = %self.base_url,
            scope = %self.scope_string(),
            oidc_session_management = self.enable_oidc_session_management,
            check_session_interval = ?self.check_session_interval,
            debug_mode = self.features.enable_debug_mode,
            hot_reload = self.features.enable_hot_reload,
            error_boundary = self.features.enable_error_boundary,
            type_checking = self.features.enable_type_checking,
            "Configuration loaded"
        );
    }
}
