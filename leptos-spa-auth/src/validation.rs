use url::Url;

use crate::config::AuthConfig;

/// Client IDs shipped in configuration templates. Never accepted as a real client ID.
pub const PLACEHOLDER_CLIENT_IDS: &[&str] = &["your-client-id", "your-production-client-id"];

/// Outcome of validating an [`AuthConfig`]. Lists every violation, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// A single rule an [`AuthConfig`] can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigViolation {
    InvalidClientId,
    InvalidBaseUrl,
    InvalidSignInRedirectUrl,
    InvalidSignOutRedirectUrl,
    EmptyScope,
}

impl ConfigViolation {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigViolation::InvalidClientId => "Invalid or missing clientID",
            ConfigViolation::InvalidBaseUrl => "Invalid baseUrl",
            ConfigViolation::InvalidSignInRedirectUrl => "Invalid signInRedirectURL",
            ConfigViolation::InvalidSignOutRedirectUrl => "Invalid signOutRedirectURL",
            ConfigViolation::EmptyScope => "Invalid or empty scope array",
        }
    }
}

impl std::fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `true` if `url` parses as an absolute URL.
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// `true` if `value` contains anything besides whitespace.
pub fn is_not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Loose email shape check: `local@domain.tld`, no whitespace, exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // The domain needs a dot with at least one character on both sides.
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(idx, _)| idx > 0 && idx < domain.len() - 1)
}

pub fn is_valid_client_id(client_id: &str) -> bool {
    is_not_empty(client_id) && !PLACEHOLDER_CLIENT_IDS.contains(&client_id)
}

pub(crate) fn violations(config: &AuthConfig) -> Vec<ConfigViolation> {
    let mut violations = Vec::new();
    if !is_valid_client_id(&config.client_id) {
        violations.push(ConfigViolation::InvalidClientId);
    }
    if !is_valid_url(&config.base_url) {
        violations.push(ConfigViolation::InvalidBaseUrl);
    }
    if !is_valid_url(&config.sign_in_redirect_url) {
        violations.push(ConfigViolation::InvalidSignInRedirectUrl);
    }
    if !is_valid_url(&config.sign_out_redirect_url) {
        violations.push(ConfigViolation::InvalidSignOutRedirectUrl);
    }
    if config.scope.is_empty() {
        violations.push(ConfigViolation::EmptyScope);
    }
    violations
}

/// Check `config` against all rules and report every violation found.
pub fn validate_auth_config(config: &AuthConfig) -> ValidationReport {
    let errors: Vec<String> = violations(config)
        .into_iter()
        .map(|violation| violation.to_string())
        .collect();
    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
