use snafu::Snafu;

use crate::token::IdTokenError;

/// An enumeration representing various authentication-related errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SpaAuthError {
    #[snafu(display("SpaAuthError: Could not initialize identity client: {source}"))]
    Initialize { source: ClientError },

    #[snafu(display("SpaAuthError: Identity client failed to {operation}: {source}"))]
    Client {
        operation: &'static str,
        source: ClientError,
    },

    #[snafu(display("SpaAuthError: Could not decode ID token: {source}"))]
    IdToken { source: IdTokenError },
}

/// Failure reported by the identity client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    /// Machine readable error code, if the client provides one.
    pub code: Option<String>,
    pub message: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ClientError {}
