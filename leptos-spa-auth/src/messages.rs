//! Texts rendered by the components in [`crate::components`].

pub const USER_DENIED_LOGOUT: &str = "User denied the logout request";

pub const OAUTH_PROCESSING_FAILED: &str =
    "Logout error: OAuth processing failed. Please try again.";
pub const FAILED_TO_LOAD_USER_DATA: &str = "Failed to load user data";
pub const NO_AUTHORIZATION_CODE: &str = "No authorization code found in URL";
pub const AUTHENTICATION_ERROR: &str = "Authentication error";
pub const LOGOUT_ERROR: &str = "Logout error";
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";
pub const LOGIN_FAILED: &str = "Login failed";

/// Local route the identity provider redirects back to after sign-in.
pub const AUTH_CALLBACK_PATH: &str = "/auth/callback";
pub const HOME_PATH: &str = "/";

pub const PROCESSING_AUTH: &str = "Processing authentication...";
pub const PROCESSING_AUTH_DESCRIPTION: &str =
    "Please wait while we process your authentication response.";
pub const LOGGING_OUT: &str = "Logging out...";
pub const LOGOUT: &str = "Logout";

pub const AUTHENTICATION_RESPONSE: &str = "Authentication Response";
pub const USER_INFORMATION: &str = "User Information";
pub const ID_TOKEN: &str = "ID Token";
pub const ENCODED: &str = "Encoded";
pub const DECODED: &str = "Decoded";
pub const HEADER: &str = "Header";
pub const PAYLOAD: &str = "Payload";
pub const SIGNATURE: &str = "Signature";
pub const GO_BACK_TO_HOME: &str = "Go Back to Home";
pub const TRY_AGAIN: &str = "Try Again";
