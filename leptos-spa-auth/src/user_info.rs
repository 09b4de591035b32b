use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Basic information about the signed-in user, as reported by the identity client.
///
/// See: <https://openid.net/specs/openid-connect-core-1_0.html#StandardClaims>
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BasicUserInfo {
    /// (sub) Subject identifier. Unique and never reassigned within the issuer.
    pub sub: String,

    /// (name) Full name in displayable form.
    pub name: Option<String>,

    /// (given_name) First name.
    pub given_name: Option<String>,

    /// (family_name) Last name.
    pub family_name: Option<String>,

    /// (email) Preferred email address. Not necessarily unique.
    pub email: Option<String>,

    /// (email_verified) Whether the provider verified `email`.
    pub email_verified: Option<bool>,

    /// (picture) URL of the user's profile picture.
    pub picture: Option<String>,

    /// Everything else the identity client handed us.
    #[serde(flatten)]
    pub additional_claims: HashMap<String, serde_json::Value>,
}

impl BasicUserInfo {
    /// Best available human readable name: `name`, then "given family", then `email`, then `sub`.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|it| !it.trim().is_empty()) {
            return name.to_owned();
        }
        match (self.given_name.as_deref(), self.family_name.as_deref()) {
            (Some(given), Some(family)) => return format!("{given} {family}"),
            (Some(given), None) => return given.to_owned(),
            (None, Some(family)) => return family.to_owned(),
            (None, None) => {}
        }
        self.email.clone().unwrap_or_else(|| self.sub.clone())
    }
}
