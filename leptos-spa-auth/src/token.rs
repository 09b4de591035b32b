use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use time::OffsetDateTime;

use crate::user_info::BasicUserInfo;

pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// JWT segments are base64url encoded. Padding is usually stripped, but we accept it.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum IdTokenError {
    #[snafu(display("IdTokenError: Expected 3 dot-separated segments, got {segments}"))]
    Malformed { segments: usize },

    #[snafu(display("IdTokenError: Segment is not valid base64url: {source}"))]
    Base64 { source: base64::DecodeError },

    #[snafu(display("IdTokenError: Segment is not valid JSON: {source}"))]
    Json { source: serde_json::Error },

    #[snafu(display("IdTokenError: Segment is not a JSON object"))]
    NotAnObject,

    #[snafu(display("IdTokenError: Could not read header: {source}"))]
    Header {
        source: jsonwebtoken::errors::Error,
    },
}

/// The three dot-separated segments of an encoded ID token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenSegments {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

impl IdTokenSegments {
    pub fn split(id_token: &str) -> Result<Self, IdTokenError> {
        let segments = id_token.split('.').collect::<Vec<_>>();
        let [header, payload, signature] = segments.as_slice() else {
            return MalformedSnafu {
                segments: segments.len(),
            }
            .fail();
        };
        Ok(Self {
            header: (*header).to_owned(),
            payload: (*payload).to_owned(),
            signature: (*signature).to_owned(),
        })
    }

    /// The encoded token these segments were split from.
    pub fn raw(&self) -> String {
        format!("{}.{}.{}", self.header, self.payload, self.signature)
    }

    pub fn as_array(&self) -> [&str; 3] {
        [&self.header, &self.payload, &self.signature]
    }
}

/// Decode a single base64url JSON segment (header or payload) into a JSON object.
pub fn decode_segment(segment: &str) -> Result<JsonObject, IdTokenError> {
    let bytes = BASE64_URL.decode(segment).context(Base64Snafu {})?;
    match serde_json::from_slice(&bytes).context(JsonSnafu {})? {
        serde_json::Value::Object(object) => Ok(object),
        _ => NotAnObjectSnafu {}.fail(),
    }
}

/// Everything we know about the signed-in user, derived from what the identity client returned.
/// Meant for display. Nothing in here was verified by us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedAuthState {
    pub authenticate_response: BasicUserInfo,

    pub id_token: IdTokenSegments,

    pub decoded_id_token_header: JsonObject,

    /// Payload as decoded by the identity client.
    pub decoded_id_token_payload: JsonObject,

    #[serde(with = "time::serde::rfc3339")]
    pub loaded_at: OffsetDateTime,
}

impl DerivedAuthState {
    pub(crate) fn new(
        user_info: BasicUserInfo,
        id_token: &str,
        decoded_id_token_payload: JsonObject,
    ) -> Result<Self, IdTokenError> {
        let id_token = IdTokenSegments::split(id_token)?;
        let decoded_id_token_header = decode_segment(&id_token.header)?;
        Ok(Self {
            authenticate_response: user_info,
            id_token,
            decoded_id_token_header,
            decoded_id_token_payload,
            loaded_at: OffsetDateTime::now_utc(),
        })
    }

    /// The header as typed by `jsonwebtoken`. Fails for algorithms it does not know.
    pub fn typed_header(&self) -> Result<jsonwebtoken::Header, IdTokenError> {
        jsonwebtoken::decode_header(&self.id_token.raw()).context(HeaderSnafu {})
    }

    /// (exp) claim of the payload.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.timestamp_claim("exp")
    }

    /// (iat) claim of the payload.
    pub fn issued_at(&self) -> Option<OffsetDateTime> {
        self.timestamp_claim("iat")
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    fn timestamp_claim(&self, claim: &str) -> Option<OffsetDateTime> {
        self.decoded_id_token_payload
            .get(claim)
            .and_then(serde_json::Value::as_i64)
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
    }
}
