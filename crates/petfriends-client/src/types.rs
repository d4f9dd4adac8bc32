// crates/petfriends-client/src/types.rs
// ============================================================================
// Module: PetFriends Types
// Description: Request inputs, raw responses and typed pet documents.
// Purpose: Model what the service accepts and returns without hiding statuses.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`ApiResponse`] is the raw `(status, payload)` pair every operation returns.
//! The payload is JSON when the body parses as JSON and text otherwise; the
//! service answers authorization failures with HTML pages, so both shapes are
//! routine. [`Pet`] and [`PetList`] are typed views decoded on demand.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// List filter selecting every pet on the service.
pub const FILTER_ALL: &str = "";

/// List filter selecting pets owned by the caller.
pub const FILTER_MY_PETS: &str = "my_pets";

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// API key sent in the `auth_key` header.
///
/// # Invariants
/// - `Debug` output never includes the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthKey(String);

impl AuthKey {
    /// Wraps a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Extracts the key from a `GET api/key` response.
    ///
    /// Returns `None` unless the status is 200 and the payload carries a
    /// non-empty string `key` field.
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Option<Self> {
        if response.status != 200 {
            return None;
        }
        response
            .payload
            .field("key")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .map(Self::new)
    }

    /// Returns the raw key for header construction.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthKey").field(&"<redacted>").finish()
    }
}

// ============================================================================
// SECTION: Request Inputs
// ============================================================================

/// Fields submitted when creating or updating a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPet {
    /// Display name.
    pub name: String,
    /// Free-form species or breed.
    pub animal_type: String,
    /// Age as submitted; the service stores it verbatim.
    pub age: String,
}

impl NewPet {
    /// Builds pet fields from anything printable.
    #[must_use]
    pub fn new(name: impl Into<String>, animal_type: impl Into<String>, age: impl ToString) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.to_string(),
        }
    }

    /// Returns the fields as form pairs in submission order.
    #[must_use]
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [("name", &self.name), ("animal_type", &self.animal_type), ("age", &self.age)]
    }
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Body of a service response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum ApiPayload {
    /// Body parsed as JSON.
    Json(Value),
    /// Body that is not JSON (HTML error pages, empty bodies).
    Text(String),
}

impl ApiPayload {
    /// Decodes a response body, preferring JSON.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).map_or_else(
            |_| Self::Text(String::from_utf8_lossy(body).into_owned()),
            Self::Json,
        )
    }

    /// Reports whether `needle` is present in the payload.
    ///
    /// JSON objects match on key presence, JSON arrays on a string element
    /// equal to `needle`, JSON strings and text bodies on substring.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            Self::Json(Value::Object(map)) => map.contains_key(needle),
            Self::Json(Value::Array(items)) => {
                items.iter().any(|item| item.as_str() == Some(needle))
            }
            Self::Json(Value::String(text)) | Self::Text(text) => text.contains(needle),
            Self::Json(_) => false,
        }
    }

    /// Returns a top-level JSON field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Json(Value::Object(map)) => map.get(name),
            _ => None,
        }
    }

    /// Returns the JSON document, if the body was JSON.
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Renders the payload for diagnostics, truncated to `limit` characters.
    #[must_use]
    pub fn excerpt(&self, limit: usize) -> String {
        let rendered = match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        };
        if rendered.chars().count() <= limit {
            return rendered;
        }
        let mut out: String = rendered.chars().take(limit).collect();
        out.push_str("...");
        out
    }
}

/// Status code and payload of one service call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body.
    pub payload: ApiPayload,
}

impl ApiResponse {
    /// Builds a response from raw parts.
    #[must_use]
    pub fn new(status: u16, payload: ApiPayload) -> Self {
        Self {
            status,
            payload,
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes the JSON payload into a typed document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] when the payload is text or does not
    /// match `T`.
    pub fn decode<T: DeserializeOwned>(&self, expected: &'static str) -> Result<T, ClientError> {
        let Some(value) = self.payload.json() else {
            return Err(ClientError::Decode {
                expected,
                message: format!("status {} returned a non-json body", self.status),
            });
        };
        T::deserialize(value).map_err(|err| ClientError::Decode {
            expected,
            message: err.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Pet Documents
// ============================================================================

/// Pet record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pet {
    /// Service-assigned identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Species or breed.
    #[serde(default)]
    pub animal_type: String,
    /// Age; the service emits strings or numbers depending on the endpoint.
    #[serde(default, deserialize_with = "string_or_number")]
    pub age: String,
    /// Photo as a data URI, empty when absent.
    #[serde(default)]
    pub pet_photo: String,
    /// Owner identifier.
    #[serde(default)]
    pub user_id: String,
}

/// Response document of `GET api/pets`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PetList {
    /// Pets matching the filter, newest first.
    pub pets: Vec<Pet>,
}

impl PetList {
    /// Returns true when a pet with `id` is listed.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.pets.iter().any(|pet| pet.id == id)
    }

    /// Returns the first (newest) pet.
    #[must_use]
    pub fn first(&self) -> Option<&Pet> {
        self.pets.first()
    }
}

/// Accepts either a JSON string or a JSON number and yields its text.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("expected string or number, got {other}"))),
    }
}
