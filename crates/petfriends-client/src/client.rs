// crates/petfriends-client/src/client.rs
// ============================================================================
// Module: PetFriends HTTP Client
// Description: reqwest-based implementation of the PetApi trait.
// Purpose: Issue one blocking request per operation and capture the response.
// Dependencies: reqwest, tracing, url
// ============================================================================

//! ## Overview
//! [`PetFriendsClient`] maps each [`PetApi`] operation onto the service's
//! REST routes. Keys travel in the `auth_key` header, credentials in the
//! `email`/`password` headers, pet fields as form or multipart bodies.
//! Pet identifiers are appended as a single encoded path segment, so an empty
//! identifier addresses the collection route (`api/pets/`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::path::Path;

use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::multipart::Part;
use tracing::debug;
use url::Url;

use crate::api::PetApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::ApiPayload;
use crate::types::ApiResponse;
use crate::types::AuthKey;
use crate::types::NewPet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the API key.
const AUTH_KEY_HEADER: &str = "auth_key";
/// Multipart field carrying pet photos.
const PHOTO_FIELD: &str = "pet_photo";

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking client for the PetFriends REST API.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    /// Validated connection settings.
    config: ClientConfig,
    /// Shared connection pool.
    http: Client,
}

impl PetFriendsClient {
    /// Creates a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            config,
            http,
        })
    }

    /// Returns the connection settings.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves a path below the service root.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.config
            .base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl(format!("{path}: {err}")))
    }

    /// Resolves `prefix` followed by one encoded pet id segment.
    fn pet_endpoint(&self, prefix: &str, pet_id: &str) -> Result<Url, ClientError> {
        let mut url = self.endpoint(prefix)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{prefix}: url cannot carry a path")))?
            .pop_if_empty()
            .push(pet_id);
        Ok(url)
    }

    /// Sends a request and captures status and body.
    fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        let response = request.send().map_err(|source| ClientError::Transport {
            operation,
            source,
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|source| ClientError::Transport {
            operation,
            source,
        })?;
        debug!(operation, status, body_bytes = body.len(), "petfriends response");
        Ok(ApiResponse::new(status, ApiPayload::from_body(&body)))
    }
}

impl PetApi for PetFriendsClient {
    fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError> {
        let request = self
            .http
            .get(self.endpoint("api/key")?)
            .header("email", email)
            .header("password", password);
        self.execute("get_api_key", request)
    }

    fn list_pets(&self, key: &AuthKey, filter: &str) -> Result<ApiResponse, ClientError> {
        let request = self
            .http
            .get(self.endpoint("api/pets")?)
            .header(AUTH_KEY_HEADER, key.as_str())
            .query(&[("filter", filter)]);
        self.execute("list_pets", request)
    }

    fn add_pet(
        &self,
        key: &AuthKey,
        pet: &NewPet,
        photo: Option<&Path>,
    ) -> Result<ApiResponse, ClientError> {
        let Some(photo) = photo else {
            return self.add_pet_simple(key, pet);
        };
        let form = Form::new()
            .text("name", pet.name.clone())
            .text("animal_type", pet.animal_type.clone())
            .text("age", pet.age.clone())
            .part(PHOTO_FIELD, photo_part(photo)?);
        let request = self
            .http
            .post(self.endpoint("api/pets")?)
            .header(AUTH_KEY_HEADER, key.as_str())
            .multipart(form);
        self.execute("add_pet", request)
    }

    fn add_pet_simple(&self, key: &AuthKey, pet: &NewPet) -> Result<ApiResponse, ClientError> {
        let request = self
            .http
            .post(self.endpoint("api/create_pet_simple")?)
            .header(AUTH_KEY_HEADER, key.as_str())
            .form(&pet.form_fields());
        self.execute("add_pet_simple", request)
    }

    fn update_pet(
        &self,
        key: &AuthKey,
        pet_id: &str,
        pet: &NewPet,
    ) -> Result<ApiResponse, ClientError> {
        let request = self
            .http
            .put(self.pet_endpoint("api/pets/", pet_id)?)
            .header(AUTH_KEY_HEADER, key.as_str())
            .form(&pet.form_fields());
        self.execute("update_pet", request)
    }

    fn delete_pet(&self, key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ClientError> {
        let request = self
            .http
            .delete(self.pet_endpoint("api/pets/", pet_id)?)
            .header(AUTH_KEY_HEADER, key.as_str());
        self.execute("delete_pet", request)
    }

    fn set_photo(
        &self,
        key: &AuthKey,
        pet_id: &str,
        photo: &Path,
    ) -> Result<ApiResponse, ClientError> {
        let form = Form::new().part(PHOTO_FIELD, photo_part(photo)?);
        let request = self
            .http
            .post(self.pet_endpoint("api/pets/set_photo/", pet_id)?)
            .header(AUTH_KEY_HEADER, key.as_str())
            .multipart(form);
        self.execute("set_photo", request)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a photo from disk into a multipart part.
fn photo_part(photo: &Path) -> Result<Part, ClientError> {
    let bytes = std::fs::read(photo).map_err(|source| ClientError::Photo {
        path: photo.to_path_buf(),
        source,
    })?;
    let file_name = photo
        .file_name()
        .map_or_else(|| "photo".to_string(), |name| name.to_string_lossy().into_owned());
    Part::bytes(bytes).file_name(file_name).mime_str(photo_mime(photo)).map_err(|err| {
        ClientError::Photo {
            path: photo.to_path_buf(),
            source: io::Error::other(err),
        }
    })
}

/// Derives the upload MIME type from the file extension.
pub(crate) fn photo_mime(photo: &Path) -> &'static str {
    let extension = photo
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
