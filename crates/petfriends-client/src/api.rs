// crates/petfriends-client/src/api.rs
// ============================================================================
// Module: PetFriends API Interface
// Description: Trait describing the remote operations a suite may call.
// Purpose: Let the harness drive the live client or an in-memory double.
// Dependencies: crate::types
// ============================================================================

//! ## Overview
//! [`PetApi`] is the seam between the test harness and the network. All
//! methods are blocking and return the raw [`ApiResponse`]; callers decide
//! which statuses are acceptable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use crate::error::ClientError;
use crate::types::ApiResponse;
use crate::types::AuthKey;
use crate::types::NewPet;

// ============================================================================
// SECTION: Interface
// ============================================================================

/// Operations exposed by the PetFriends REST API.
pub trait PetApi {
    /// Requests an API key for the given account (`GET api/key`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when no response could be obtained.
    fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError>;

    /// Lists pets, optionally restricted by `filter` (`GET api/pets`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when no response could be obtained.
    fn list_pets(&self, key: &AuthKey, filter: &str) -> Result<ApiResponse, ClientError>;

    /// Creates a pet with an optional photo (`POST api/pets`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the photo cannot be read or no response
    /// could be obtained.
    fn add_pet(
        &self,
        key: &AuthKey,
        pet: &NewPet,
        photo: Option<&Path>,
    ) -> Result<ApiResponse, ClientError>;

    /// Creates a pet without a photo (`POST api/create_pet_simple`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when no response could be obtained.
    fn add_pet_simple(&self, key: &AuthKey, pet: &NewPet) -> Result<ApiResponse, ClientError>;

    /// Replaces the name, type and age of a pet (`PUT api/pets/{id}`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when no response could be obtained.
    fn update_pet(
        &self,
        key: &AuthKey,
        pet_id: &str,
        pet: &NewPet,
    ) -> Result<ApiResponse, ClientError>;

    /// Deletes a pet (`DELETE api/pets/{id}`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when no response could be obtained.
    fn delete_pet(&self, key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ClientError>;

    /// Uploads a photo for an existing pet (`POST api/pets/set_photo/{id}`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the photo cannot be read or no response
    /// could be obtained.
    fn set_photo(
        &self,
        key: &AuthKey,
        pet_id: &str,
        photo: &Path,
    ) -> Result<ApiResponse, ClientError>;
}
