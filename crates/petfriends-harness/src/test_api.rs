// crates/petfriends-harness/src/test_api.rs
// ============================================================================
// Module: In-Memory PetApi
// Description: Scripted PetApi implementation for harness unit tests.
// Purpose: Exercise fixtures, steps and the runner without a network.
// Dependencies: petfriends-client, serde_json
// ============================================================================

//! ## Overview
//! [`FakePetApi`] keeps pets in memory and answers like the remote service:
//! 403 for unknown credentials or keys, 500 for unknown filters and 404 for
//! an empty pet id. Every call is recorded by operation name.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only helpers favor direct unwrap/expect for clarity."
)]

use std::cell::Cell;
use std::cell::RefCell;
use std::path::Path;

use petfriends_client::ApiPayload;
use petfriends_client::ApiResponse;
use petfriends_client::AuthKey;
use petfriends_client::ClientError;
use petfriends_client::FILTER_ALL;
use petfriends_client::FILTER_MY_PETS;
use petfriends_client::NewPet;
use petfriends_client::PetApi;
use serde_json::Value;
use serde_json::json;

/// Email accepted by the fake.
pub const FAKE_EMAIL: &str = "owner@example.test";
/// Password accepted by the fake.
pub const FAKE_PASSWORD: &str = "hunter2";
/// Key issued for the accepted account.
pub const FAKE_KEY: &str = "fake-key-0001";

/// In-memory stand-in for the PetFriends service.
#[derive(Default)]
pub struct FakePetApi {
    /// Refuse every call as if the service were unreachable.
    offline: bool,
    /// Issue 200 without a `key` field.
    keyless: bool,
    /// Stored pets, newest first.
    pets: RefCell<Vec<Value>>,
    /// Next pet number.
    next_id: Cell<usize>,
    /// Operation names in call order.
    calls: RefCell<Vec<&'static str>>,
}

impl FakePetApi {
    /// Creates a reachable fake with no pets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with a client error.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Makes the key request succeed without returning a key.
    pub fn keyless() -> Self {
        Self {
            keyless: true,
            ..Self::default()
        }
    }

    /// Stores a pet and returns its id.
    pub fn seed(&self, name: &str) -> String {
        self.store(&NewPet::new(name, "cat", 3))
    }

    /// Returns recorded operation names.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    /// Returns the number of stored pets.
    pub fn pet_count(&self) -> usize {
        self.pets.borrow().len()
    }

    /// Records a call and fails when offline.
    fn enter(&self, operation: &'static str) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(operation);
        if self.offline {
            return Err(ClientError::InvalidUrl("service offline".to_string()));
        }
        Ok(())
    }

    /// Adds a pet document and returns its id.
    fn store(&self, pet: &NewPet) -> String {
        let number = self.next_id.get() + 1;
        self.next_id.set(number);
        let id = format!("pet-{number}");
        let document = json!({
            "id": id,
            "name": pet.name,
            "animal_type": pet.animal_type,
            "age": pet.age,
            "pet_photo": "",
            "user_id": "owner",
        });
        self.pets.borrow_mut().insert(0, document);
        id
    }

    /// Returns the stored document of `id`.
    fn find(&self, id: &str) -> Option<Value> {
        self.pets.borrow().iter().find(|pet| pet["id"] == id).cloned()
    }
}

/// Builds a JSON response.
fn json_response(status: u16, value: Value) -> ApiResponse {
    ApiResponse::new(status, ApiPayload::Json(value))
}

/// Builds a text response.
fn text_response(status: u16, text: &str) -> ApiResponse {
    ApiResponse::new(status, ApiPayload::Text(text.to_string()))
}

/// Response to calls made with an unknown key.
fn forbidden() -> ApiResponse {
    text_response(403, "<title>403 Forbidden</title>")
}

impl PetApi for FakePetApi {
    fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError> {
        self.enter("get_api_key")?;
        if email != FAKE_EMAIL || password != FAKE_PASSWORD {
            return Ok(forbidden());
        }
        if self.keyless {
            return Ok(json_response(200, json!({})));
        }
        Ok(json_response(200, json!({"key": FAKE_KEY})))
    }

    fn list_pets(&self, key: &AuthKey, filter: &str) -> Result<ApiResponse, ClientError> {
        self.enter("list_pets")?;
        if key.as_str() != FAKE_KEY {
            return Ok(forbidden());
        }
        if filter != FILTER_ALL && filter != FILTER_MY_PETS {
            return Ok(text_response(500, "Internal Server Error"));
        }
        Ok(json_response(200, json!({"pets": *self.pets.borrow()})))
    }

    fn add_pet(
        &self,
        key: &AuthKey,
        pet: &NewPet,
        _photo: Option<&Path>,
    ) -> Result<ApiResponse, ClientError> {
        self.enter("add_pet")?;
        if key.as_str() != FAKE_KEY {
            return Ok(forbidden());
        }
        let id = self.store(pet);
        Ok(json_response(200, self.find(&id).unwrap()))
    }

    fn add_pet_simple(&self, key: &AuthKey, pet: &NewPet) -> Result<ApiResponse, ClientError> {
        self.enter("add_pet_simple")?;
        if key.as_str() != FAKE_KEY {
            return Ok(forbidden());
        }
        let id = self.store(pet);
        Ok(json_response(200, self.find(&id).unwrap()))
    }

    fn update_pet(
        &self,
        key: &AuthKey,
        pet_id: &str,
        pet: &NewPet,
    ) -> Result<ApiResponse, ClientError> {
        self.enter("update_pet")?;
        if key.as_str() != FAKE_KEY {
            return Ok(forbidden());
        }
        let mut pets = self.pets.borrow_mut();
        let Some(stored) = pets.iter_mut().find(|stored| stored["id"] == pet_id) else {
            return Ok(text_response(400, "Bad Request"));
        };
        stored["name"] = json!(pet.name);
        stored["animal_type"] = json!(pet.animal_type);
        stored["age"] = json!(pet.age);
        Ok(json_response(200, stored.clone()))
    }

    fn delete_pet(&self, key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ClientError> {
        self.enter("delete_pet")?;
        if key.as_str() != FAKE_KEY {
            return Ok(forbidden());
        }
        if pet_id.is_empty() {
            return Ok(text_response(404, "Not Found"));
        }
        self.pets.borrow_mut().retain(|stored| stored["id"] != pet_id);
        Ok(text_response(200, ""))
    }

    fn set_photo(
        &self,
        key: &AuthKey,
        pet_id: &str,
        _photo: &Path,
    ) -> Result<ApiResponse, ClientError> {
        self.enter("set_photo")?;
        if key.as_str() != FAKE_KEY {
            return Ok(forbidden());
        }
        match self.find(pet_id) {
            Some(pet) => Ok(json_response(200, pet)),
            None => Ok(text_response(400, "Bad Request")),
        }
    }
}
