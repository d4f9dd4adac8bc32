// crates/petfriends-harness/src/steps.rs
// ============================================================================
// Module: Shared Steps
// Description: Preparation steps reused by several case bodies.
// Purpose: Fetch the caller's pets and guarantee at least one exists.
// Dependencies: petfriends-client, tracing
// ============================================================================

//! ## Overview
//! Steps run inside a case body and report mismatches as
//! [`AssertionFailure`], so a failed precondition fails the case instead of
//! the process. Every call is checked through the [`SessionContext`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use petfriends_client::FILTER_MY_PETS;
use petfriends_client::NewPet;
use petfriends_client::Pet;
use petfriends_client::PetApi;
use petfriends_client::PetList;
use tracing::debug;

use crate::outcome::AssertionFailure;
use crate::outcome::ExpectedOutcome;
use crate::session::SessionContext;

// ============================================================================
// SECTION: Steps
// ============================================================================

/// Lists the pets owned by the session account.
///
/// # Errors
///
/// Returns [`AssertionFailure`] when the call fails, the status is not 200,
/// or the payload is not a pet list.
pub fn my_pets(api: &dyn PetApi, context: &mut SessionContext) -> Result<PetList, AssertionFailure> {
    let response = api.list_pets(context.key(), FILTER_MY_PETS)?;
    context.check(&response, &ExpectedOutcome::status(200).contains("pets"))?;
    Ok(response.decode("pet list")?)
}

/// Returns the newest own pet, creating `seed` first when none exists.
///
/// # Errors
///
/// Returns [`AssertionFailure`] when listing or creating the pet fails.
pub fn ensure_own_pet(
    api: &dyn PetApi,
    context: &mut SessionContext,
    seed: &NewPet,
) -> Result<Pet, AssertionFailure> {
    if let Some(pet) = my_pets(api, context)?.first() {
        return Ok(pet.clone());
    }
    debug!(name = %seed.name, "no own pets; creating one");
    let response = api.add_pet_simple(context.key(), seed)?;
    context.check(&response, &ExpectedOutcome::status(200).contains("id"))?;
    Ok(response.decode("pet")?)
}
