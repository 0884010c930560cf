use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{near, AccountId};
use near_sdk_macros::NearSchema;

/// A verified animal-welfare organization, keyed in state by its account id.
#[derive(Clone, Serialize, Deserialize, BorshSerialize, BorshDeserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[borsh(crate = "near_sdk::borsh")]
#[abi(json, borsh)]
pub struct Association {
    pub name: String,
}

/// A fundraising case. `id` equals the pet's index in the global pet table
/// and never changes; `donated` only ever grows, through donations.
#[derive(Clone, Serialize, Deserialize, BorshSerialize, BorshDeserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[borsh(crate = "near_sdk::borsh")]
#[abi(json, borsh)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    pub photos: Vec<String>,
    pub bio: String,
    pub needed: U128,
    pub donated: U128,
    pub association: AccountId,
}

/// Column-oriented window over the pet table for bulk UI reads. All vectors
/// have the same length and index `i` of each describes the same pet.
#[derive(Clone, Default)]
#[near(serializers = [json])]
pub struct PetPage {
    pub pet_ids: Vec<u64>,
    pub pet_names: Vec<String>,
    pub pet_bios: Vec<String>,
    pub pet_donated: Vec<U128>,
    pub pet_needed: Vec<U128>,
    pub association_addresses: Vec<AccountId>,
    pub photos: Vec<Vec<String>>,
}
