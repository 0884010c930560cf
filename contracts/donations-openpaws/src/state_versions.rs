use crate::types::{Association, Pet};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::store::{LookupMap, Vector};
use near_sdk::AccountId;

/// First deployed layout, before the bio length policy became tunable.
#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct StateV010 {
    pub version: String,
    pub owner: AccountId,
    pub associations: LookupMap<AccountId, Association>,
    pub pets: Vector<Pet>,
    pub pets_by_association: LookupMap<AccountId, Vector<u64>>,
    pub balances: LookupMap<AccountId, u128>,
}
