use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

#[near(event_json(standard = "nep297"))]
pub enum DonationEvent {
    #[event_version("1.0.0")]
    AssociationAdded { account_id: AccountId, name: String },
    #[event_version("1.0.0")]
    PetAdded { pet_id: u64, association: AccountId },
    #[event_version("1.0.0")]
    DonationReceived { pet_id: u64, donor: AccountId, amount: U128 },
    #[event_version("1.0.0")]
    WithdrawalCompleted { account_id: AccountId, amount: U128 },
    #[event_version("1.0.0")]
    WithdrawalFailed { account_id: AccountId, amount: U128 },
    #[event_version("1.0.0")]
    MinBioLengthUpdated { min_bio_length: u32 },
    #[event_version("1.0.0")]
    ContractUpgraded { owner: AccountId, timestamp: u64 },
    #[event_version("1.0.0")]
    StateMigrated { old_version: String, new_version: String },
}
