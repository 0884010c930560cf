use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::{env, FunctionError};
use near_sdk_macros::NearSchema;

#[derive(Debug, PartialEq, NearSchema, BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub enum DonationError {
    Unauthorized,
    InvalidInput,
    PetNotFound,
    TransferFailed,
}

impl FunctionError for DonationError {
    fn panic(&self) -> ! {
        env::panic_str(match self {
            DonationError::Unauthorized => "Unauthorized access",
            DonationError::InvalidInput => "Invalid input",
            DonationError::PetNotFound => "Pet not found",
            DonationError::TransferFailed => "Transfer failed",
        })
    }
}
