//! Donation ledger for animal-welfare fundraising: the contract owner
//! registers associations, associations post pets, anyone donates attached
//! NEAR toward a pet, and the owning association withdraws its balance.

use crate::errors::DonationError;
use crate::state::DonationsContractState;
use crate::types::{Association, Pet, PetPage};
use near_sdk::json_types::U128;
use near_sdk::{env, ext_contract, near, AccountId, Gas, NearToken, PanicOnDefault, Promise};

pub mod errors;
mod events;
pub mod state;
pub mod state_versions;
pub mod types;

const GAS_FOR_WITHDRAW_CALLBACK: Gas = Gas::from_tgas(10);

#[ext_contract(ext_self)]
pub trait SelfCallback {
    fn on_withdraw(&mut self, account_id: AccountId, amount: U128) -> bool;
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct DonationsContract {
    state: DonationsContractState,
}

#[near]
impl DonationsContract {
    #[init]
    pub fn new(owner_id: Option<AccountId>) -> Self {
        Self {
            state: DonationsContractState::new(
                owner_id.unwrap_or_else(env::predecessor_account_id),
            ),
        }
    }

    #[handle_result]
    pub fn add_association(
        &mut self,
        account_id: AccountId,
        name: String,
    ) -> Result<(), DonationError> {
        self.state
            .add_association(&env::predecessor_account_id(), account_id, name)
    }

    #[handle_result]
    pub fn add_pet(
        &mut self,
        name: String,
        photos: Vec<String>,
        bio: String,
        needed: U128,
    ) -> Result<u64, DonationError> {
        self.state
            .add_pet(&env::predecessor_account_id(), name, photos, bio, needed.0)
    }

    #[handle_result]
    pub fn update_pet_name(&mut self, pet_id: u64, name: String) -> Result<(), DonationError> {
        self.state
            .update_pet_name(&env::predecessor_account_id(), pet_id, name)
    }

    #[handle_result]
    pub fn update_pet_bio(&mut self, pet_id: u64, bio: String) -> Result<(), DonationError> {
        self.state
            .update_pet_bio(&env::predecessor_account_id(), pet_id, bio)
    }

    #[handle_result]
    pub fn update_pet_photos(
        &mut self,
        pet_id: u64,
        photos: Vec<String>,
    ) -> Result<(), DonationError> {
        self.state
            .update_pet_photos(&env::predecessor_account_id(), pet_id, photos)
    }

    /// The attached deposit is the donation amount.
    #[payable]
    #[handle_result]
    pub fn donate(&mut self, pet_id: u64) -> Result<(), DonationError> {
        self.state.donate(
            &env::predecessor_account_id(),
            pet_id,
            env::attached_deposit().as_yoctonear(),
        )
    }

    /// Pays out the caller's whole balance. The balance is zeroed before the
    /// transfer and restored by `on_withdraw` if the transfer fails.
    #[handle_result]
    pub fn withdraw(&mut self) -> Result<Promise, DonationError> {
        let caller = env::predecessor_account_id();
        let amount = self.state.begin_withdraw(&caller)?;

        Ok(Promise::new(caller.clone())
            .transfer(NearToken::from_yoctonear(amount))
            .then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_WITHDRAW_CALLBACK)
                    .on_withdraw(caller, U128(amount)),
            ))
    }

    /// Only callable by this contract. Must not panic: a panic here would
    /// undo the balance restore itself.
    #[private]
    pub fn on_withdraw(&mut self, account_id: AccountId, amount: U128) -> bool {
        if env::promise_result_checked(0, 0).is_ok() {
            self.state.complete_withdraw(&account_id, amount.0);
            true
        } else {
            self.state.restore_balance(&account_id, amount.0);
            false
        }
    }

    #[handle_result]
    pub fn set_min_bio_length(&mut self, min_bio_length: u32) -> Result<(), DonationError> {
        self.state
            .set_min_bio_length(&env::predecessor_account_id(), min_bio_length)
    }

    // --- View ---

    pub fn get_page_number(&self) -> u64 {
        self.state.get_page_number()
    }

    pub fn get_pets_page(&self, page_index: i64) -> PetPage {
        self.state.get_pets_page(page_index)
    }

    pub fn get_pet(&self, pet_id: u64) -> Option<Pet> {
        self.state.get_pet(pet_id)
    }

    pub fn get_pet_count(&self) -> u64 {
        self.state.get_pet_count()
    }

    pub fn get_association(&self, account_id: AccountId) -> Option<Association> {
        self.state.get_association(&account_id)
    }

    pub fn is_association(&self, account_id: AccountId) -> bool {
        self.state.is_association(&account_id)
    }

    pub fn balance_of(&self, account_id: AccountId) -> U128 {
        U128(self.state.balance_of(&account_id))
    }

    pub fn get_pets_by_association(
        &self,
        account_id: AccountId,
        from_index: Option<u64>,
        limit: Option<u64>,
    ) -> Vec<u64> {
        self.state
            .get_pets_by_association(&account_id, from_index, limit)
    }

    pub fn get_owner(&self) -> AccountId {
        self.state.owner.clone()
    }

    pub fn get_min_bio_length(&self) -> u32 {
        self.state.min_bio_length
    }

    // --- Upgrade ---

    #[handle_result]
    pub fn update_contract(&mut self) -> Result<Promise, DonationError> {
        self.state.update_contract()
    }

    #[private]
    #[init(ignore_state)]
    pub fn migrate() -> Self {
        Self {
            state: DonationsContractState::migrate(),
        }
    }
}
