use crate::errors::DonationError;
use crate::events::DonationEvent;
use crate::state_versions::StateV010;
use crate::types::{Association, Pet, PetPage};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::store::{LookupMap, Vector};
use near_sdk::{env, log, AccountId, BorshStorageKey, Gas, NearToken, Promise};
use semver::Version;

/// Fixed window size for `get_pets_page`.
pub const PAGE_SIZE: u64 = 10;
/// Minimum pet bio length in bytes unless the owner tunes it.
pub const DEFAULT_MIN_BIO_LENGTH: u32 = 10;

const CALL_GAS: Gas = Gas::from_tgas(200);
const NO_ARGS: Vec<u8> = vec![];

#[derive(BorshSerialize, BorshDeserialize, BorshStorageKey)]
#[borsh(crate = "near_sdk::borsh")]
pub enum StorageKey {
    Associations,
    Pets,
    PetIndex,
    PetsByAssociation { account_id: AccountId },
    Balances,
}

#[derive(BorshSerialize, BorshDeserialize, near_sdk_macros::NearSchema)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub struct DonationsContractState {
    pub version: String,
    pub owner: AccountId,
    pub associations: LookupMap<AccountId, Association>,
    pub pets: Vector<Pet>,
    pub pets_by_association: LookupMap<AccountId, Vector<u64>>,
    pub balances: LookupMap<AccountId, u128>,
    pub min_bio_length: u32,
}

impl DonationsContractState {
    pub fn new(owner: AccountId) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            owner,
            associations: LookupMap::new(StorageKey::Associations),
            pets: Vector::new(StorageKey::Pets),
            pets_by_association: LookupMap::new(StorageKey::PetIndex),
            balances: LookupMap::new(StorageKey::Balances),
            min_bio_length: DEFAULT_MIN_BIO_LENGTH,
        }
    }

    // --- Capability predicates ---

    pub fn is_owner(&self, account_id: &AccountId) -> bool {
        &self.owner == account_id
    }

    pub fn is_association(&self, account_id: &AccountId) -> bool {
        self.associations.contains_key(account_id)
    }

    // --- Associations ---

    pub fn add_association(
        &mut self,
        caller: &AccountId,
        account_id: AccountId,
        name: String,
    ) -> Result<(), DonationError> {
        if !self.is_owner(caller) {
            return Err(DonationError::Unauthorized);
        }
        if name.is_empty() {
            return Err(DonationError::InvalidInput);
        }
        if self.associations.contains_key(&account_id) {
            return Err(DonationError::InvalidInput);
        }

        self.associations
            .insert(account_id.clone(), Association { name: name.clone() });

        DonationEvent::AssociationAdded { account_id, name }.emit();

        Ok(())
    }

    // --- Pets ---

    pub fn add_pet(
        &mut self,
        caller: &AccountId,
        name: String,
        photos: Vec<String>,
        bio: String,
        needed: u128,
    ) -> Result<u64, DonationError> {
        if !self.is_association(caller) {
            return Err(DonationError::Unauthorized);
        }
        if name.is_empty() {
            return Err(DonationError::InvalidInput);
        }
        if (bio.len() as u32) < self.min_bio_length {
            return Err(DonationError::InvalidInput);
        }
        if photos.is_empty() {
            return Err(DonationError::InvalidInput);
        }

        let pet_id = u64::from(self.pets.len());
        self.pets.push(Pet {
            id: pet_id,
            name,
            photos,
            bio,
            needed: U128(needed),
            donated: U128(0),
            association: caller.clone(),
        });

        if self.pets_by_association.get(caller).is_none() {
            self.pets_by_association.insert(
                caller.clone(),
                Vector::new(StorageKey::PetsByAssociation {
                    account_id: caller.clone(),
                }),
            );
        }
        let ids = self
            .pets_by_association
            .get_mut(caller)
            .expect("Pet index should exist");
        ids.push(pet_id);

        DonationEvent::PetAdded {
            pet_id,
            association: caller.clone(),
        }
        .emit();

        Ok(pet_id)
    }

    pub fn update_pet_name(
        &mut self,
        caller: &AccountId,
        pet_id: u64,
        name: String,
    ) -> Result<(), DonationError> {
        let pet = self.owned_pet_mut(caller, pet_id)?;
        if name.is_empty() {
            return Err(DonationError::InvalidInput);
        }
        pet.name = name;
        Ok(())
    }

    pub fn update_pet_bio(
        &mut self,
        caller: &AccountId,
        pet_id: u64,
        bio: String,
    ) -> Result<(), DonationError> {
        let min_bio_length = self.min_bio_length;
        let pet = self.owned_pet_mut(caller, pet_id)?;
        if (bio.len() as u32) < min_bio_length {
            return Err(DonationError::InvalidInput);
        }
        pet.bio = bio;
        Ok(())
    }

    pub fn update_pet_photos(
        &mut self,
        caller: &AccountId,
        pet_id: u64,
        photos: Vec<String>,
    ) -> Result<(), DonationError> {
        let pet = self.owned_pet_mut(caller, pet_id)?;
        if photos.is_empty() {
            return Err(DonationError::InvalidInput);
        }
        pet.photos = photos;
        Ok(())
    }

    /// A pet that does not exist cannot be owned by the caller, so a missing
    /// pet is an authorization failure rather than a lookup failure.
    fn owned_pet_mut(
        &mut self,
        caller: &AccountId,
        pet_id: u64,
    ) -> Result<&mut Pet, DonationError> {
        let index = u32::try_from(pet_id).map_err(|_| DonationError::Unauthorized)?;
        let pet = self
            .pets
            .get_mut(index)
            .ok_or(DonationError::Unauthorized)?;
        if &pet.association != caller {
            return Err(DonationError::Unauthorized);
        }
        Ok(pet)
    }

    // --- Donations ---

    pub fn donate(
        &mut self,
        donor: &AccountId,
        pet_id: u64,
        amount: u128,
    ) -> Result<(), DonationError> {
        // Zero-value transfers are rejected here, not trusted to be filtered
        // by the front-end.
        if amount == 0 {
            return Err(DonationError::InvalidInput);
        }

        let index = u32::try_from(pet_id).map_err(|_| DonationError::PetNotFound)?;
        let pet = self.pets.get_mut(index).ok_or(DonationError::PetNotFound)?;
        pet.donated = U128(pet.donated.0 + amount);
        let association = pet.association.clone();

        let balance = self.balances.get(&association).copied().unwrap_or(0);
        self.balances.insert(association, balance + amount);

        DonationEvent::DonationReceived {
            pet_id,
            donor: donor.clone(),
            amount: U128(amount),
        }
        .emit();

        Ok(())
    }

    // --- Withdrawals ---

    /// Validates the caller and zeroes its balance before any transfer is
    /// issued. The caller of this method owns the transfer promise and must
    /// route its outcome to `complete_withdraw` or `restore_balance`.
    pub fn begin_withdraw(&mut self, caller: &AccountId) -> Result<u128, DonationError> {
        if !self.is_association(caller) {
            return Err(DonationError::Unauthorized);
        }
        let amount = self.balances.get(caller).copied().unwrap_or(0);
        if amount == 0 {
            return Err(DonationError::InvalidInput);
        }
        if env::account_balance().as_yoctonear() < amount {
            return Err(DonationError::TransferFailed);
        }

        self.balances.insert(caller.clone(), 0);
        Ok(amount)
    }

    pub fn complete_withdraw(&mut self, account_id: &AccountId, amount: u128) {
        DonationEvent::WithdrawalCompleted {
            account_id: account_id.clone(),
            amount: U128(amount),
        }
        .emit();
    }

    /// Re-credits a failed payout on top of whatever accrued since the
    /// balance was zeroed.
    pub fn restore_balance(&mut self, account_id: &AccountId, amount: u128) {
        let current = self.balances.get(account_id).copied().unwrap_or(0);
        self.balances.insert(account_id.clone(), current + amount);

        DonationEvent::WithdrawalFailed {
            account_id: account_id.clone(),
            amount: U128(amount),
        }
        .emit();
    }

    // --- Configuration ---

    pub fn set_min_bio_length(
        &mut self,
        caller: &AccountId,
        min_bio_length: u32,
    ) -> Result<(), DonationError> {
        if !self.is_owner(caller) {
            return Err(DonationError::Unauthorized);
        }
        if min_bio_length == 0 {
            return Err(DonationError::InvalidInput);
        }
        self.min_bio_length = min_bio_length;

        DonationEvent::MinBioLengthUpdated { min_bio_length }.emit();

        Ok(())
    }

    // --- Views ---

    pub fn get_page_number(&self) -> u64 {
        u64::from(self.pets.len()).div_ceil(PAGE_SIZE)
    }

    pub fn get_pets_page(&self, page_index: i64) -> PetPage {
        let mut page = PetPage::default();
        if page_index < 0 {
            return page;
        }
        let start = (page_index as u64).saturating_mul(PAGE_SIZE);
        let total = u64::from(self.pets.len());
        if start >= total {
            return page;
        }

        let end = (start + PAGE_SIZE).min(total);
        for index in start..end {
            let pet = self.pets.get(index as u32).expect("Pet should exist");
            page.pet_ids.push(pet.id);
            page.pet_names.push(pet.name.clone());
            page.pet_bios.push(pet.bio.clone());
            page.pet_donated.push(pet.donated);
            page.pet_needed.push(pet.needed);
            page.association_addresses.push(pet.association.clone());
            page.photos.push(pet.photos.clone());
        }
        page
    }

    pub fn get_pet(&self, pet_id: u64) -> Option<Pet> {
        let index = u32::try_from(pet_id).ok()?;
        self.pets.get(index).cloned()
    }

    pub fn get_pet_count(&self) -> u64 {
        u64::from(self.pets.len())
    }

    pub fn get_association(&self, account_id: &AccountId) -> Option<Association> {
        self.associations.get(account_id).cloned()
    }

    pub fn balance_of(&self, account_id: &AccountId) -> u128 {
        self.balances.get(account_id).copied().unwrap_or(0)
    }

    pub fn get_pets_by_association(
        &self,
        account_id: &AccountId,
        from_index: Option<u64>,
        limit: Option<u64>,
    ) -> Vec<u64> {
        let ids = match self.pets_by_association.get(account_id) {
            Some(ids) => ids,
            None => return Vec::new(),
        };
        let start = from_index.unwrap_or(0);
        let limit = limit.unwrap_or(50).min(100); // Max 100 per query
        ids.iter()
            .skip(start as usize)
            .take(limit as usize)
            .copied()
            .collect()
    }

    // --- Upgrade ---

    pub fn update_contract(&mut self) -> Result<Promise, DonationError> {
        if env::predecessor_account_id() != self.owner {
            return Err(DonationError::Unauthorized);
        }
        let code = env::input()
            .filter(|input| !input.is_empty())
            .ok_or(DonationError::InvalidInput)?
            .to_vec();
        log!("Upgrading contract by owner: {}", self.owner);
        DonationEvent::ContractUpgraded {
            owner: self.owner.clone(),
            timestamp: env::block_timestamp_ms(),
        }
        .emit();
        Ok(Promise::new(env::current_account_id())
            .deploy_contract(code)
            .function_call(
                "migrate".to_string(),
                NO_ARGS,
                NearToken::from_near(0),
                CALL_GAS,
            ))
    }

    pub fn migrate() -> Self {
        const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
        let current_version =
            Version::parse(CURRENT_VERSION).expect("Invalid current version in Cargo.toml");

        let state_bytes: Vec<u8> = env::state_read().unwrap_or_default();

        // Try current version
        if let Ok(state) = near_sdk::borsh::from_slice::<DonationsContractState>(&state_bytes) {
            if let Ok(state_version) = Version::parse(&state.version) {
                if state_version >= current_version {
                    env::log_str("State is at current or newer version, no migration needed");
                    return state;
                }
            }
        }

        // Try version 0.1.0
        if let Ok(old_state) = near_sdk::borsh::from_slice::<StateV010>(&state_bytes) {
            if let Ok(old_version) = Version::parse(&old_state.version) {
                if old_version <= Version::parse("0.1.0").unwrap() {
                    env::log_str(&format!(
                        "Migrating from state version {}",
                        old_state.version
                    ));
                    let new_state = DonationsContractState {
                        version: CURRENT_VERSION.to_string(),
                        owner: old_state.owner,
                        associations: old_state.associations,
                        pets: old_state.pets,
                        pets_by_association: old_state.pets_by_association,
                        balances: old_state.balances,
                        min_bio_length: DEFAULT_MIN_BIO_LENGTH,
                    };
                    DonationEvent::StateMigrated {
                        old_version: old_state.version,
                        new_version: CURRENT_VERSION.to_string(),
                    }
                    .emit();
                    return new_state;
                }
            }
        }

        // If no valid state was found or version is unknown, initialize a new state
        env::log_str("No valid prior state found or unknown version, initializing new state");
        Self::new(env::predecessor_account_id())
    }
}
