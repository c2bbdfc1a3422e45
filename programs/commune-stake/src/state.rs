use crate::error::CustomErrorCode;
use crate::signature::{verify_destination_proof, AddressProof, SIGNER_IDENTITY_LEN};
use anchor_lang::prelude::*;

pub const MAX_ADMINISTRATORS: usize = 5; // max number of stake administrators
pub const MAX_DESTINATION_ADDRESS_LEN: usize = 64; // SS58 addresses are 47-48 chars
pub const MAX_VALIDATOR_LEN: usize = 64;

#[account]
pub struct StakeConfig {
    pub mint: Pubkey,
    pub vault_token_account: Pubkey,
    pub bridge_program: Pubkey,
    pub signer_identity: [u8; 20],
    pub default_validator: String,
    pub allow_custom_validator: bool,
    pub min_deposit: u64,
    pub capacity_limit: u64, // 0 = unlimited
    pub total_staked: u64,
    pub stake_administrators: Vec<Pubkey>,
    pub bump: u8,
    pub paused: bool,
}

impl StakeConfig {
    // The strings and the vector are stored at their maximum length plus the
    // 4 byte Borsh length prefix.
    pub const LEN: usize = 8
        + 32
        + 32
        + 32
        + SIGNER_IDENTITY_LEN
        + (4 + MAX_VALIDATOR_LEN)
        + 1
        + 8
        + 8
        + 8
        + (4 + (32 * MAX_ADMINISTRATORS))
        + 1
        + 1;

    /// Global deposit policy, checked in order: pause, minimum deposit,
    /// capacity, zero amount.
    pub fn check_stake_amount(&self, amount: u64) -> Result<()> {
        require!(!self.paused, CustomErrorCode::StakingPaused);
        require_gte!(amount, self.min_deposit, CustomErrorCode::StakeAmountTooLow);

        if self.capacity_limit > 0 {
            let new_total = self
                .total_staked
                .checked_add(amount)
                .ok_or(CustomErrorCode::CapacityLimitReached)?;
            require_gte!(
                self.capacity_limit,
                new_total,
                CustomErrorCode::CapacityLimitReached
            );
        }

        require!(amount > 0, CustomErrorCode::ZeroStakeAmount);
        Ok(())
    }

    /// Picks the validator a deposit is booked under. A recorded validator can
    /// only be kept, never switched, by a deposit.
    pub fn resolve_validator(&self, existing: Option<&str>, requested: Option<&str>) -> Result<String> {
        match (existing, requested) {
            (Some(existing), Some(requested)) if existing != requested => {
                msg!("Validator on record: {}, requested: {}", existing, requested);
                err!(CustomErrorCode::InvalidValidator)
            }
            (Some(existing), _) => Ok(existing.to_string()),
            (None, None) => Ok(self.default_validator.clone()),
            (None, Some(requested)) => {
                validate_validator(requested)?;
                require!(
                    requested == self.default_validator || self.allow_custom_validator,
                    CustomErrorCode::CustomValidatorNotAllowed
                );
                Ok(requested.to_string())
            }
        }
    }

    /// Shared rules for moving an existing stake to `new_validator`, where
    /// `None` means back to the default validator. Callers decide whether the
    /// custom validator gate applies.
    pub fn validator_change_target(
        &self,
        record: &StakerRecord,
        new_validator: Option<&str>,
    ) -> Result<String> {
        require!(record.amount > 0, CustomErrorCode::NoStakeToChangeValidator);

        match new_validator {
            Some(new_validator) => {
                validate_validator(new_validator)?;
                require!(
                    record.validator.as_deref() != Some(new_validator),
                    CustomErrorCode::InvalidValidatorChange
                );
                Ok(new_validator.to_string())
            }
            None => Ok(self.default_validator.clone()),
        }
    }

    /// A staker moving their own stake: only allowed while custom validators
    /// are enabled. Administrative overrides use `validator_change_target`
    /// directly.
    pub fn user_validator_change_target(
        &self,
        record: &StakerRecord,
        new_validator: Option<&str>,
    ) -> Result<String> {
        require!(
            self.allow_custom_validator,
            CustomErrorCode::CustomValidatorNotAllowed
        );
        self.validator_change_target(record, new_validator)
    }

    pub fn record_stake(&mut self, amount: u64) -> Result<u64> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(CustomErrorCode::Overflow)?;
        Ok(self.total_staked)
    }

    pub fn release_stake(&mut self, amount: u64) -> Result<u64> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(CustomErrorCode::Overflow)?;
        Ok(self.total_staked)
    }

    pub fn is_stake_administrator(&self, key: &Pubkey) -> bool {
        self.stake_administrators.contains(key)
    }
}

#[account]
pub struct StakerRecord {
    pub owner: Pubkey,
    pub amount: u64,
    pub destination_address: Option<String>,
    pub validator: Option<String>, // None whenever amount == 0
    pub bump: u8,
}

impl StakerRecord {
    pub const LEN: usize = 8
        + 32
        + 8
        + (1 + 4 + MAX_DESTINATION_ADDRESS_LEN)
        + (1 + 4 + MAX_VALIDATOR_LEN)
        + 1;

    /// Resolves the destination address for a deposit. A supplied address must
    /// come with a proof from `signer_identity`, even when it matches the one
    /// on record; otherwise the recorded address is reused as is.
    pub fn resolve_destination(
        &self,
        staker: &Pubkey,
        requested: Option<&str>,
        proof: Option<&AddressProof>,
        signer_identity: &[u8; 20],
    ) -> Result<String> {
        match requested {
            Some(requested) => {
                require!(
                    requested.len() <= MAX_DESTINATION_ADDRESS_LEN,
                    CustomErrorCode::DestinationAddressTooLong
                );
                let proof = proof.ok_or(CustomErrorCode::InvalidSignature)?;
                verify_destination_proof(staker, requested, proof, signer_identity)?;
                Ok(requested.to_string())
            }
            None => self
                .destination_address
                .clone()
                .ok_or_else(|| error!(CustomErrorCode::DestinationAddressNotSet)),
        }
    }

    pub fn apply_stake(&mut self, amount: u64, destination_address: String, validator: String) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(CustomErrorCode::Overflow)?;
        self.destination_address = Some(destination_address);
        self.validator = Some(validator);
        Ok(())
    }

    /// Removes `withdrawn` from the stake; the validator assignment is
    /// cleared once nothing is left, the destination address is kept.
    pub fn apply_unstake(&mut self, withdrawn: u64) -> Result<()> {
        self.amount = self
            .amount
            .checked_sub(withdrawn)
            .ok_or(CustomErrorCode::Overflow)?;
        if self.amount == 0 {
            self.validator = None;
        }
        Ok(())
    }
}

// ========== HELPER FUNCTIONS ==========

/// Treats an empty string argument the same as an absent one.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

pub fn validate_validator(validator: &str) -> Result<()> {
    require!(!validator.is_empty(), CustomErrorCode::InvalidValidator);
    require!(
        validator.len() <= MAX_VALIDATOR_LEN,
        CustomErrorCode::ValidatorTagTooLong
    );
    Ok(())
}

pub fn check_funds(amount: u64, allowance: u64, balance: u64) -> Result<()> {
    require_gte!(allowance, amount, CustomErrorCode::InsufficientAllowance);
    require_gte!(balance, amount, CustomErrorCode::InsufficientBalance);
    Ok(())
}

/// A deposit as received by the `stake` instruction.
pub struct StakeRequest<'a> {
    pub amount: u64,
    pub destination_address: Option<&'a str>,
    pub validator: Option<&'a str>,
    pub proof: Option<&'a AddressProof>,
}

pub struct BookedStake {
    pub destination_address: String,
    pub validator: String,
    pub total_staked: u64,
}

/// Validates a deposit and books it against `record` and the global total.
/// Checks run in order: deposit policy, pull allowance and balance,
/// destination claim, validator. Nothing is written unless all of them pass.
pub fn book_stake(
    config: &mut StakeConfig,
    record: &mut StakerRecord,
    staker: &Pubkey,
    request: &StakeRequest,
    allowance: u64,
    balance: u64,
) -> Result<BookedStake> {
    config.check_stake_amount(request.amount)?;
    check_funds(request.amount, allowance, balance)?;

    let destination_address = record.resolve_destination(
        staker,
        non_empty(request.destination_address),
        request.proof,
        &config.signer_identity,
    )?;
    let validator =
        config.resolve_validator(record.validator.as_deref(), non_empty(request.validator))?;

    let total_staked = config.record_stake(request.amount)?;
    record.owner = *staker;
    record.apply_stake(request.amount, destination_address.clone(), validator.clone())?;

    Ok(BookedStake {
        destination_address,
        validator,
        total_staked,
    })
}

/// Reads the record behind a `["staker", user]` address. An address that
/// never staked holds no data and is reported as `no_stake`.
pub fn load_staker_record(info: &AccountInfo, no_stake: CustomErrorCode) -> Result<StakerRecord> {
    if info.data_is_empty() {
        msg!("No staker record at {}", info.key);
        return Err(no_stake.into());
    }
    require_keys_eq!(*info.owner, crate::ID, ErrorCode::AccountOwnedByWrongProgram);

    let data = info.try_borrow_data()?;
    StakerRecord::try_deserialize(&mut &data[..])
}

pub fn store_staker_record(info: &AccountInfo, record: &StakerRecord) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    record.try_serialize(&mut &mut data[..])
}

/// Amount withdrawn by an unstake request. `amount` is a ceiling: asking for
/// more than is staked withdraws everything.
pub fn calculate_unstake_amount(staked: u64, amount: u64, unstake_all: bool) -> Result<u64> {
    require!(staked > 0, CustomErrorCode::NoStakeToUnstake);
    if unstake_all {
        return Ok(staked);
    }
    require!(amount > 0, CustomErrorCode::ZeroUnstakeAmount);
    Ok(amount.min(staked))
}

pub struct Withdrawal {
    pub amount: u64,
    pub prior_amount: u64,
    pub total_staked: u64,
}

/// Books an unstake against `record` and the global total. Funds already sit
/// with the bridge, so nothing is transferred here.
pub fn process_unstake(
    config: &mut StakeConfig,
    record: &mut StakerRecord,
    amount: u64,
    unstake_all: bool,
) -> Result<Withdrawal> {
    let prior_amount = record.amount;
    let withdrawn = calculate_unstake_amount(prior_amount, amount, unstake_all)?;

    record.apply_unstake(withdrawn)?;
    let total_staked = config.release_stake(withdrawn)?;

    Ok(Withdrawal {
        amount: withdrawn,
        prior_amount,
        total_staked,
    })
}

/// What `spender` may pull from a token account: the delegated amount when it
/// is the account's delegate, nothing otherwise.
pub fn pull_allowance(delegate: Option<Pubkey>, delegated_amount: u64, spender: &Pubkey) -> u64 {
    match delegate {
        Some(delegate) if delegate == *spender => delegated_amount,
        _ => 0,
    }
}
