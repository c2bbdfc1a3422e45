pub mod account_structs;
/// # commune stake - Bridged Staking Ledger
///
/// ## Business Process Flow
///
/// 1. Initial Setup:
///    - Admin creates the custody (vault) token account for the staked token
///    - Admin initializes the ledger with the signer identity, default
///      validator, minimum deposit and capacity limit
///    - The vault token account is handed to the vault_authority PDA and the
///      bridge relay is granted an unlimited allowance over it
///
/// 2. User Staking Flow:
///    a. Destination Proof:
///       - Off-chain, the signer identity signs the user's wallet together with
///         the user's Commune address
///       - The proof is only needed when an address is supplied; later stakes
///         reuse the address on record
///    b. Deposit Phase:
///       - User approves vault_authority as delegate for the amount to stake
///       - The ledger books the deposit against the user's staker record,
///         assigning the default or requested validator
///       - Tokens are pulled into the vault and forwarded to the bridge relay
///         with the user's Commune address
///
/// 3. Withdrawal Flow:
///    - User initiates an unstake for an amount or for everything
///    - The ledger reduces the record and the global total; the funds are
///      released from the bridge on the Commune side
///    - A record emptied by unstaking loses its validator, keeps its address
///
/// 4. Administrative Functions:
///    - Pause staking, set minimum deposit, capacity limit and default validator
///    - Rotate the signer identity and the bridge relay
///    - Stake administrators can unstake or move the validator of any record
///
/// Security is maintained through PDAs (Program Derived Addresses), delegated
/// token authorities and secp256k1 destination proofs. All operations are
/// atomic through Solana's transaction model.
pub mod error;
pub mod events;
mod guard;
pub mod processor;
pub mod signature;
pub mod state;

use account_structs::*;
use anchor_lang::prelude::*;
use signature::AddressProof;

declare_id!("D4JaYuD8PqzaSHViTTkpNL75MofFGkAyL82b6cdqcYjk");

#[program]
pub mod commune_stake {
    use super::*;

    /// Initializes the ledger:
    /// - signer_identity: 20-byte secp256k1 address that signs destination proofs
    /// - default_validator: validator assigned when a first stake names none
    /// - min_deposit: smallest amount a single stake may carry
    /// - capacity_limit: ceiling on the total staked, 0 for unlimited
    /// - allow_custom_validator: whether stakers may pick non-default validators
    /// - stake_administrators: keys allowed to override staker records
    pub fn initialize(
        ctx: Context<Initialize>,
        signer_identity: [u8; 20],
        default_validator: String,
        min_deposit: u64,
        capacity_limit: u64,
        allow_custom_validator: bool,
        stake_administrators: Vec<Pubkey>,
    ) -> Result<()> {
        processor::initialize(
            ctx,
            signer_identity,
            default_validator,
            min_deposit,
            capacity_limit,
            allow_custom_validator,
            stake_administrators,
        )
    }

    /// Stakes `amount` of the staked token:
    /// - destination_address: Commune address, requires `proof` when given
    /// - validator: validator to delegate to, only on a record without one
    /// - Transfers the tokens to the vault and relays them to the bridge
    pub fn stake(
        ctx: Context<Stake>,
        amount: u64,
        destination_address: Option<String>,
        validator: Option<String>,
        proof: Option<AddressProof>,
    ) -> Result<()> {
        processor::stake(ctx, amount, destination_address, validator, proof)
    }

    /// Withdraws `amount` from the caller's stake, or everything when
    /// `unstake_all` is set or `amount` exceeds the stake.
    pub fn init_unstake(ctx: Context<Unstake>, amount: u64, unstake_all: bool) -> Result<()> {
        processor::init_unstake(ctx, amount, unstake_all)
    }

    pub fn admin_unstake(ctx: Context<AdminUnstake>, amount: u64, unstake_all: bool) -> Result<()> {
        processor::admin_unstake(ctx, amount, unstake_all)
    }

    /// Moves the caller's stake to `new_validator`, or back to the default
    /// validator when none is given.
    pub fn change_validator(ctx: Context<ChangeValidator>, new_validator: Option<String>) -> Result<()> {
        processor::change_validator(ctx, new_validator)
    }

    pub fn admin_change_validator(
        ctx: Context<AdminChangeValidator>,
        new_validator: Option<String>,
    ) -> Result<()> {
        processor::admin_change_validator(ctx, new_validator)
    }

    /// Pauses or unpauses staking; unstaking stays available:
    /// - pause: true to pause, false to unpause
    pub fn pause(ctx: Context<Pause>, pause: bool) -> Result<()> {
        processor::pause(ctx, pause)
    }

    pub fn set_min_deposit(ctx: Context<UpdateConfig>, min_deposit: u64) -> Result<()> {
        processor::set_min_deposit(ctx, min_deposit)
    }

    pub fn set_capacity_limit(ctx: Context<UpdateConfig>, capacity_limit: u64) -> Result<()> {
        processor::set_capacity_limit(ctx, capacity_limit)
    }

    pub fn set_default_validator(ctx: Context<UpdateConfig>, default_validator: String) -> Result<()> {
        processor::set_default_validator(ctx, default_validator)
    }

    pub fn set_allow_custom_validator(ctx: Context<UpdateConfig>, allow: bool) -> Result<()> {
        processor::set_allow_custom_validator(ctx, allow)
    }

    pub fn set_signer_identity(
        ctx: Context<UpdateConfig>,
        new_identity: [u8; 20],
    ) -> Result<()> {
        processor::set_signer_identity(ctx, new_identity)
    }

    pub fn update_stake_administrators(
        ctx: Context<UpdateStakeAdministrators>,
        new_administrators: Vec<Pubkey>,
    ) -> Result<()> {
        processor::update_stake_administrators(ctx, new_administrators)
    }

    pub fn set_bridge_program(ctx: Context<SetBridgeProgram>) -> Result<()> {
        processor::set_bridge_program(ctx)
    }

    /// Grants the configured bridge relay an unlimited allowance over the vault.
    pub fn approve_bridge(ctx: Context<ApproveBridge>) -> Result<()> {
        processor::approve_bridge(ctx)
    }
}
