/// # commune bridge - Relay Custody for Staked Funds
///
/// ## Business Process Flow
///
/// 1. Initial Setup:
///    - Admin creates a custody token account owned by the bridge_authority PDA
///    - The upgrade authority initializes the relay with the staking program
///      allowed to call it
///
/// 2. Relay Flow:
///    - The staking program grants bridge_authority an unlimited delegate
///      allowance over its custody account
///    - After every stake, the staking program calls bridge_back through CPI,
///      signing with its external_caller_authority PDA
///    - The relay pulls the staked amount into bridge custody and emits a
///      BridgedBack event carrying the Commune destination address
///    - Off-chain relayers consume BridgedBack events and deliver the funds
///      on the Commune network
///
/// 3. Administrative Functions:
///    - Pause or resume relaying
///    - Rotate the staking program allowed to call bridge_back
pub mod account_structs;
pub mod error;
pub mod events;
mod guard;
pub mod processor;
pub mod state;

use account_structs::*;
use anchor_lang::prelude::*;

declare_id!("DZmEpBeAcj4Absv8uXhRfqPNfXXZdd58RqVGQ1PN6meW");

#[program]
pub mod commune_bridge {
    use super::*;

    /// Creates the relay configuration:
    /// - allowed_external_caller_program: the only program whose
    ///   external_caller_authority PDA may invoke bridge_back
    pub fn initialize(
        ctx: Context<Initialize>,
        allowed_external_caller_program: Pubkey,
    ) -> Result<()> {
        processor::initialize(ctx, allowed_external_caller_program)
    }

    /// Pulls `amount` from the caller's delegated source account into bridge
    /// custody and records the relay towards `destination_address`.
    pub fn bridge_back(
        ctx: Context<BridgeBack>,
        amount: u64,
        destination_address: String,
    ) -> Result<()> {
        processor::bridge_back(ctx, amount, destination_address)
    }

    pub fn pause(ctx: Context<UpdateRelay>, pause: bool) -> Result<()> {
        processor::pause(ctx, pause)
    }

    pub fn update_allowed_caller(
        ctx: Context<UpdateRelay>,
        new_allowed_external_caller_program: Pubkey,
    ) -> Result<()> {
        processor::update_allowed_caller(ctx, new_allowed_external_caller_program)
    }
}
