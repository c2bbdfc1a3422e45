use crate::error::CustomErrorCode;
use anchor_lang::prelude::*;

#[account]
pub struct BridgeConfig {
    pub authority: Pubkey,
    pub mint: Pubkey,
    pub custody_token_account: Pubkey,
    pub allowed_external_caller_program: Pubkey,
    pub relayed_total: u64,
    pub sequence: u64,
    pub bump: u8,
    pub paused: bool,
}

impl BridgeConfig {
    pub const LEN: usize = 8 + 32 + 32 + 32 + 32 + 8 + 8 + 1 + 1;

    /// Books one relay of `amount` and returns its sequence number.
    /// Leaves the counters untouched on failure.
    pub fn record_relay(&mut self, amount: u64) -> Result<u64> {
        require!(amount > 0, CustomErrorCode::InvalidAmount);

        let relayed_total = self
            .relayed_total
            .checked_add(amount)
            .ok_or(CustomErrorCode::Overflow)?;
        let sequence = self
            .sequence
            .checked_add(1)
            .ok_or(CustomErrorCode::Overflow)?;

        self.relayed_total = relayed_total;
        self.sequence = sequence;
        Ok(sequence)
    }
}
