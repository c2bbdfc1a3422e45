use anchor_lang::prelude::*;

#[event]
pub struct BridgedBack {
    pub source: Pubkey,
    pub amount: u64,
    pub destination_address: String,
    pub sequence: u64,
    pub relayed_total: u64,
}

#[event]
pub struct AllowedCallerUpdated {
    pub authority: Pubkey,
    pub old_program: Pubkey,
    pub new_program: Pubkey,
}
