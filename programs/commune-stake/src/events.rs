use anchor_lang::prelude::*;

#[event]
pub struct Staked {
    pub user: Pubkey,
    pub amount: u64,
    pub destination_address: String,
    pub validator: String,
    pub total_staked: u64,
}

#[event]
pub struct InitUnstake {
    pub user: Pubkey,
    pub authority: Pubkey, // the user, or the administrator for admin_unstake
    pub amount: u64,
    pub prior_amount: u64,
    pub unstake_all: bool,
    pub total_staked: u64,
}

#[event]
pub struct ValidatorChanged {
    pub user: Pubkey,
    pub authority: Pubkey,
    pub validator: String,
}

#[event]
pub struct SignerIdentityUpdated {
    pub admin: Pubkey,
    pub old_identity: [u8; 20],
    pub new_identity: [u8; 20],
}

#[event]
pub struct BridgeProgramUpdated {
    pub admin: Pubkey,
    pub old_program: Pubkey,
    pub new_program: Pubkey,
}
