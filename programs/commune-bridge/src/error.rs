use anchor_lang::prelude::*;

#[error_code]
pub enum CustomErrorCode {
    #[msg("Invalid amount")]
    InvalidAmount = 1,
    #[msg("Destination address must not be empty")]
    EmptyDestinationAddress = 2,
    #[msg("Relay is paused")]
    RelayPaused = 3,
    #[msg("Invalid authority")]
    InvalidAuthority = 4,
    #[msg("Bridge authority is not the delegate of the source account")]
    InvalidDelegate = 5,
    #[msg("Invalid custody token account")]
    InvalidCustodyAccount = 6,
    #[msg("Invalid mint provided")]
    InvalidMint = 7,
    #[msg("Arithmetic overflow")]
    Overflow = 8,
    #[msg("ProgramData account did not match expected PDA.")]
    InvalidProgramData = 9,
    #[msg("Program has no upgrade authority (set to None).")]
    NoUpgradeAuthority = 10,
    #[msg("Signer is not the upgrade authority.")]
    InvalidUpgradeAuthority = 11,
}
