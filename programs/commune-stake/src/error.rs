use anchor_lang::prelude::*;

#[error_code]
pub enum CustomErrorCode {
    #[msg("Staking is paused")]
    StakingPaused = 1,
    #[msg("Stake amount must be greater than zero")]
    ZeroStakeAmount = 2,
    #[msg("Stake amount is below the minimum deposit")]
    StakeAmountTooLow = 3,
    #[msg("Staking capacity limit reached")]
    CapacityLimitReached = 4,
    #[msg("Insufficient allowance")]
    InsufficientAllowance = 5,
    #[msg("Insufficient balance")]
    InsufficientBalance = 6,
    #[msg("Custom validators are not allowed")]
    CustomValidatorNotAllowed = 7,
    #[msg("Validator does not match the one on record")]
    InvalidValidator = 8,
    #[msg("Invalid validator change")]
    InvalidValidatorChange = 9,
    #[msg("No stake to change validator")]
    NoStakeToChangeValidator = 10,
    #[msg("No stake to unstake")]
    NoStakeToUnstake = 11,
    #[msg("Unauthorized")]
    Unauthorized = 12,
    #[msg("Invalid user address")]
    InvalidUserAddress = 13,
    #[msg("Invalid signature")]
    InvalidSignature = 14,
    #[msg("Destination address not set")]
    DestinationAddressNotSet = 15,
    #[msg("Unstake amount must be greater than zero")]
    ZeroUnstakeAmount = 16,
    #[msg("Destination address is too long")]
    DestinationAddressTooLong = 17,
    #[msg("Validator is too long")]
    ValidatorTagTooLong = 18,
    #[msg("Signer identity cannot be the zero address")]
    InvalidSignerIdentity = 19,
    #[msg("Too many stake administrators.")]
    TooManyAdministrators = 20,

    #[msg("Invalid mint provided")]
    InvalidMint = 21,
    #[msg("Invalid token owner")]
    InvalidTokenOwner = 22,
    #[msg("Invalid vault token account")]
    InvalidVaultTokenAccount = 23,
    #[msg("Invalid vault authority")]
    InvalidVaultAuthority = 24,
    #[msg("Invalid bridge program")]
    InvalidBridgeProgram = 25,
    #[msg("ProgramData account did not match expected PDA.")]
    InvalidProgramData = 26,
    #[msg("Program has no upgrade authority (set to None).")]
    NoUpgradeAuthority = 27,
    #[msg("Signer is not the upgrade authority.")]
    InvalidUpgradeAuthority = 28,
    #[msg("Arithmetic overflow")]
    Overflow = 29,
}
