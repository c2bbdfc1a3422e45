use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::{self};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = signer,
        space = StakeConfig::LEN,
        seeds = [b"stake_config"],
        bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    /// It becomes the owner of the vault_token_account, pulls deposits from
    /// delegated user token accounts and grants the bridge its allowance.
    #[account(
        seeds = [b"vault_authority"],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// The custody token account that should be owned by vault_authority
    #[account(
        mut,
        constraint = vault_token_account.mint == mint.key() @ CustomErrorCode::InvalidMint,
        constraint = (vault_token_account.owner == signer.key() || vault_token_account.owner == vault_authority.key()) @ CustomErrorCode::InvalidVaultAuthority
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    /// CHECK: bridge relay program's executable
    #[account(executable)]
    pub bridge_program: UncheckedAccount<'info>,

    /// CHECK: This is the bridge's delegate PDA, validated by seeds under the bridge program
    #[account(
        seeds = [b"bridge_authority"],
        seeds::program = bridge_program.key(),
        bump
    )]
    pub bridge_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct Stake<'info> {
    #[account(
        mut,
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        init_if_needed,
        payer = signer,
        space = StakerRecord::LEN,
        seeds = [b"staker", signer.key().as_ref()],
        bump
    )]
    pub staker_record: Account<'info, StakerRecord>,

    #[account(
        mut,
        constraint = user_token_account.mint == stake_config.mint @ CustomErrorCode::InvalidMint,
        constraint = user_token_account.owner == signer.key() @ CustomErrorCode::InvalidTokenOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = vault_token_account.key() == stake_config.vault_token_account @ CustomErrorCode::InvalidVaultTokenAccount,
        constraint = vault_token_account.owner == vault_authority.key() @ CustomErrorCode::InvalidVaultAuthority
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    #[account(
        seeds = [b"vault_authority"],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// PDA that proves the bridge_back call is from commune-stake.
    /// Only this program can sign for it during the CPI.
    /// CHECK: This is a PDA derived from this program, validated by seeds
    #[account(
        seeds = [b"external_caller_authority"],
        bump
    )]
    pub external_caller_authority: UncheckedAccount<'info>,

    /// CHECK: bridge relay program's executable, must be the configured one
    #[account(
        executable,
        constraint = bridge_program.key() == stake_config.bridge_program @ CustomErrorCode::InvalidBridgeProgram
    )]
    pub bridge_program: UncheckedAccount<'info>,

    /// CHECK: bridge relay config, validated by the bridge program
    #[account(mut)]
    pub bridge_config: UncheckedAccount<'info>,

    /// CHECK: This is the bridge's delegate PDA, validated by seeds under the bridge program
    #[account(
        seeds = [b"bridge_authority"],
        seeds::program = bridge_program.key(),
        bump
    )]
    pub bridge_authority: UncheckedAccount<'info>,

    /// CHECK: bridge custody token account, validated by the bridge program
    #[account(mut)]
    pub bridge_custody_token_account: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Unstake<'info> {
    #[account(
        mut,
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    pub signer: Signer<'info>,

    /// CHECK: staker record PDA, validated by seeds; holds no data while
    /// the signer has never staked
    #[account(
        mut,
        seeds = [b"staker", signer.key().as_ref()],
        bump
    )]
    pub staker_record: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct AdminUnstake<'info> {
    #[account(
        mut,
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    /// CHECK: the staker whose record is unwound; only its key is used
    #[account(
        constraint = user.key() != Pubkey::default() @ CustomErrorCode::InvalidUserAddress
    )]
    pub user: UncheckedAccount<'info>,

    /// CHECK: staker record PDA, validated by seeds; holds no data while
    /// the user has never staked
    #[account(
        mut,
        seeds = [b"staker", user.key().as_ref()],
        bump
    )]
    pub staker_record: UncheckedAccount<'info>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub signer: Signer<'info>,
}

#[derive(Accounts)]
pub struct ChangeValidator<'info> {
    #[account(
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    pub signer: Signer<'info>,

    /// CHECK: staker record PDA, validated by seeds; holds no data while
    /// the signer has never staked
    #[account(
        mut,
        seeds = [b"staker", signer.key().as_ref()],
        bump
    )]
    pub staker_record: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct AdminChangeValidator<'info> {
    #[account(
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    /// CHECK: the staker whose validator is changed; only its key is used
    #[account(
        constraint = user.key() != Pubkey::default() @ CustomErrorCode::InvalidUserAddress
    )]
    pub user: UncheckedAccount<'info>,

    /// CHECK: staker record PDA, validated by seeds; holds no data while
    /// the user has never staked
    #[account(
        mut,
        seeds = [b"staker", user.key().as_ref()],
        bump
    )]
    pub staker_record: UncheckedAccount<'info>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub signer: Signer<'info>,
}

#[derive(Accounts)]
pub struct Pause<'info> {
    #[account(
        mut,
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub signer: Signer<'info>,
}

// Shared by the single-field policy setters.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub signer: Signer<'info>,
}

#[derive(Accounts)]
pub struct UpdateStakeAdministrators<'info> {
    #[account(
        mut,
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub signer: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetBridgeProgram<'info> {
    #[account(
        mut,
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    /// CHECK: new bridge relay program's executable
    #[account(executable)]
    pub new_bridge_program: UncheckedAccount<'info>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub signer: Signer<'info>,
}

#[derive(Accounts)]
pub struct ApproveBridge<'info> {
    #[account(
        seeds = [b"stake_config"],
        bump = stake_config.bump
    )]
    pub stake_config: Account<'info, StakeConfig>,

    #[account(
        mut,
        constraint = vault_token_account.key() == stake_config.vault_token_account @ CustomErrorCode::InvalidVaultTokenAccount,
        constraint = vault_token_account.owner == vault_authority.key() @ CustomErrorCode::InvalidVaultAuthority
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// CHECK: This is a PDA that acts as vault authority, validated by seeds constraint
    #[account(
        seeds = [b"vault_authority"],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// CHECK: bridge relay program's executable, must be the configured one
    #[account(
        executable,
        constraint = bridge_program.key() == stake_config.bridge_program @ CustomErrorCode::InvalidBridgeProgram
    )]
    pub bridge_program: UncheckedAccount<'info>,

    /// CHECK: This is the bridge's delegate PDA, validated by seeds under the bridge program
    #[account(
        seeds = [b"bridge_authority"],
        seeds::program = bridge_program.key(),
        bump
    )]
    pub bridge_authority: UncheckedAccount<'info>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

// Helper function to derive the program data address
fn get_program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}
