use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = signer,
        space = BridgeConfig::LEN,
        seeds = [b"bridge_config"],
        bump
    )]
    pub bridge_config: Account<'info, BridgeConfig>,

    /// CHECK: This is a PDA that acts as the delegate pulling funds out of
    /// staking custody accounts and as the owner of the bridge custody account,
    /// validated by seeds constraint
    #[account(
        seeds = [b"bridge_authority"],
        bump
    )]
    pub bridge_authority: UncheckedAccount<'info>,

    #[account(
        constraint = custody_token_account.mint == mint.key() @ CustomErrorCode::InvalidMint,
        constraint = custody_token_account.owner == bridge_authority.key() @ CustomErrorCode::InvalidCustodyAccount
    )]
    pub custody_token_account: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct BridgeBack<'info> {
    #[account(
        mut,
        seeds = [b"bridge_config"],
        bump = bridge_config.bump
    )]
    pub bridge_config: Account<'info, BridgeConfig>,

    /// PDA that proves this call is from the allowed staking program.
    /// Only that program can sign for it during CPI.
    #[account(
        seeds = [b"external_caller_authority"],
        bump,
        seeds::program = bridge_config.allowed_external_caller_program
    )]
    pub external_caller_authority: Signer<'info>,

    /// CHECK: This is a PDA that acts as delegate over the source account, validated by seeds constraint
    #[account(
        seeds = [b"bridge_authority"],
        bump
    )]
    pub bridge_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = source_token_account.mint == bridge_config.mint @ CustomErrorCode::InvalidMint,
        constraint = source_token_account.delegate == Some(bridge_authority.key()).into() @ CustomErrorCode::InvalidDelegate
    )]
    pub source_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = custody_token_account.key() == bridge_config.custody_token_account @ CustomErrorCode::InvalidCustodyAccount
    )]
    pub custody_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct UpdateRelay<'info> {
    #[account(
        mut,
        seeds = [b"bridge_config"],
        bump = bridge_config.bump
    )]
    pub bridge_config: Account<'info, BridgeConfig>,

    #[account(
        constraint = authority.key() == bridge_config.authority @ CustomErrorCode::InvalidAuthority
    )]
    pub authority: Signer<'info>,
}

fn get_program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}
