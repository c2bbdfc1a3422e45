use crate::account_structs::*;
use crate::error::*;
use crate::events::*;
use crate::guard::validate_program_update_authority;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

// Only the relay's upgrade authority may create the config and become its
// authority.
pub fn initialize(ctx: Context<Initialize>, allowed_external_caller_program: Pubkey) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer.key())?;

    let config = &mut ctx.accounts.bridge_config;
    config.authority = ctx.accounts.signer.key();
    config.mint = ctx.accounts.mint.key();
    config.custody_token_account = ctx.accounts.custody_token_account.key();
    config.allowed_external_caller_program = allowed_external_caller_program;
    config.relayed_total = 0;
    config.sequence = 0;
    config.bump = ctx.bumps.bridge_config;
    config.paused = false;

    msg!(
        "Relay initialized for caller program {} with custody {}",
        allowed_external_caller_program,
        config.custody_token_account
    );
    Ok(())
}

// Pull the staked amount from the caller's custody account into bridge
// custody. The bridge_authority PDA is the delegate on the source account, so
// it signs the transfer; the caller's PDA signature was already checked by the
// account constraints.
pub fn bridge_back(ctx: Context<BridgeBack>, amount: u64, destination_address: String) -> Result<()> {
    require!(
        !ctx.accounts.bridge_config.paused,
        CustomErrorCode::RelayPaused
    );
    require!(
        !destination_address.is_empty(),
        CustomErrorCode::EmptyDestinationAddress
    );

    let sequence = ctx.accounts.bridge_config.record_relay(amount)?;
    msg!("Relay #{}: {} to {}", sequence, amount, destination_address);

    let seeds: &[&[u8]] = &[b"bridge_authority", &[ctx.bumps.bridge_authority]];
    let signer = &[&seeds[..]];
    let cpi_accounts = Transfer {
        from: ctx.accounts.source_token_account.to_account_info(),
        to: ctx.accounts.custody_token_account.to_account_info(),
        authority: ctx.accounts.bridge_authority.to_account_info(),
    };
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            cpi_accounts,
            signer,
        ),
        amount,
    )?;

    emit!(BridgedBack {
        source: ctx.accounts.source_token_account.key(),
        amount,
        destination_address,
        sequence,
        relayed_total: ctx.accounts.bridge_config.relayed_total,
    });

    Ok(())
}

pub fn pause(ctx: Context<UpdateRelay>, pause: bool) -> Result<()> {
    ctx.accounts.bridge_config.paused = pause;

    msg!("Relay paused: {}", pause);

    Ok(())
}

pub fn update_allowed_caller(
    ctx: Context<UpdateRelay>,
    new_allowed_external_caller_program: Pubkey,
) -> Result<()> {
    let config = &mut ctx.accounts.bridge_config;
    let old_program = config.allowed_external_caller_program;
    config.allowed_external_caller_program = new_allowed_external_caller_program;

    emit!(AllowedCallerUpdated {
        authority: ctx.accounts.authority.key(),
        old_program,
        new_program: new_allowed_external_caller_program,
    });

    Ok(())
}
