use crate::account_structs::*;
use crate::error::*;
use crate::events::*;
use crate::guard::{validate_program_update_authority, validate_stake_administrator};
use crate::signature::{AddressProof, SIGNER_IDENTITY_LEN};
use crate::state::{
    book_stake, load_staker_record, non_empty, process_unstake, pull_allowance,
    store_staker_record, validate_validator, StakeRequest, MAX_ADMINISTRATORS,
};
use anchor_lang::prelude::*;
use anchor_spl::token::spl_token::instruction::AuthorityType;
use anchor_spl::token::{self, Approve, Transfer};

/*
# Custody Flow

Deposits never stay with the ledger. A stake moves tokens in two hops inside
one transaction:

1. user token account -> vault token account
   The user approves vault_authority as delegate on their token account
   beforehand; that delegation is the pull allowance checked against the
   stake amount. vault_authority signs the transfer as delegate.

2. vault token account -> bridge custody
   vault_authority delegated u64::MAX to the bridge's bridge_authority PDA at
   initialize (and again on approve_bridge). The ledger calls bridge_back
   through CPI, signing with its external_caller_authority PDA so the bridge
   can tell the call came from this program; the bridge then pulls the amount
   with its delegate.

Ledger bookkeeping is written before either CPI. Any failing CPI fails the
whole transaction, which discards the bookkeeping along with the transfers.

Unstaking is bookkeeping only: the funds are already with the bridge and are
released on the Commune side.
 */

pub fn initialize(
    ctx: Context<Initialize>,
    signer_identity: [u8; 20],
    default_validator: String,
    min_deposit: u64,
    capacity_limit: u64,
    allow_custom_validator: bool,
    stake_administrators: Vec<Pubkey>,
) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    require!(
        stake_administrators.len() <= MAX_ADMINISTRATORS,
        CustomErrorCode::TooManyAdministrators
    );
    require!(
        signer_identity != [0u8; SIGNER_IDENTITY_LEN],
        CustomErrorCode::InvalidSignerIdentity
    );
    validate_validator(&default_validator)?;

    let config = &mut ctx.accounts.stake_config;
    config.mint = ctx.accounts.mint.key();
    config.vault_token_account = ctx.accounts.vault_token_account.key();
    config.bridge_program = ctx.accounts.bridge_program.key();
    config.signer_identity = signer_identity;
    config.default_validator = default_validator;
    config.allow_custom_validator = allow_custom_validator;
    config.min_deposit = min_deposit;
    config.capacity_limit = capacity_limit;
    config.total_staked = 0;
    config.stake_administrators = stake_administrators;
    config.bump = ctx.bumps.stake_config;
    config.paused = false;

    // The vault token account must be owned by the program-derived address
    // before the bridge allowance can be granted from it.
    if ctx.accounts.vault_token_account.owner == ctx.accounts.signer.key() {
        token::set_authority(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                token::SetAuthority {
                    account_or_mint: ctx.accounts.vault_token_account.to_account_info(),
                    current_authority: ctx.accounts.signer.to_account_info(),
                },
            ),
            AuthorityType::AccountOwner,
            Some(ctx.accounts.vault_authority.key()),
        )?;
    }

    approve_bridge_delegate(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.bridge_authority.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        ctx.bumps.vault_authority,
    )?;

    msg!(
        "Ledger initialized: signer identity 0x{}, default validator {}",
        hex::encode(signer_identity),
        ctx.accounts.stake_config.default_validator
    );
    Ok(())
}

pub fn stake(
    ctx: Context<Stake>,
    amount: u64,
    destination_address: Option<String>,
    validator: Option<String>,
    proof: Option<AddressProof>,
) -> Result<()> {
    let staker = ctx.accounts.signer.key();
    let user_token_account = &ctx.accounts.user_token_account;
    let allowance = pull_allowance(
        user_token_account.delegate.into(),
        user_token_account.delegated_amount,
        &ctx.accounts.vault_authority.key(),
    );
    let balance = user_token_account.amount;

    let request = StakeRequest {
        amount,
        destination_address: destination_address.as_deref(),
        validator: validator.as_deref(),
        proof: proof.as_ref(),
    };
    let booked = book_stake(
        &mut ctx.accounts.stake_config,
        &mut ctx.accounts.staker_record,
        &staker,
        &request,
        allowance,
        balance,
    )?;
    ctx.accounts.staker_record.bump = ctx.bumps.staker_record;

    msg!("Stake amount: {}", amount);
    msg!("Destination address: {}", booked.destination_address);
    msg!("Validator: {}", booked.validator);
    msg!("Total staked: {}", booked.total_staked);

    let seeds: &[&[u8]] = &[b"vault_authority", &[ctx.bumps.vault_authority]];
    let signer = &[&seeds[..]];
    let cpi_accounts = Transfer {
        from: ctx.accounts.user_token_account.to_account_info(),
        to: ctx.accounts.vault_token_account.to_account_info(),
        authority: ctx.accounts.vault_authority.to_account_info(),
    };
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            cpi_accounts,
            signer,
        ),
        amount,
    )?;

    // Sign with the external_caller_authority PDA so the bridge accepts the call
    let seeds: &[&[u8]] = &[
        b"external_caller_authority",
        &[ctx.bumps.external_caller_authority],
    ];
    let signer = &[&seeds[..]];
    let cpi_accounts = commune_bridge::cpi::accounts::BridgeBack {
        bridge_config: ctx.accounts.bridge_config.to_account_info(),
        external_caller_authority: ctx.accounts.external_caller_authority.to_account_info(),
        bridge_authority: ctx.accounts.bridge_authority.to_account_info(),
        source_token_account: ctx.accounts.vault_token_account.to_account_info(),
        custody_token_account: ctx.accounts.bridge_custody_token_account.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
    };
    commune_bridge::cpi::bridge_back(
        CpiContext::new_with_signer(
            ctx.accounts.bridge_program.to_account_info(),
            cpi_accounts,
            signer,
        ),
        amount,
        booked.destination_address.clone(),
    )?;

    msg!("Emitting Staked");
    emit!(Staked {
        user: staker,
        amount,
        destination_address: booked.destination_address,
        validator: booked.validator,
        total_staked: booked.total_staked,
    });
    msg!("Emitted Staked");

    Ok(())
}

pub fn init_unstake(ctx: Context<Unstake>, amount: u64, unstake_all: bool) -> Result<()> {
    let mut record =
        load_staker_record(&ctx.accounts.staker_record, CustomErrorCode::NoStakeToUnstake)?;
    let withdrawal = process_unstake(
        &mut ctx.accounts.stake_config,
        &mut record,
        amount,
        unstake_all,
    )?;
    store_staker_record(&ctx.accounts.staker_record, &record)?;
    msg!(
        "Unstaked {} of {} (requested {}, all: {})",
        withdrawal.amount,
        withdrawal.prior_amount,
        amount,
        unstake_all
    );

    emit!(InitUnstake {
        user: ctx.accounts.signer.key(),
        authority: ctx.accounts.signer.key(),
        amount: withdrawal.amount,
        prior_amount: withdrawal.prior_amount,
        unstake_all,
        total_staked: withdrawal.total_staked,
    });

    Ok(())
}

// Same bookkeeping as init_unstake, on any staker's record, for a stake
// administrator or the upgrade authority.
pub fn admin_unstake(ctx: Context<AdminUnstake>, amount: u64, unstake_all: bool) -> Result<()> {
    validate_stake_administrator(
        &ctx.accounts.stake_config,
        &ctx.accounts.program_data,
        &ctx.accounts.signer,
    )?;

    let mut record =
        load_staker_record(&ctx.accounts.staker_record, CustomErrorCode::NoStakeToUnstake)?;
    let withdrawal = process_unstake(
        &mut ctx.accounts.stake_config,
        &mut record,
        amount,
        unstake_all,
    )?;
    store_staker_record(&ctx.accounts.staker_record, &record)?;
    msg!(
        "Admin {} unstaked {} of {} for {}",
        ctx.accounts.signer.key(),
        withdrawal.amount,
        withdrawal.prior_amount,
        ctx.accounts.user.key()
    );

    emit!(InitUnstake {
        user: ctx.accounts.user.key(),
        authority: ctx.accounts.signer.key(),
        amount: withdrawal.amount,
        prior_amount: withdrawal.prior_amount,
        unstake_all,
        total_staked: withdrawal.total_staked,
    });

    Ok(())
}

pub fn change_validator(ctx: Context<ChangeValidator>, new_validator: Option<String>) -> Result<()> {
    let mut record = load_staker_record(
        &ctx.accounts.staker_record,
        CustomErrorCode::NoStakeToChangeValidator,
    )?;
    let validator = ctx
        .accounts
        .stake_config
        .user_validator_change_target(&record, non_empty(new_validator.as_deref()))?;
    record.validator = Some(validator.clone());
    store_staker_record(&ctx.accounts.staker_record, &record)?;

    msg!("Validator changed to {}", validator);
    emit!(ValidatorChanged {
        user: ctx.accounts.signer.key(),
        authority: ctx.accounts.signer.key(),
        validator,
    });

    Ok(())
}

// Administrative override: not subject to allow_custom_validator.
pub fn admin_change_validator(
    ctx: Context<AdminChangeValidator>,
    new_validator: Option<String>,
) -> Result<()> {
    validate_stake_administrator(
        &ctx.accounts.stake_config,
        &ctx.accounts.program_data,
        &ctx.accounts.signer,
    )?;

    let mut record = load_staker_record(
        &ctx.accounts.staker_record,
        CustomErrorCode::NoStakeToChangeValidator,
    )?;
    let validator = ctx
        .accounts
        .stake_config
        .validator_change_target(&record, non_empty(new_validator.as_deref()))?;
    record.validator = Some(validator.clone());
    store_staker_record(&ctx.accounts.staker_record, &record)?;

    msg!(
        "Admin {} changed validator of {} to {}",
        ctx.accounts.signer.key(),
        ctx.accounts.user.key(),
        validator
    );
    emit!(ValidatorChanged {
        user: ctx.accounts.user.key(),
        authority: ctx.accounts.signer.key(),
        validator,
    });

    Ok(())
}

pub fn pause(ctx: Context<Pause>, pause: bool) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    let config = &mut ctx.accounts.stake_config;
    config.paused = pause;

    msg!("Staking paused: {}", pause);

    Ok(())
}

pub fn set_min_deposit(ctx: Context<UpdateConfig>, min_deposit: u64) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    ctx.accounts.stake_config.min_deposit = min_deposit;

    msg!("Minimum deposit: {}", min_deposit);

    Ok(())
}

pub fn set_capacity_limit(ctx: Context<UpdateConfig>, capacity_limit: u64) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    ctx.accounts.stake_config.capacity_limit = capacity_limit;

    msg!("Capacity limit: {} (0 = unlimited)", capacity_limit);

    Ok(())
}

pub fn set_default_validator(ctx: Context<UpdateConfig>, default_validator: String) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    validate_validator(&default_validator)?;

    msg!("Default validator: {}", default_validator);
    ctx.accounts.stake_config.default_validator = default_validator;

    Ok(())
}

pub fn set_allow_custom_validator(ctx: Context<UpdateConfig>, allow: bool) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    ctx.accounts.stake_config.allow_custom_validator = allow;

    msg!("Custom validators allowed: {}", allow);

    Ok(())
}

pub fn set_signer_identity(
    ctx: Context<UpdateConfig>,
    new_identity: [u8; 20],
) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    require!(
        new_identity != [0u8; SIGNER_IDENTITY_LEN],
        CustomErrorCode::InvalidSignerIdentity
    );

    let config = &mut ctx.accounts.stake_config;
    let old_identity = config.signer_identity;
    config.signer_identity = new_identity;

    emit!(SignerIdentityUpdated {
        admin: ctx.accounts.signer.key(),
        old_identity,
        new_identity,
    });

    Ok(())
}

// Update the list of stake administrators (only program update authority can do this)
pub fn update_stake_administrators(
    ctx: Context<UpdateStakeAdministrators>,
    new_administrators: Vec<Pubkey>,
) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;

    require!(
        new_administrators.len() <= MAX_ADMINISTRATORS,
        CustomErrorCode::TooManyAdministrators
    );

    let config = &mut ctx.accounts.stake_config;
    config.stake_administrators = new_administrators;

    msg!(
        "Stake administrators updated. New count: {}",
        config.stake_administrators.len()
    );
    Ok(())
}

// Point the ledger at a different relay program. The new relay has no
// allowance over the vault until approve_bridge is called.
pub fn set_bridge_program(ctx: Context<SetBridgeProgram>) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;

    let config = &mut ctx.accounts.stake_config;
    let old_program = config.bridge_program;
    config.bridge_program = ctx.accounts.new_bridge_program.key();

    emit!(BridgeProgramUpdated {
        admin: ctx.accounts.signer.key(),
        old_program,
        new_program: config.bridge_program,
    });

    Ok(())
}

pub fn approve_bridge(ctx: Context<ApproveBridge>) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;

    approve_bridge_delegate(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.bridge_authority.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        ctx.bumps.vault_authority,
    )?;

    msg!(
        "Bridge delegate {} approved for the maximum amount",
        ctx.accounts.bridge_authority.key()
    );
    Ok(())
}

// SPL token accounts hold a single delegate, so approving replaces any
// previous bridge's allowance.
fn approve_bridge_delegate<'info>(
    token_program: AccountInfo<'info>,
    vault_token_account: AccountInfo<'info>,
    bridge_authority: AccountInfo<'info>,
    vault_authority: AccountInfo<'info>,
    vault_authority_bump: u8,
) -> Result<()> {
    let seeds: &[&[u8]] = &[b"vault_authority", &[vault_authority_bump]];
    let signer = &[&seeds[..]];
    token::approve(
        CpiContext::new_with_signer(
            token_program,
            Approve {
                to: vault_token_account,
                delegate: bridge_authority,
                authority: vault_authority,
            },
            signer,
        ),
        u64::MAX,
    )
}
