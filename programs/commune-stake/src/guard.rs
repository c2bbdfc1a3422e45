use crate::error::CustomErrorCode;
use crate::state::StakeConfig;
use anchor_lang::prelude::*;

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::UpgradeableLoaderState;

/// Reads the upgrade authority out of serialized ProgramData.
pub(crate) fn upgrade_authority_from_data(data: &[u8]) -> Result<Pubkey> {
    let state: UpgradeableLoaderState =
        bincode::deserialize(data).map_err(|_| error!(CustomErrorCode::InvalidProgramData))?;

    match state {
        UpgradeableLoaderState::ProgramData {
            upgrade_authority_address,
            ..
        } => upgrade_authority_address.ok_or_else(|| error!(CustomErrorCode::NoUpgradeAuthority)),
        _ => err!(CustomErrorCode::InvalidProgramData),
    }
}

/// The program's upgrade authority owns the ledger: only it may change policy.
pub fn validate_program_update_authority(program_data: &AccountInfo, signer: &Signer) -> Result<()> {
    let upgrade_authority = upgrade_authority_from_data(&program_data.try_borrow_data()?)?;
    require_keys_eq!(
        upgrade_authority,
        signer.key(),
        CustomErrorCode::InvalidUpgradeAuthority
    );
    Ok(())
}

/// Administrative overrides on staker records accept a configured stake
/// administrator or the upgrade authority.
pub fn validate_stake_administrator(
    config: &StakeConfig,
    program_data: &AccountInfo,
    signer: &Signer,
) -> Result<()> {
    if config.is_stake_administrator(&signer.key()) {
        return Ok(());
    }

    match upgrade_authority_from_data(&program_data.try_borrow_data()?) {
        Ok(upgrade_authority) if upgrade_authority == signer.key() => Ok(()),
        _ => {
            msg!("{} is not a stake administrator", signer.key());
            err!(CustomErrorCode::Unauthorized)
        }
    }
}
