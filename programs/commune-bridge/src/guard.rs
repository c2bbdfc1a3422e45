use crate::error::CustomErrorCode;
use anchor_lang::prelude::*;

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::UpgradeableLoaderState;

fn upgrade_authority_from_data(data: &[u8]) -> Result<Pubkey> {
    match bincode::deserialize::<UpgradeableLoaderState>(data) {
        Ok(UpgradeableLoaderState::ProgramData {
            upgrade_authority_address: Some(authority),
            ..
        }) => Ok(authority),
        Ok(UpgradeableLoaderState::ProgramData { .. }) => err!(CustomErrorCode::NoUpgradeAuthority),
        _ => err!(CustomErrorCode::InvalidProgramData),
    }
}

/// Only the relay's upgrade authority passes.
pub fn validate_program_update_authority(program_data: &AccountInfo, signer: &Pubkey) -> Result<()> {
    let upgrade_authority = upgrade_authority_from_data(&program_data.try_borrow_data()?)?;
    require_keys_eq!(
        upgrade_authority,
        *signer,
        CustomErrorCode::InvalidUpgradeAuthority
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    fn error_code(err: Error) -> u32 {
        match err {
            Error::AnchorError(e) => e.error_code_number,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn program_data(upgrade_authority_address: Option<Pubkey>) -> Vec<u8> {
        bincode::serialize(&UpgradeableLoaderState::ProgramData {
            slot: 7,
            upgrade_authority_address,
        })
        .unwrap()
    }

    #[test]
    fn test_only_upgrade_authority_passes() {
        let authority = Pubkey::new_unique();
        let mut data = program_data(Some(authority));
        let key = Pubkey::new_unique();
        let owner = bpf_loader_upgradeable_id();
        let mut lamports = 1u64;
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);

        validate_program_update_authority(&info, &authority).unwrap();

        let err = validate_program_update_authority(&info, &Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(err), u32::from(CustomErrorCode::InvalidUpgradeAuthority));
    }

    #[test]
    fn test_immutable_relay_cannot_be_initialized() {
        let err = upgrade_authority_from_data(&program_data(None)).unwrap_err();
        assert_eq!(error_code(err), u32::from(CustomErrorCode::NoUpgradeAuthority));
    }

    #[test]
    fn test_garbage_program_data_is_rejected() {
        let err = upgrade_authority_from_data(&[0xFF; 3]).unwrap_err();
        assert_eq!(error_code(err), u32::from(CustomErrorCode::InvalidProgramData));
    }

    #[allow(deprecated)]
    fn bpf_loader_upgradeable_id() -> Pubkey {
        anchor_lang::solana_program::bpf_loader_upgradeable::id()
    }
}
