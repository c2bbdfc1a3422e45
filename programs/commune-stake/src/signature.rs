use crate::error::CustomErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;
use anchor_lang::solana_program::secp256k1_recover::secp256k1_recover;

/// Prefix applied to a 32-byte message hash before signing, as done by
/// `personal_sign` style wallets.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

pub const SIGNER_IDENTITY_LEN: usize = 20;

/// Recoverable secp256k1 signature over a destination address claim.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AddressProof {
    pub signature: [u8; 64],
    /// 0 or 1, or the legacy 27 or 28.
    pub recovery_id: u8,
}

/// keccak256(staker || destination_address), the tightly packed claim the
/// signer identity signs off-chain.
pub fn destination_message_hash(staker: &Pubkey, destination_address: &str) -> [u8; 32] {
    keccak::hashv(&[staker.as_ref(), destination_address.as_bytes()]).to_bytes()
}

pub fn personal_message_digest(message_hash: &[u8; 32]) -> [u8; 32] {
    keccak::hashv(&[PERSONAL_MESSAGE_PREFIX, message_hash]).to_bytes()
}

/// Last 20 bytes of keccak256 over the uncompressed public key (without the
/// 0x04 tag).
pub fn signer_identity_of(public_key: &[u8; 64]) -> [u8; SIGNER_IDENTITY_LEN] {
    let hash = keccak::hash(public_key).to_bytes();
    let mut identity = [0u8; SIGNER_IDENTITY_LEN];
    identity.copy_from_slice(&hash[32 - SIGNER_IDENTITY_LEN..]);
    identity
}

pub fn recover_signer_identity(
    digest: &[u8; 32],
    proof: &AddressProof,
) -> Result<[u8; SIGNER_IDENTITY_LEN]> {
    let recovery_id = match proof.recovery_id {
        0 | 1 => proof.recovery_id,
        27 | 28 => proof.recovery_id - 27,
        _ => return err!(CustomErrorCode::InvalidSignature),
    };

    let public_key = secp256k1_recover(digest, recovery_id, &proof.signature)
        .map_err(|_| error!(CustomErrorCode::InvalidSignature))?;

    Ok(signer_identity_of(&public_key.to_bytes()))
}

/// Checks that `signer_identity` signed the claim binding `staker` to
/// `destination_address`.
pub fn verify_destination_proof(
    staker: &Pubkey,
    destination_address: &str,
    proof: &AddressProof,
    signer_identity: &[u8; SIGNER_IDENTITY_LEN],
) -> Result<()> {
    let digest = personal_message_digest(&destination_message_hash(staker, destination_address));
    let recovered = recover_signer_identity(&digest, proof)?;

    if recovered != *signer_identity {
        msg!(
            "Destination proof signed by 0x{}, expected 0x{}",
            hex::encode(recovered),
            hex::encode(signer_identity)
        );
        return err!(CustomErrorCode::InvalidSignature);
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_signer {
    use super::*;
    use libsecp256k1::{Message, PublicKey, SecretKey};

    pub struct TestSigner {
        secret_key: SecretKey,
    }

    impl TestSigner {
        pub fn new(seed: u8) -> Self {
            let mut bytes = [0u8; 32];
            bytes[31] = seed;
            Self {
                secret_key: SecretKey::parse(&bytes).unwrap(),
            }
        }

        pub fn identity(&self) -> [u8; SIGNER_IDENTITY_LEN] {
            let serialized = PublicKey::from_secret_key(&self.secret_key).serialize();
            let mut public_key = [0u8; 64];
            public_key.copy_from_slice(&serialized[1..]);
            signer_identity_of(&public_key)
        }

        pub fn sign_digest(&self, digest: &[u8; 32]) -> AddressProof {
            let (signature, recovery_id) =
                libsecp256k1::sign(&Message::parse(digest), &self.secret_key);
            AddressProof {
                signature: signature.serialize(),
                recovery_id: recovery_id.serialize(),
            }
        }

        pub fn prove(&self, staker: &Pubkey, destination_address: &str) -> AddressProof {
            let digest =
                personal_message_digest(&destination_message_hash(staker, destination_address));
            self.sign_digest(&digest)
        }
    }
}
