// src/derivation/authority.rs

use crate::error::{PoolError, PoolResult};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

/// Autorité du pool : une PDA du programme de swap, dérivée de l'adresse du
/// compte d'état. Elle n'a pas de clé privée, c'est le programme lui-même qui
/// signe pour elle pendant l'exécution. Ce type n'implémente volontairement
/// pas `Signer` : impossible de le passer par erreur comme signataire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramAuthority {
    address: Pubkey,
    bump: u8,
}

impl ProgramAuthority {
    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn bump(&self) -> u8 {
        self.bump
    }

    /// Re-dérive l'autorité et vérifie qu'elle correspond à celle transmise
    /// entre deux phases (ex: copiée depuis la sortie de `provision`).
    pub fn verify(pool_state: &Pubkey, program_id: &Pubkey, expected: &Pubkey) -> PoolResult<Self> {
        let derived = derive_authority(pool_state, program_id)?;
        if derived.address != *expected {
            return Err(PoolError::AuthorityMismatch {
                expected: *expected,
                derived: derived.address,
            });
        }
        Ok(derived)
    }
}

/// Dérive l'autorité du pool à partir de `[pool_state]`.
/// On parcourt les bumps de 255 vers 0 ; certains donnent une adresse sur la
/// courbe et sont simplement ignorés.
pub fn derive_authority(pool_state: &Pubkey, program_id: &Pubkey) -> PoolResult<ProgramAuthority> {
    let (address, bump) = Pubkey::try_find_program_address(&[pool_state.as_ref()], program_id)
        .ok_or(PoolError::DerivationExhausted { pool_state: *pool_state })?;

    debug!(pool_state = %pool_state, authority = %address, bump, "Autorité du pool dérivée");
    Ok(ProgramAuthority { address, bump })
}
