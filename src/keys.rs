// src/keys.rs

use crate::error::{PoolError, PoolResult};
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Fournit les keypairs (payer, compte d'état du pool, compte LP...) et les
/// adresses statiques. Les keypairs sont rendus à l'appelant, jamais persistés.
#[derive(Debug, Clone)]
pub struct KeyStore {
    base_dir: PathBuf,
}

impl KeyStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    /// Charge un keypair. `identifier` est soit un fichier JSON au format du
    /// CLI Solana (tableau de 64 octets), relatif au répertoire de base, soit
    /// une clé privée encodée en base58.
    pub fn load_keypair(&self, identifier: &str) -> PoolResult<Keypair> {
        let path = self.resolve(identifier);
        if path.is_file() {
            return read_keypair_json(&path);
        }

        match bs58::decode(identifier).into_vec() {
            Ok(bytes) if bytes.len() == 64 => keypair_from_bytes(&bytes, identifier),
            _ => Err(PoolError::KeyNotFound(identifier.to_string())),
        }
    }

    /// Parse une adresse fixée à l'extérieur (fee owner, pool existant...).
    pub fn static_address(&self, literal: &str) -> PoolResult<Pubkey> {
        parse_address(literal)
    }

    fn resolve(&self, identifier: &str) -> PathBuf {
        let path = Path::new(identifier);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new(".")
    }
}

pub fn parse_address(literal: &str) -> PoolResult<Pubkey> {
    Pubkey::from_str(literal.trim()).map_err(|_| PoolError::InvalidAddress(literal.to_string()))
}

fn read_keypair_json(path: &Path) -> PoolResult<Keypair> {
    let label = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|_| PoolError::KeyNotFound(label.clone()))?;
    let bytes: Vec<u8> = serde_json::from_str(&raw)
        .map_err(|e| PoolError::InvalidKeyMaterial(format!("{label} : {e}")))?;
    keypair_from_bytes(&bytes, &label)
}

fn keypair_from_bytes(bytes: &[u8], label: &str) -> PoolResult<Keypair> {
    Keypair::try_from(bytes).map_err(|e| PoolError::InvalidKeyMaterial(format!("{label} : {e}")))
}
