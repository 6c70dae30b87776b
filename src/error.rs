// src/error.rs

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Toutes les erreurs remontées par les orchestrateurs de pool et de swap.
/// Aucune n'est avalée en interne : l'appelant décide quoi en faire.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Un des vaults du pool est vide : la phase 2 ne peut pas démarrer.
    #[error("pool non financé : solde token A = {token_a_balance}, solde token B = {token_b_balance}")]
    UnfundedPool {
        token_a_balance: u64,
        token_b_balance: u64,
    },

    /// Le réseau a refusé la transaction (fonds insuffisants, compte déjà existant,
    /// erreur du programme, slippage...). `reason` est le diagnostic brut du réseau.
    #[error("transaction rejetée par le réseau : {reason}")]
    RejectedTransaction { reason: String },

    #[error("aucune adresse d'autorité valide pour le compte d'état {pool_state}")]
    DerivationExhausted { pool_state: Pubkey },

    #[error("l'autorité fournie {expected} ne correspond pas à l'autorité dérivée {derived}")]
    AuthorityMismatch { expected: Pubkey, derived: Pubkey },

    #[error("le compte d'état {provided} ne correspond pas au keypair du pool {expected}")]
    PoolStateMismatch { expected: Pubkey, provided: Pubkey },

    #[error("clé introuvable : {0}")]
    KeyNotFound(String),

    #[error("matériel de clé invalide : {0}")]
    InvalidKeyMaterial(String),

    #[error("compte introuvable : {0}")]
    AccountNotFound(Pubkey),

    #[error("données de compte invalides pour {address} : {reason}")]
    InvalidAccountData { address: Pubkey, reason: String },

    #[error("barème de frais invalide : {0}")]
    InvalidFeeSchedule(String),

    #[error("courbe inconnue : {0}")]
    InvalidCurve(String),

    #[error("adresse invalide : {0}")]
    InvalidAddress(String),

    #[error("échec de la signature : {0}")]
    Signing(String),

    #[error("échec de construction d'instruction : {0}")]
    InstructionBuild(String),

    #[error("aucune instruction à soumettre")]
    EmptyTransaction,

    /// Erreur de transport (RPC injoignable, timeout...), distincte d'un rejet.
    #[error("erreur RPC : {0}")]
    Rpc(String),
}

pub type PoolResult<T> = std::result::Result<T, PoolError>;
