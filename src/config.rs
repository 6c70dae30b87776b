use crate::error::PoolResult;
use crate::keys::{KeyStore, parse_address};
use crate::rpc::ResilientRpcClient;
use crate::token_swap::{CurveKind, FeeSchedule};
use anyhow::{Context, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

/// Programme SPL Token Swap déployé (mainnet / devnet).
pub const DEFAULT_SWAP_PROGRAM_ID: &str = "SwapsVeCiPHMUAtzQWZw7RjsKjgCjhwU55QGu4U1Szw";
/// Propriétaire imposé par le programme pour le compte de frais.
pub const DEFAULT_FEE_OWNER: &str = "HfoTxFR1Tm6kGmWgYWD6J7YHVy1UwqSULUGVLXkJqaKN";

fn default_swap_program_id() -> String { DEFAULT_SWAP_PROGRAM_ID.to_string() }
fn default_fee_owner() -> String { DEFAULT_FEE_OWNER.to_string() }
fn default_keys_dir() -> String { ".".to_string() }
fn default_rpc_max_retries() -> u8 { 3 }
fn default_rpc_retry_delay_ms() -> u64 { 500 }

/// Configuration de l'environnement d'exécution, lue depuis `.env` puis les
/// variables d'environnement (SOLANA_RPC_URL, PAYER_KEYPAIR, ...).
/// Les keypairs sont des identifiants pour `KeyStore` : chemin d'un fichier
/// JSON relatif à KEYS_DIR, ou clé base58. Tous sont optionnels ici : seules
/// les commandes qui signent en ont besoin.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub solana_rpc_url: String,
    pub payer_keypair: Option<String>,
    pub pool_state_keypair: Option<String>,
    pub pool_token_account_keypair: Option<String>,
    pub trader_keypair: Option<String>,
    #[serde(default = "default_fee_owner")]
    pub fee_owner: String,
    #[serde(default = "default_swap_program_id")]
    pub swap_program_id: String,
    #[serde(default = "default_keys_dir")]
    pub keys_dir: String,
    #[serde(default = "default_rpc_max_retries")]
    pub rpc_max_retries: u8,
    #[serde(default = "default_rpc_retry_delay_ms")]
    pub rpc_retry_delay_ms: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>().context("Configuration d'environnement invalide")?;
        Ok(config)
    }

    pub fn swap_program_id(&self) -> PoolResult<Pubkey> {
        parse_address(&self.swap_program_id)
    }

    pub fn fee_owner(&self) -> PoolResult<Pubkey> {
        parse_address(&self.fee_owner)
    }

    pub fn key_store(&self) -> KeyStore {
        KeyStore::new(&self.keys_dir)
    }

    pub fn rpc_client(&self) -> ResilientRpcClient {
        ResilientRpcClient::new(self.solana_rpc_url.clone(), self.rpc_max_retries, self.rpc_retry_delay_ms)
    }
}

/// Paramètres figés à la création du pool. Les valeurs par défaut sont
/// celles utilisées jusqu'ici (trade 0/10000, owner trade 5/10000,
/// owner withdraw 0/0, host 5/100, produit constant, 2 décimales pour le LP).
/// Surchargeables via les variables `POOL_*` (ex: POOL_HOST_FEE_NUMERATOR).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PoolConfig {
    pub trade_fee_numerator: u64,
    pub trade_fee_denominator: u64,
    pub owner_trade_fee_numerator: u64,
    pub owner_trade_fee_denominator: u64,
    pub owner_withdraw_fee_numerator: u64,
    pub owner_withdraw_fee_denominator: u64,
    pub host_fee_numerator: u64,
    pub host_fee_denominator: u64,
    /// constant_product | constant_price | stable | offset
    pub curve: String,
    pub curve_parameter: u64,
    pub lp_decimals: u8,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let fees = FeeSchedule::DEFAULT;
        Self {
            trade_fee_numerator: fees.trade_fee_numerator,
            trade_fee_denominator: fees.trade_fee_denominator,
            owner_trade_fee_numerator: fees.owner_trade_fee_numerator,
            owner_trade_fee_denominator: fees.owner_trade_fee_denominator,
            owner_withdraw_fee_numerator: fees.owner_withdraw_fee_numerator,
            owner_withdraw_fee_denominator: fees.owner_withdraw_fee_denominator,
            host_fee_numerator: fees.host_fee_numerator,
            host_fee_denominator: fees.host_fee_denominator,
            curve: "constant_product".to_string(),
            curve_parameter: 0,
            lp_decimals: 2,
        }
    }
}

impl PoolConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("POOL_")
            .from_env::<PoolConfig>()
            .context("Configuration POOL_* invalide")
    }

    /// Le barème validé : un numérateur non nul sur un dénominateur nul est refusé.
    pub fn fee_schedule(&self) -> PoolResult<FeeSchedule> {
        FeeSchedule::new(
            self.trade_fee_numerator,
            self.trade_fee_denominator,
            self.owner_trade_fee_numerator,
            self.owner_trade_fee_denominator,
            self.owner_withdraw_fee_numerator,
            self.owner_withdraw_fee_denominator,
            self.host_fee_numerator,
            self.host_fee_denominator,
        )
    }

    pub fn curve(&self) -> PoolResult<CurveKind> {
        CurveKind::from_name(&self.curve, self.curve_parameter)
    }
}
