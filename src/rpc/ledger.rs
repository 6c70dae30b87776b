// src/rpc/ledger.rs

use crate::error::{PoolError, PoolResult};
use crate::rpc::ResilientRpcClient;
use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    rpc_request::{RpcError, RpcResponseErrorData},
};
use solana_program_pack::Pack;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction};
use spl_token::state::Account as SplTokenAccount;

/// Ce dont les orchestrateurs ont besoin du réseau, et rien de plus.
/// Implémenté par `ResilientRpcClient` en production et par un ledger simulé
/// dans les tests.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Solde (en unités de base) d'un compte SPL Token.
    /// `AccountNotFound` si le compte n'est pas initialisé.
    async fn get_token_balance(&self, account: &Pubkey) -> PoolResult<u64>;

    /// Données brutes d'un compte, `AccountNotFound` s'il n'existe pas.
    async fn get_account_data(&self, account: &Pubkey) -> PoolResult<Vec<u8>>;

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> PoolResult<u64>;

    async fn get_latest_blockhash(&self) -> PoolResult<Hash>;

    /// Bloque jusqu'à la confirmation ou le rejet. Un rejet donne
    /// `RejectedTransaction` avec le diagnostic du réseau.
    async fn send_and_confirm_transaction(&self, transaction: &VersionedTransaction) -> PoolResult<Signature>;
}

/// Sépare un vrai rejet de la transaction (erreur d'instruction, preflight)
/// d'une simple erreur de transport.
fn classify_send_error(error: ClientError) -> PoolError {
    if let ClientErrorKind::RpcError(RpcError::RpcResponseError {
        data: RpcResponseErrorData::SendTransactionPreflightFailure(simulation),
        message,
        ..
    }) = error.kind()
    {
        let mut reason = match &simulation.err {
            Some(err) => format!("{err:?}"),
            None => message.clone(),
        };
        if let Some(logs) = &simulation.logs {
            reason.push_str(&format!(" | logs: {}", logs.join(" ; ")));
        }
        return PoolError::RejectedTransaction { reason };
    }

    match error.get_transaction_error() {
        Some(err) => PoolError::RejectedTransaction { reason: format!("{err}") },
        None => PoolError::Rpc(error.to_string()),
    }
}

#[async_trait]
impl LedgerClient for ResilientRpcClient {
    async fn get_token_balance(&self, account: &Pubkey) -> PoolResult<u64> {
        let data = self.get_account_data(account).await?;
        let token_account = SplTokenAccount::unpack(&data).map_err(|e| PoolError::InvalidAccountData {
            address: *account,
            reason: e.to_string(),
        })?;
        Ok(token_account.amount)
    }

    async fn get_account_data(&self, account: &Pubkey) -> PoolResult<Vec<u8>> {
        let found = self
            .get_account(account)
            .await
            .map_err(|e| PoolError::Rpc(e.to_string()))?;
        found
            .map(|acc| acc.data)
            .ok_or(PoolError::AccountNotFound(*account))
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> PoolResult<u64> {
        ResilientRpcClient::get_minimum_balance_for_rent_exemption(self, data_len)
            .await
            .map_err(|e| PoolError::Rpc(e.to_string()))
    }

    async fn get_latest_blockhash(&self) -> PoolResult<Hash> {
        ResilientRpcClient::get_latest_blockhash(self)
            .await
            .map_err(|e| PoolError::Rpc(e.to_string()))
    }

    async fn send_and_confirm_transaction(&self, transaction: &VersionedTransaction) -> PoolResult<Signature> {
        ResilientRpcClient::send_and_confirm_transaction(self, transaction)
            .await
            .map_err(classify_send_error)
    }
}
