use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::VersionedTransaction,
};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::warn;

/// Un "wrapper" autour du RpcClient de Solana qui ajoute une logique de
/// ré-essai automatique pour les LECTURES qui échouent à cause d'erreurs réseau
/// temporaires. Les envois de transactions ne sont jamais ré-essayés : un échec
/// remonte tel quel à l'appelant.
#[derive(Clone)]
pub struct ResilientRpcClient {
    client: Arc<RpcClient>,
    max_retries: u8,
    delay_ms: u64,
}

impl ResilientRpcClient {
    /// Construit un client résilient au niveau de commitment `confirmed`.
    pub fn new(rpc_url: String, max_retries: u8, delay_ms: u64) -> Self {
        Self {
            client: Arc::new(RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed())),
            max_retries,
            delay_ms,
        }
    }

    /// Détermine si une erreur du client est temporaire et si une nouvelle tentative doit être effectuée.
    fn is_retryable(error: &ClientError) -> bool {
        matches!(
            error.kind(),
            ClientErrorKind::Reqwest(_) | ClientErrorKind::RpcError(_) | ClientErrorKind::Io(_)
        )
    }

    async fn with_retries<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if Self::is_retryable(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(operation, attempt, error = %e, "Appel RPC en échec, nouvelle tentative");
                    sleep(Duration::from_millis(self.delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    // --- LECTURES (avec ré-essai) ---

    /// Récupère un compte, `None` s'il n'existe pas (pas d'erreur dans ce cas).
    pub async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, ClientError> {
        let commitment = self.client.commitment();
        self.with_retries("get_account", || self.client.get_account_with_commitment(pubkey, commitment))
            .await
            .map(|response| response.value)
    }

    pub async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, ClientError> {
        self.with_retries("get_minimum_balance_for_rent_exemption", || {
            self.client.get_minimum_balance_for_rent_exemption(data_len)
        })
        .await
    }

    pub async fn get_latest_blockhash(&self) -> Result<Hash, ClientError> {
        self.with_retries("get_latest_blockhash", || self.client.get_latest_blockhash()).await
    }

    // --- ENVOI (sans ré-essai) ---

    /// Envoie et attend la confirmation d'une transaction.
    pub async fn send_and_confirm_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature, ClientError> {
        self.client.send_and_confirm_transaction(transaction).await
    }
}
