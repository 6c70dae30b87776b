// src/orchestrator/inspect.rs

use crate::error::{PoolError, PoolResult};
use crate::rpc::LedgerClient;
use crate::token_swap::{PoolState, decode_pool_state};
use solana_sdk::pubkey::Pubkey;

/// Relit le compte d'état d'un pool et le décode.
pub async fn fetch_pool_state(client: &dyn LedgerClient, pool_state: &Pubkey) -> PoolResult<PoolState> {
    let data = client.get_account_data(pool_state).await?;
    decode_pool_state(pool_state, &data)
}

/// Comme `fetch_pool_state`, mais exige un pool initialisé.
pub async fn fetch_active_pool_state(client: &dyn LedgerClient, pool_state: &Pubkey) -> PoolResult<PoolState> {
    let state = fetch_pool_state(client, pool_state).await?;
    if !state.is_initialized {
        return Err(PoolError::InvalidAccountData {
            address: *pool_state,
            reason: "pool non initialisé".to_string(),
        });
    }
    Ok(state)
}
