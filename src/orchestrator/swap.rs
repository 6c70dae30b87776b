// src/orchestrator/swap.rs

use crate::derivation::ProgramAuthority;
use crate::error::PoolResult;
use crate::execution::TransactionComposer;
use crate::rpc::LedgerClient;
use crate::token_swap::instruction::{self as swap_instruction, SwapAccounts};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::{info, warn};

/// Les comptes d'un pool déjà actif.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolAccounts {
    pub pool_state: Pubkey,
    pub authority: ProgramAuthority,
    pub token_a_account: Pubkey,
    pub token_b_account: Pubkey,
    pub pool_mint: Pubkey,
    pub fee_account: Pubkey,
}

impl PoolAccounts {
    /// Reconstruit les comptes d'un pool existant ; l'autorité est re-dérivée
    /// et doit correspondre à celle fournie.
    pub fn restore(
        program_id: &Pubkey,
        pool_state: Pubkey,
        authority: &Pubkey,
        token_a_account: Pubkey,
        token_b_account: Pubkey,
        pool_mint: Pubkey,
        fee_account: Pubkey,
    ) -> PoolResult<Self> {
        let authority = ProgramAuthority::verify(&pool_state, program_id, authority)?;
        Ok(Self { pool_state, authority, token_a_account, token_b_account, pool_mint, fee_account })
    }
}

/// Sens du trade par rapport aux vaults du pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapDirection {
    #[default]
    AToB,
    BToA,
}

/// Plancher de sortie transmis au programme.
/// `Unprotected` correspond à un `minimum_amount_out` de 0 : le programme
/// accepte alors n'importe quel montant en sortie, même nul.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlippageGuard {
    Floor(u64),
    Unprotected,
}

impl SlippageGuard {
    pub fn from_minimum(minimum_amount_out: u64) -> Self {
        if minimum_amount_out == 0 {
            SlippageGuard::Unprotected
        } else {
            SlippageGuard::Floor(minimum_amount_out)
        }
    }

    pub fn minimum_amount_out(&self) -> u64 {
        match self {
            SlippageGuard::Floor(minimum) => *minimum,
            SlippageGuard::Unprotected => 0,
        }
    }
}

/// Un ordre de swap côté trader.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub source: Pubkey,
    pub destination: Pubkey,
    pub amount_in: u64,
    pub guard: SlippageGuard,
    pub direction: SwapDirection,
    pub host_fee_account: Option<Pubkey>,
}

pub struct SwapOrchestrator<'a> {
    client: &'a dyn LedgerClient,
    program_id: Pubkey,
}

impl<'a> SwapOrchestrator<'a> {
    pub fn new(client: &'a dyn LedgerClient, program_id: Pubkey) -> Self {
        Self { client, program_id }
    }

    /// Construit l'unique instruction `Swap`, signée par le trader.
    /// Aucune vérification locale de solde ou de slippage : c'est le programme
    /// qui applique le plancher et rejette la transaction s'il n'est pas atteint.
    pub async fn swap(&self, pool: &PoolAccounts, trader: &Keypair, request: &SwapRequest) -> PoolResult<Signature> {
        if request.guard == SlippageGuard::Unprotected {
            warn!(pool_state = %pool.pool_state, amount_in = request.amount_in, "Swap sans protection de slippage (minimum_amount_out = 0)");
        }

        let (swap_source, swap_destination) = match request.direction {
            SwapDirection::AToB => (pool.token_a_account, pool.token_b_account),
            SwapDirection::BToA => (pool.token_b_account, pool.token_a_account),
        };

        let accounts = SwapAccounts {
            pool_state: pool.pool_state,
            authority: pool.authority.address(),
            user_transfer_authority: trader.pubkey(),
            source: request.source,
            swap_source,
            swap_destination,
            destination: request.destination,
            pool_mint: pool.pool_mint,
            fee_account: pool.fee_account,
            token_program: spl_token::id(),
            host_fee_account: request.host_fee_account,
        };

        let instruction = swap_instruction::swap(
            &self.program_id,
            &accounts,
            request.amount_in,
            request.guard.minimum_amount_out(),
        )?;

        let mut composer = TransactionComposer::new(trader.pubkey());
        composer.add(instruction);
        let signature = composer.submit(self.client, &[trader]).await?;

        info!(
            pool_state = %pool.pool_state,
            direction = ?request.direction,
            amount_in = request.amount_in,
            minimum_amount_out = request.guard.minimum_amount_out(),
            signature = %signature,
            "Swap confirmé"
        );
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_minimum_is_unprotected() {
        assert_eq!(SlippageGuard::from_minimum(0), SlippageGuard::Unprotected);
        assert_eq!(SlippageGuard::Unprotected.minimum_amount_out(), 0);
        assert_eq!(SlippageGuard::from_minimum(7), SlippageGuard::Floor(7));
        assert_eq!(SlippageGuard::Floor(7).minimum_amount_out(), 7);
    }

    #[test]
    fn test_restore_rejects_wrong_authority() {
        let program_id = Pubkey::new_unique();
        let result = PoolAccounts::restore(
            &program_id,
            Pubkey::new_unique(),
            &Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        assert!(result.is_err());
    }
}
