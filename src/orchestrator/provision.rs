// src/orchestrator/provision.rs

use crate::config::PoolConfig;
use crate::derivation::{ProgramAuthority, associated_account_address, derive_authority, resolve_associated_account};
use crate::error::{PoolError, PoolResult};
use crate::execution::TransactionComposer;
use crate::orchestrator::swap::PoolAccounts;
use crate::rpc::LedgerClient;
use crate::token_swap::{
    POOL_STATE_LEN,
    instruction::{self as swap_instruction, InitializeAccounts},
};
use solana_program_pack::Pack;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use solana_system_interface::instruction::create_account;
use spl_token::state::{Account as SplTokenAccount, Mint as SplMint};
use tracing::{info, warn};

/// Résultat de la phase 1 : l'autorité, les mints et les deux vaults du pool.
/// Ces adresses sont transmises telles quelles à la phase 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedPool {
    pub pool_state: Pubkey,
    pub authority: ProgramAuthority,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub token_a_account: Pubkey,
    pub token_b_account: Pubkey,
}

impl ProvisionedPool {
    /// Reconstruit le résultat de la phase 1 à partir d'adresses transmises
    /// par l'appelant (ex: copiées depuis la sortie du CLI). L'autorité est
    /// re-dérivée et chaque vault doit être l'ATA de l'autorité pour son mint.
    pub fn restore(
        program_id: &Pubkey,
        pool_state: Pubkey,
        authority: &Pubkey,
        token_a_mint: Pubkey,
        token_b_mint: Pubkey,
        token_a_account: Pubkey,
        token_b_account: Pubkey,
    ) -> PoolResult<Self> {
        let authority = ProgramAuthority::verify(&pool_state, program_id, authority)?;
        for (vault, mint) in [(token_a_account, token_a_mint), (token_b_account, token_b_mint)] {
            if vault != associated_account_address(&authority.address(), &mint) {
                return Err(PoolError::InvalidAccountData {
                    address: vault,
                    reason: format!("pas l'ATA de l'autorité pour le mint {}", mint),
                });
            }
        }
        Ok(Self { pool_state, authority, token_a_mint, token_b_mint, token_a_account, token_b_account })
    }
}

/// Résultat de la phase 2 : un pool actif, prêt pour les swaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePool {
    pub pool_state: Pubkey,
    pub authority: ProgramAuthority,
    pub token_a_account: Pubkey,
    pub token_b_account: Pubkey,
    pub pool_mint: Pubkey,
    pub fee_account: Pubkey,
    pub pool_token_account: Pubkey,
    pub mint_signature: Signature,
    pub signature: Signature,
}

impl ActivePool {
    /// Les comptes nécessaires pour swapper contre ce pool.
    pub fn accounts(&self) -> PoolAccounts {
        PoolAccounts {
            pool_state: self.pool_state,
            authority: self.authority,
            token_a_account: self.token_a_account,
            token_b_account: self.token_b_account,
            pool_mint: self.pool_mint,
            fee_account: self.fee_account,
        }
    }
}

/// Orchestre la création d'un pool en deux phases atomiques.
/// Le keypair du compte d'état doit être le même pour les deux phases.
pub struct PoolProvisioner<'a> {
    client: &'a dyn LedgerClient,
    program_id: Pubkey,
    payer: &'a Keypair,
    pool_state: &'a Keypair,
}

impl<'a> PoolProvisioner<'a> {
    pub fn new(client: &'a dyn LedgerClient, program_id: Pubkey, payer: &'a Keypair, pool_state: &'a Keypair) -> Self {
        Self { client, program_id, payer, pool_state }
    }

    // --- PHASE 1 ---

    /// Crée le compte d'état du pool et les vaults A/B détenus par l'autorité,
    /// en une seule transaction signée par le payer et le compte d'état.
    pub async fn provision(&self, token_a_mint: &Pubkey, token_b_mint: &Pubkey) -> PoolResult<(ProvisionedPool, Signature)> {
        let payer = self.payer.pubkey();
        let pool_state = self.pool_state.pubkey();

        let rent = self.client.get_minimum_balance_for_rent_exemption(POOL_STATE_LEN).await?;
        let authority = derive_authority(&pool_state, &self.program_id)?;

        let vault_a = resolve_associated_account(&payer, &authority.address(), token_a_mint);
        let vault_b = resolve_associated_account(&payer, &authority.address(), token_b_mint);

        let mut composer = TransactionComposer::new(payer);
        composer
            .add(create_account(&payer, &pool_state, rent, POOL_STATE_LEN as u64, &self.program_id))
            .add(vault_a.instruction)
            .add(vault_b.instruction);

        let signature = composer.submit(self.client, &[self.payer, self.pool_state]).await?;

        info!(
            pool_state = %pool_state,
            authority = %authority.address(),
            token_a_account = %vault_a.address,
            token_b_account = %vault_b.address,
            signature = %signature,
            "[Phase 1] Autorité et vaults du pool créés"
        );

        let pool = ProvisionedPool {
            pool_state,
            authority,
            token_a_mint: *token_a_mint,
            token_b_mint: *token_b_mint,
            token_a_account: vault_a.address,
            token_b_account: vault_b.address,
        };
        Ok((pool, signature))
    }

    /// Soldes actuels des deux vaults. Erreur `UnfundedPool` si l'un est vide.
    /// Pas de polling : un seul relevé, l'appelant décide de réessayer.
    pub async fn check_funding(&self, pool: &ProvisionedPool) -> PoolResult<(u64, u64)> {
        let token_a_balance = self.client.get_token_balance(&pool.token_a_account).await?;
        let token_b_balance = self.client.get_token_balance(&pool.token_b_account).await?;

        info!(token_a_balance, token_b_balance, "Soldes des vaults du pool");

        if token_a_balance == 0 || token_b_balance == 0 {
            warn!(pool_state = %pool.pool_state, "Vaults non financés, création du pool interrompue");
            return Err(PoolError::UnfundedPool { token_a_balance, token_b_balance });
        }
        Ok((token_a_balance, token_b_balance))
    }

    // --- PHASE 2 ---

    /// Active le pool : mint LP (transaction à part), puis compte LP du pool,
    /// compte de frais et `Initialize` dans une seule transaction.
    /// Rien n'est envoyé si le barème est invalide ou si un vault est vide.
    pub async fn finalize(
        &self,
        pool: &ProvisionedPool,
        fee_owner: &Pubkey,
        pool_token_account: &Keypair,
        config: &PoolConfig,
    ) -> PoolResult<ActivePool> {
        let fees = config.fee_schedule()?;
        let curve = config.curve()?;

        if pool.pool_state != self.pool_state.pubkey() {
            return Err(PoolError::PoolStateMismatch {
                expected: self.pool_state.pubkey(),
                provided: pool.pool_state,
            });
        }
        ProgramAuthority::verify(&pool.pool_state, &self.program_id, &pool.authority.address())?;

        self.check_funding(pool).await?;

        let payer = self.payer.pubkey();
        let authority = pool.authority.address();

        // 1. Le mint LP, contrôlé par l'autorité, sans freeze authority.
        let pool_mint = Keypair::new();
        let mint_signature = self.create_pool_mint(&pool_mint, &authority, config.lp_decimals).await?;

        // 2. Le compte qui reçoit la supply initiale de LP.
        let token_account_rent = self
            .client
            .get_minimum_balance_for_rent_exemption(SplTokenAccount::LEN)
            .await?;
        let create_pool_token_account = create_account(
            &payer,
            &pool_token_account.pubkey(),
            token_account_rent,
            SplTokenAccount::LEN as u64,
            &spl_token::id(),
        );
        let init_pool_token_account = spl_token::instruction::initialize_account(
            &spl_token::id(),
            &pool_token_account.pubkey(),
            &pool_mint.pubkey(),
            &payer,
        )
        .map_err(|e| PoolError::InstructionBuild(e.to_string()))?;

        // 3. Le compte de frais (ATA LP du fee owner).
        let fee_account = resolve_associated_account(&payer, fee_owner, &pool_mint.pubkey());

        // 4. L'initialisation du pool.
        let initialize = swap_instruction::initialize(
            &self.program_id,
            &InitializeAccounts {
                pool_state: pool.pool_state,
                authority,
                token_a: pool.token_a_account,
                token_b: pool.token_b_account,
                pool_mint: pool_mint.pubkey(),
                fee_account: fee_account.address,
                pool_token_account: pool_token_account.pubkey(),
                token_program: spl_token::id(),
            },
            &fees,
            &curve,
        )?;

        let mut composer = TransactionComposer::new(payer);
        composer
            .add(create_pool_token_account)
            .add(init_pool_token_account)
            .add(fee_account.instruction)
            .add(initialize);

        let signature = composer
            .submit(self.client, &[self.payer, pool_token_account, self.pool_state])
            .await?;

        info!(
            pool_state = %pool.pool_state,
            pool_mint = %pool_mint.pubkey(),
            fee_account = %fee_account.address,
            pool_token_account = %pool_token_account.pubkey(),
            trade_fee_percent = fees.total_trade_fee_percent(),
            curve = ?curve,
            signature = %signature,
            "[Phase 2] Pool initialisé"
        );

        Ok(ActivePool {
            pool_state: pool.pool_state,
            authority: pool.authority,
            token_a_account: pool.token_a_account,
            token_b_account: pool.token_b_account,
            pool_mint: pool_mint.pubkey(),
            fee_account: fee_account.address,
            pool_token_account: pool_token_account.pubkey(),
            mint_signature,
            signature,
        })
    }

    async fn create_pool_mint(&self, mint: &Keypair, authority: &Pubkey, decimals: u8) -> PoolResult<Signature> {
        let payer = self.payer.pubkey();
        let rent = self.client.get_minimum_balance_for_rent_exemption(SplMint::LEN).await?;

        let initialize_mint =
            spl_token::instruction::initialize_mint2(&spl_token::id(), &mint.pubkey(), authority, None, decimals)
                .map_err(|e| PoolError::InstructionBuild(e.to_string()))?;

        let mut composer = TransactionComposer::new(payer);
        composer
            .add(create_account(&payer, &mint.pubkey(), rent, SplMint::LEN as u64, &spl_token::id()))
            .add(initialize_mint);

        let signature = composer.submit(self.client, &[self.payer, mint]).await?;
        info!(pool_mint = %mint.pubkey(), decimals, signature = %signature, "Mint LP créé");
        Ok(signature)
    }
}
