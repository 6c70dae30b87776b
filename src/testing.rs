// src/testing.rs

//! Ledger simulé pour les tests : applique les instructions qu'il reconnaît
//! sur un état en mémoire, tout ou rien, comme le vrai réseau.

use crate::error::{PoolError, PoolResult};
use crate::rpc::LedgerClient;
use crate::token_swap::{POOL_STATE_LEN, instruction::SWAP_TAG};
use async_trait::async_trait;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const RENT_EXEMPT_LAMPORTS: u64 = 2_039_280;

/// Nombre de comptes d'un `Swap` sans compte hôte.
const SWAP_ACCOUNTS: usize = 10;

/// Relit `(amount_in, minimum_amount_out)` depuis le payload d'un `Swap`.
pub fn unpack_swap_amounts(data: &[u8]) -> Option<(u64, u64)> {
    if data.len() != 17 || data[0] != SWAP_TAG {
        return None;
    }
    let amount_in = u64::from_le_bytes(data[1..9].try_into().ok()?);
    let minimum_amount_out = u64::from_le_bytes(data[9..17].try_into().ok()?);
    Some((amount_in, minimum_amount_out))
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    accounts: HashSet<Pubkey>,
    token_balances: HashMap<Pubkey, u64>,
    account_data: HashMap<Pubkey, Vec<u8>>,
}

#[derive(Default)]
pub struct MockLedger {
    state: Mutex<LedgerState>,
    rejected_program: Mutex<Option<Pubkey>>,
    swap_quote: Mutex<Option<u64>>,
    submitted: Mutex<Vec<VersionedTransaction>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crée (ou remplace) un compte de tokens avec ce solde.
    pub fn set_balance(&self, account: Pubkey, amount: u64) {
        let mut state = self.state.lock().unwrap();
        state.accounts.insert(account);
        state.token_balances.insert(account, amount);
    }

    pub fn balance(&self, account: &Pubkey) -> Option<u64> {
        self.state.lock().unwrap().token_balances.get(account).copied()
    }

    pub fn exists(&self, account: &Pubkey) -> bool {
        self.state.lock().unwrap().accounts.contains(account)
    }

    pub fn set_account_data(&self, account: Pubkey, data: Vec<u8>) {
        let mut state = self.state.lock().unwrap();
        state.accounts.insert(account);
        state.account_data.insert(account, data);
    }

    /// Toute instruction de ce programme fera échouer sa transaction.
    pub fn reject_program(&self, program_id: Pubkey) {
        *self.rejected_program.lock().unwrap() = Some(program_id);
    }

    /// Montant maximal que le pool simulé peut rendre sur un swap.
    pub fn set_swap_quote(&self, amount_out: u64) {
        *self.swap_quote.lock().unwrap() = Some(amount_out);
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn submitted(&self) -> Vec<VersionedTransaction> {
        self.submitted.lock().unwrap().clone()
    }

    fn reject(index: usize, message: &str) -> PoolError {
        PoolError::RejectedTransaction {
            reason: format!("Error processing Instruction {index}: {message}"),
        }
    }

    /// Rejoue les instructions sur une copie de l'état ; la copie ne remplace
    /// l'état réel que si toutes passent.
    fn process(&self, transaction: &VersionedTransaction) -> PoolResult<()> {
        let rejected_program = *self.rejected_program.lock().unwrap();
        let swap_quote = *self.swap_quote.lock().unwrap();

        let mut state = self.state.lock().unwrap();
        let mut staged = state.clone();

        let keys = transaction.message.static_account_keys();
        for (index, ix) in transaction.message.instructions().iter().enumerate() {
            let program_id = keys[ix.program_id_index as usize];
            let account = |position: usize| keys[ix.accounts[position] as usize];

            if Some(program_id) == rejected_program {
                return Err(Self::reject(index, "custom program error: 0x1"));
            }

            if program_id == solana_system_interface::program::ID {
                let new_account = account(1);
                if !staged.accounts.insert(new_account) {
                    return Err(Self::reject(index, "account already in use"));
                }
                // Le compte d'état du pool : alloué mais pas encore initialisé.
                if u64::from_le_bytes(ix.data[12..20].try_into().unwrap()) == POOL_STATE_LEN as u64 {
                    staged.account_data.insert(new_account, vec![0u8; POOL_STATE_LEN]);
                }
            } else if program_id == spl_associated_token_account::id() {
                let ata = account(1);
                let idempotent = ix.data.first() == Some(&1);
                if !staged.accounts.insert(ata) && !idempotent {
                    return Err(Self::reject(index, "account already in use"));
                }
                staged.token_balances.entry(ata).or_insert(0);
            } else if program_id == spl_token::id() {
                // initialize_account (tag 1) : le compte devient un compte de tokens vide.
                if ix.data.first() == Some(&1) {
                    let token_account = account(0);
                    if !staged.accounts.contains(&token_account) {
                        return Err(Self::reject(index, "invalid account data for instruction"));
                    }
                    staged.token_balances.insert(token_account, 0);
                }
            } else if ix.data.first() == Some(&0) {
                let pool_state = account(0);
                let Some(data) = staged.account_data.get_mut(&pool_state) else {
                    return Err(Self::reject(index, "invalid account data for instruction"));
                };
                if data[1] != 0 {
                    return Err(Self::reject(index, "custom program error: 0x0"));
                }
                data[0] = 1;
                data[1] = 1;
                data[3..35].copy_from_slice(account(7).as_ref());
                data[35..67].copy_from_slice(account(2).as_ref());
                data[67..99].copy_from_slice(account(3).as_ref());
                data[99..131].copy_from_slice(account(4).as_ref());
                data[195..227].copy_from_slice(account(5).as_ref());
                data[227..324].copy_from_slice(&ix.data[1..98]);
            } else if let Some((amount_in, minimum_amount_out)) = unpack_swap_amounts(&ix.data) {
                // Le programme lit le programme de tokens en 9, l'hôte éventuel en 10.
                let layout_ok = matches!(ix.accounts.len(), SWAP_ACCOUNTS | 11) && account(9) == spl_token::id();
                if !layout_ok {
                    return Err(Self::reject(index, "incorrect program id for instruction"));
                }
                let amount_out = swap_quote.unwrap_or(minimum_amount_out);
                if amount_out < minimum_amount_out {
                    return Err(Self::reject(index, "custom program error: 0x10"));
                }
                let (source, swap_source, swap_destination, destination) = (account(3), account(4), account(5), account(6));
                for (key, delta) in [(source, -(amount_in as i128)), (swap_source, amount_in as i128), (swap_destination, -(amount_out as i128)), (destination, amount_out as i128)] {
                    let balance = staged.token_balances.get(&key).copied().unwrap_or(0) as i128 + delta;
                    if balance < 0 {
                        return Err(Self::reject(index, "custom program error: 0x1"));
                    }
                    staged.token_balances.insert(key, balance as u64);
                }
            }
        }

        *state = staged;
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_token_balance(&self, account: &Pubkey) -> PoolResult<u64> {
        self.balance(account).ok_or(PoolError::AccountNotFound(*account))
    }

    async fn get_account_data(&self, account: &Pubkey) -> PoolResult<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .account_data
            .get(account)
            .cloned()
            .ok_or(PoolError::AccountNotFound(*account))
    }

    async fn get_minimum_balance_for_rent_exemption(&self, _data_len: usize) -> PoolResult<u64> {
        Ok(RENT_EXEMPT_LAMPORTS)
    }

    async fn get_latest_blockhash(&self) -> PoolResult<Hash> {
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm_transaction(&self, transaction: &VersionedTransaction) -> PoolResult<Signature> {
        self.submitted.lock().unwrap().push(transaction.clone());
        self.process(transaction)?;
        Ok(transaction.signatures[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_ignores_other_instructions() {
        assert_eq!(unpack_swap_amounts(&[0u8; 17]), None);
        assert_eq!(unpack_swap_amounts(&[1u8; 3]), None);
        let mut data = vec![SWAP_TAG];
        data.extend_from_slice(&10u64.to_le_bytes());
        data.extend_from_slice(&7u64.to_le_bytes());
        assert_eq!(unpack_swap_amounts(&data), Some((10, 7)));
    }
}
