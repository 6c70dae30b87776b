// src/derivation/associated.rs

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::{create_associated_token_account, create_associated_token_account_idempotent},
};

/// Un compte de tokens associé (ATA) et l'instruction qui le crée.
/// Rien n'est envoyé ici : l'instruction n'a d'effet qu'une fois incluse
/// dans une transaction soumise.
#[derive(Debug, Clone)]
pub struct AssociatedAccount {
    pub address: Pubkey,
    pub instruction: Instruction,
}

/// Adresse de l'ATA (owner, mint) pour le programme SPL Token classique.
/// Le propriétaire peut être hors courbe (cas de l'autorité du pool).
pub fn associated_account_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &spl_token::id())
}

/// Calcule l'ATA et construit l'instruction de création.
/// On ne vérifie pas s'il existe déjà : si c'est le cas, le réseau rejettera
/// la transaction entière.
pub fn resolve_associated_account(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> AssociatedAccount {
    AssociatedAccount {
        address: associated_account_address(owner, mint),
        instruction: create_associated_token_account(payer, owner, mint, &spl_token::id()),
    }
}

/// Variante idempotente : n'échoue pas si l'ATA existe déjà.
/// Utile pour réutiliser des comptes laissés par une phase précédente.
pub fn resolve_associated_account_idempotent(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> AssociatedAccount {
    AssociatedAccount {
        address: associated_account_address(owner, mint),
        instruction: create_associated_token_account_idempotent(payer, owner, mint, &spl_token::id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_is_deterministic() {
        let payer = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let first = resolve_associated_account(&payer, &owner, &mint);
        let second = resolve_associated_account(&payer, &owner, &mint);

        assert_eq!(first.address, second.address);
        assert_eq!(first.instruction, second.instruction);
    }

    #[test]
    fn test_different_owners_give_different_accounts() {
        let mint = Pubkey::new_unique();
        let a = associated_account_address(&Pubkey::new_unique(), &mint);
        let b = associated_account_address(&Pubkey::new_unique(), &mint);
        assert_ne!(a, b);
    }

    #[test]
    fn test_instruction_names_payer_account_owner_and_mint() {
        let payer = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let resolved = resolve_associated_account(&payer, &owner, &mint);
        let ix = &resolved.instruction;

        assert_eq!(ix.program_id, spl_associated_token_account::id());
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, resolved.address);
        assert_eq!(ix.accounts[2].pubkey, owner);
        assert_eq!(ix.accounts[3].pubkey, mint);
    }

    #[test]
    fn test_idempotent_variant_targets_same_address() {
        let payer = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let plain = resolve_associated_account(&payer, &owner, &mint);
        let idempotent = resolve_associated_account_idempotent(&payer, &owner, &mint);

        assert_eq!(plain.address, idempotent.address);
        assert_ne!(plain.instruction.data, idempotent.instruction.data);
    }
}
