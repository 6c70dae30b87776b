// src/token_swap/instruction.rs

use crate::error::{PoolError, PoolResult};
use crate::token_swap::fees::{CurveKind, FeeSchedule};
use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

// Discriminateurs (1er octet) des instructions du programme SPL Token Swap.
pub const INITIALIZE_TAG: u8 = 0;
pub const SWAP_TAG: u8 = 1;

// --- PAYLOADS ---

#[derive(BorshSerialize)]
struct InitializeData {
    fees: FeeSchedule,
    curve_type: u8,
    curve_parameters: [u8; CurveKind::PARAMETERS_LEN],
}

#[derive(BorshSerialize)]
struct SwapData {
    amount_in: u64,
    minimum_amount_out: u64,
}

fn pack<T: BorshSerialize>(tag: u8, payload: &T) -> PoolResult<Vec<u8>> {
    let mut data = vec![tag];
    let body = borsh::to_vec(payload).map_err(|e| PoolError::InstructionBuild(e.to_string()))?;
    data.extend_from_slice(&body);
    Ok(data)
}

// --- COMPTES ---

/// Les comptes attendus par `Initialize`, dans l'ordre du programme.
#[derive(Debug, Clone)]
pub struct InitializeAccounts {
    pub pool_state: Pubkey,
    pub authority: Pubkey,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub pool_mint: Pubkey,
    pub fee_account: Pubkey,
    pub pool_token_account: Pubkey,
    pub token_program: Pubkey,
}

/// Les comptes attendus par `Swap`. `swap_source` / `swap_destination` sont
/// les vaults du pool dans le sens du trade. Un seul programme de tokens sert
/// aux trois mints ; le compte hôte, s'il existe, vient en dernier (index 10).
#[derive(Debug, Clone)]
pub struct SwapAccounts {
    pub pool_state: Pubkey,
    pub authority: Pubkey,
    pub user_transfer_authority: Pubkey,
    pub source: Pubkey,
    pub swap_source: Pubkey,
    pub swap_destination: Pubkey,
    pub destination: Pubkey,
    pub pool_mint: Pubkey,
    pub fee_account: Pubkey,
    pub token_program: Pubkey,
    pub host_fee_account: Option<Pubkey>,
}

// --- CONSTRUCTEURS ---

/// Instruction `Initialize` : active le pool avec son barème et sa courbe.
/// Le barème est validé ici, avant toute soumission.
pub fn initialize(
    program_id: &Pubkey,
    accounts: &InitializeAccounts,
    fees: &FeeSchedule,
    curve: &CurveKind,
) -> PoolResult<Instruction> {
    fees.validate()?;

    let data = pack(
        INITIALIZE_TAG,
        &InitializeData {
            fees: *fees,
            curve_type: curve.tag(),
            curve_parameters: curve.parameters(),
        },
    )?;

    let metas = vec![
        AccountMeta::new(accounts.pool_state, true),
        AccountMeta::new_readonly(accounts.authority, false),
        AccountMeta::new_readonly(accounts.token_a, false),
        AccountMeta::new_readonly(accounts.token_b, false),
        AccountMeta::new(accounts.pool_mint, false),
        AccountMeta::new_readonly(accounts.fee_account, false),
        AccountMeta::new(accounts.pool_token_account, false),
        AccountMeta::new_readonly(accounts.token_program, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}

/// Instruction `Swap`. Un `minimum_amount_out` à 0 désactive la protection
/// de slippage côté programme.
pub fn swap(
    program_id: &Pubkey,
    accounts: &SwapAccounts,
    amount_in: u64,
    minimum_amount_out: u64,
) -> PoolResult<Instruction> {
    let data = pack(SWAP_TAG, &SwapData { amount_in, minimum_amount_out })?;

    let mut metas = vec![
        AccountMeta::new_readonly(accounts.pool_state, false),
        AccountMeta::new_readonly(accounts.authority, false),
        AccountMeta::new_readonly(accounts.user_transfer_authority, true),
        AccountMeta::new(accounts.source, false),
        AccountMeta::new(accounts.swap_source, false),
        AccountMeta::new(accounts.swap_destination, false),
        AccountMeta::new(accounts.destination, false),
        AccountMeta::new(accounts.pool_mint, false),
        AccountMeta::new(accounts.fee_account, false),
        AccountMeta::new_readonly(accounts.token_program, false),
    ];
    if let Some(host_fee_account) = accounts.host_fee_account {
        metas.push(AccountMeta::new(host_fee_account, false));
    }

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialize_accounts() -> InitializeAccounts {
        InitializeAccounts {
            pool_state: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            token_a: Pubkey::new_unique(),
            token_b: Pubkey::new_unique(),
            pool_mint: Pubkey::new_unique(),
            fee_account: Pubkey::new_unique(),
            pool_token_account: Pubkey::new_unique(),
            token_program: spl_token::id(),
        }
    }

    #[test]
    fn test_initialize_layout() {
        let program_id = Pubkey::new_unique();
        let accounts = initialize_accounts();

        let ix = initialize(&program_id, &accounts, &FeeSchedule::DEFAULT, &CurveKind::ConstantProduct).unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data.len(), 1 + 64 + 1 + 32);
        assert_eq!(ix.data[0], INITIALIZE_TAG);
        // trade fee denominator
        assert_eq!(&ix.data[9..17], &10_000u64.to_le_bytes());
        // host fee numerator / denominator
        assert_eq!(&ix.data[49..57], &5u64.to_le_bytes());
        assert_eq!(&ix.data[57..65], &100u64.to_le_bytes());
        assert_eq!(ix.data[65], 0);
        assert!(ix.data[66..].iter().all(|b| *b == 0));

        assert_eq!(ix.accounts.len(), 8);
        assert_eq!(ix.accounts[0].pubkey, accounts.pool_state);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, accounts.authority);
        assert!(!ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[6].pubkey, accounts.pool_token_account);
        assert!(ix.accounts[6].is_writable);
    }

    #[test]
    fn test_initialize_rejects_invalid_fees() {
        let fees = FeeSchedule {
            host_fee_numerator: 5,
            host_fee_denominator: 0,
            ..FeeSchedule::DEFAULT
        };
        let err = initialize(&Pubkey::new_unique(), &initialize_accounts(), &fees, &CurveKind::ConstantProduct)
            .unwrap_err();
        assert!(matches!(err, PoolError::InvalidFeeSchedule(_)));
    }

    fn swap_accounts(host_fee_account: Option<Pubkey>) -> SwapAccounts {
        SwapAccounts {
            pool_state: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            user_transfer_authority: Pubkey::new_unique(),
            source: Pubkey::new_unique(),
            swap_source: Pubkey::new_unique(),
            swap_destination: Pubkey::new_unique(),
            destination: Pubkey::new_unique(),
            pool_mint: Pubkey::new_unique(),
            fee_account: Pubkey::new_unique(),
            token_program: spl_token::id(),
            host_fee_account,
        }
    }

    /// (pubkey, signer, writable) attendus, dans l'ordre lu par le programme.
    fn expected_swap_metas(accounts: &SwapAccounts) -> Vec<(Pubkey, bool, bool)> {
        vec![
            (accounts.pool_state, false, false),
            (accounts.authority, false, false),
            (accounts.user_transfer_authority, true, false),
            (accounts.source, false, true),
            (accounts.swap_source, false, true),
            (accounts.swap_destination, false, true),
            (accounts.destination, false, true),
            (accounts.pool_mint, false, true),
            (accounts.fee_account, false, true),
            (accounts.token_program, false, false),
        ]
    }

    fn metas(ix: &Instruction) -> Vec<(Pubkey, bool, bool)> {
        ix.accounts.iter().map(|m| (m.pubkey, m.is_signer, m.is_writable)).collect()
    }

    #[test]
    fn test_swap_payload() {
        let ix = swap(&Pubkey::new_unique(), &swap_accounts(None), 10, 1_000_000).unwrap();

        assert_eq!(ix.data.len(), 17);
        assert_eq!(ix.data[0], SWAP_TAG);
        assert_eq!(&ix.data[1..9], &10u64.to_le_bytes());
        assert_eq!(&ix.data[9..17], &1_000_000u64.to_le_bytes());
    }

    #[test]
    fn test_swap_accounts_without_host() {
        let program_id = Pubkey::new_unique();
        let accounts = swap_accounts(None);

        let ix = swap(&program_id, &accounts, 10, 1).unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts.len(), 10);
        assert_eq!(metas(&ix), expected_swap_metas(&accounts));
    }

    #[test]
    fn test_swap_host_fee_account_follows_token_program() {
        let host = Pubkey::new_unique();
        let accounts = swap_accounts(Some(host));

        let ix = swap(&Pubkey::new_unique(), &accounts, 10, 1).unwrap();

        let mut expected = expected_swap_metas(&accounts);
        expected.push((host, false, true));
        assert_eq!(ix.accounts.len(), 11);
        assert_eq!(metas(&ix), expected);
        assert_eq!(ix.accounts[9].pubkey, spl_token::id());
        assert_eq!(ix.accounts[10].pubkey, host);
    }
}
