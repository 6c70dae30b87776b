// src/token_swap/state.rs

use crate::error::{PoolError, PoolResult};
use crate::token_swap::fees::{CurveKind, FeeSchedule};
use bytemuck::{Pod, Zeroable, try_from_bytes};
use solana_sdk::pubkey::Pubkey;

/// Taille totale du compte d'état : 1 octet de version + le layout `SwapV1`.
pub const POOL_STATE_LEN: usize = 1 + size_of::<onchain_layouts::SwapV1Data>();

// Miroir exact de la structure on-chain, relue en zero-copy.
mod onchain_layouts {
    use super::*;

    #[repr(C, packed)]
    #[derive(Clone, Copy, Pod, Zeroable, Debug)]
    pub struct FeesData {
        pub trade_fee_numerator: u64, pub trade_fee_denominator: u64,
        pub owner_trade_fee_numerator: u64, pub owner_trade_fee_denominator: u64,
        pub owner_withdraw_fee_numerator: u64, pub owner_withdraw_fee_denominator: u64,
        pub host_fee_numerator: u64, pub host_fee_denominator: u64,
    }

    #[repr(C, packed)]
    #[derive(Clone, Copy, Pod, Zeroable, Debug)]
    pub struct SwapCurveData {
        pub curve_type: u8, pub curve_parameters: [u8; 32],
    }

    #[repr(C, packed)]
    #[derive(Clone, Copy, Pod, Zeroable, Debug)]
    pub struct SwapV1Data {
        pub is_initialized: u8, pub bump_seed: u8, pub token_program_id: Pubkey,
        pub token_a: Pubkey, pub token_b: Pubkey, pub pool_mint: Pubkey,
        pub token_a_mint: Pubkey, pub token_b_mint: Pubkey, pub pool_fee_account: Pubkey,
        pub fees: FeesData, pub swap_curve: SwapCurveData,
    }
}

/// Vue décodée du compte d'état d'un pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub address: Pubkey,
    pub version: u8,
    pub is_initialized: bool,
    pub bump_seed: u8,
    pub token_program_id: Pubkey,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub pool_mint: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub pool_fee_account: Pubkey,
    pub fees: FeeSchedule,
    pub curve: Option<CurveKind>,
}

pub fn decode_pool_state(address: &Pubkey, data: &[u8]) -> PoolResult<PoolState> {
    if data.len() != POOL_STATE_LEN {
        return Err(PoolError::InvalidAccountData {
            address: *address,
            reason: format!("taille attendue {} octets, reçu {}", POOL_STATE_LEN, data.len()),
        });
    }

    // Le premier octet est la version du layout, on décode le reste.
    let raw: &onchain_layouts::SwapV1Data = try_from_bytes(&data[1..]).map_err(|e| PoolError::InvalidAccountData {
        address: *address,
        reason: e.to_string(),
    })?;

    let fees = raw.fees;
    let curve = raw.swap_curve;

    Ok(PoolState {
        address: *address,
        version: data[0],
        is_initialized: raw.is_initialized != 0,
        bump_seed: raw.bump_seed,
        token_program_id: raw.token_program_id,
        token_a: raw.token_a,
        token_b: raw.token_b,
        pool_mint: raw.pool_mint,
        token_a_mint: raw.token_a_mint,
        token_b_mint: raw.token_b_mint,
        pool_fee_account: raw.pool_fee_account,
        fees: FeeSchedule {
            trade_fee_numerator: fees.trade_fee_numerator,
            trade_fee_denominator: fees.trade_fee_denominator,
            owner_trade_fee_numerator: fees.owner_trade_fee_numerator,
            owner_trade_fee_denominator: fees.owner_trade_fee_denominator,
            owner_withdraw_fee_numerator: fees.owner_withdraw_fee_numerator,
            owner_withdraw_fee_denominator: fees.owner_withdraw_fee_denominator,
            host_fee_numerator: fees.host_fee_numerator,
            host_fee_denominator: fees.host_fee_denominator,
        },
        curve: CurveKind::from_raw(curve.curve_type, &curve.curve_parameters),
    })
}
