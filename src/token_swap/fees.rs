// src/token_swap/fees.rs

use crate::error::{PoolError, PoolResult};
use borsh::{BorshDeserialize, BorshSerialize};

/// Barème de frais du pool : quatre fractions numérateur / dénominateur.
/// L'ordre des champs est celui du layout on-chain (8 x u64 little-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BorshSerialize, BorshDeserialize)]
pub struct FeeSchedule {
    pub trade_fee_numerator: u64,
    pub trade_fee_denominator: u64,
    pub owner_trade_fee_numerator: u64,
    pub owner_trade_fee_denominator: u64,
    pub owner_withdraw_fee_numerator: u64,
    pub owner_withdraw_fee_denominator: u64,
    pub host_fee_numerator: u64,
    pub host_fee_denominator: u64,
}

impl FeeSchedule {
    /// Les frais appliqués par défaut à un nouveau pool :
    /// trade 0/10000, owner trade 5/10000, owner withdraw 0/0, host 5/100.
    pub const DEFAULT: FeeSchedule = FeeSchedule {
        trade_fee_numerator: 0,
        trade_fee_denominator: 10_000,
        owner_trade_fee_numerator: 5,
        owner_trade_fee_denominator: 10_000,
        owner_withdraw_fee_numerator: 0,
        owner_withdraw_fee_denominator: 0,
        host_fee_numerator: 5,
        host_fee_denominator: 100,
    };

    /// Construit un barème et le valide immédiatement.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_fee_numerator: u64,
        trade_fee_denominator: u64,
        owner_trade_fee_numerator: u64,
        owner_trade_fee_denominator: u64,
        owner_withdraw_fee_numerator: u64,
        owner_withdraw_fee_denominator: u64,
        host_fee_numerator: u64,
        host_fee_denominator: u64,
    ) -> PoolResult<Self> {
        let fees = Self {
            trade_fee_numerator,
            trade_fee_denominator,
            owner_trade_fee_numerator,
            owner_trade_fee_denominator,
            owner_withdraw_fee_numerator,
            owner_withdraw_fee_denominator,
            host_fee_numerator,
            host_fee_denominator,
        };
        fees.validate()?;
        Ok(fees)
    }

    /// Un numérateur non nul exige un dénominateur non nul, et une fraction
    /// ne peut pas dépasser 1 (le programme refuserait de toute façon).
    pub fn validate(&self) -> PoolResult<()> {
        let pairs = [
            ("trade", self.trade_fee_numerator, self.trade_fee_denominator),
            ("owner_trade", self.owner_trade_fee_numerator, self.owner_trade_fee_denominator),
            ("owner_withdraw", self.owner_withdraw_fee_numerator, self.owner_withdraw_fee_denominator),
            ("host", self.host_fee_numerator, self.host_fee_denominator),
        ];

        for (name, numerator, denominator) in pairs {
            if numerator != 0 && denominator == 0 {
                return Err(PoolError::InvalidFeeSchedule(format!(
                    "{name} : numérateur {numerator} avec un dénominateur nul"
                )));
            }
            if denominator != 0 && numerator > denominator {
                return Err(PoolError::InvalidFeeSchedule(format!(
                    "{name} : {numerator}/{denominator} dépasse 100%"
                )));
            }
        }
        Ok(())
    }

    /// Frais de trade total (LP + owner) en pourcentage, pour les logs.
    pub fn total_trade_fee_percent(&self) -> f64 {
        fn as_percent(numerator: u64, denominator: u64) -> f64 {
            if denominator == 0 {
                0.0
            } else {
                (numerator as f64 * 100.0) / denominator as f64
            }
        }
        as_percent(self.trade_fee_numerator, self.trade_fee_denominator)
            + as_percent(self.owner_trade_fee_numerator, self.owner_trade_fee_denominator)
    }
}

/// Courbe de prix interprétée par le programme de swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveKind {
    #[default]
    ConstantProduct,
    ConstantPrice { token_b_price: u64 },
    Stable { amp: u64 },
    Offset { token_b_offset: u64 },
}

impl CurveKind {
    pub const PARAMETERS_LEN: usize = 32;

    pub fn tag(&self) -> u8 {
        match self {
            CurveKind::ConstantProduct => 0,
            CurveKind::ConstantPrice { .. } => 1,
            CurveKind::Stable { .. } => 2,
            CurveKind::Offset { .. } => 3,
        }
    }

    /// Paramètres de la courbe : un u64 LE en tête d'un champ de 32 octets.
    pub fn parameters(&self) -> [u8; Self::PARAMETERS_LEN] {
        let mut packed = [0u8; Self::PARAMETERS_LEN];
        let value = match self {
            CurveKind::ConstantProduct => return packed,
            CurveKind::ConstantPrice { token_b_price } => *token_b_price,
            CurveKind::Stable { amp } => *amp,
            CurveKind::Offset { token_b_offset } => *token_b_offset,
        };
        packed[..8].copy_from_slice(&value.to_le_bytes());
        packed
    }

    /// Inverse de `tag()` + `parameters()`, utilisé en relisant un pool on-chain.
    pub fn from_raw(tag: u8, parameters: &[u8; Self::PARAMETERS_LEN]) -> Option<Self> {
        let mut head = [0u8; 8];
        head.copy_from_slice(&parameters[..8]);
        let value = u64::from_le_bytes(head);
        match tag {
            0 => Some(CurveKind::ConstantProduct),
            1 => Some(CurveKind::ConstantPrice { token_b_price: value }),
            2 => Some(CurveKind::Stable { amp: value }),
            3 => Some(CurveKind::Offset { token_b_offset: value }),
            _ => None,
        }
    }

    /// Nom utilisé dans la configuration (`POOL_CURVE`).
    pub fn from_name(name: &str, parameter: u64) -> PoolResult<Self> {
        match name {
            "constant_product" => Ok(CurveKind::ConstantProduct),
            "constant_price" => Ok(CurveKind::ConstantPrice { token_b_price: parameter }),
            "stable" => Ok(CurveKind::Stable { amp: parameter }),
            "offset" => Ok(CurveKind::Offset { token_b_offset: parameter }),
            other => Err(PoolError::InvalidCurve(other.to_string())),
        }
    }
}
