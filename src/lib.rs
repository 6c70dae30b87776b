// src/lib.rs

// Les modules publics sont utilisés par le binaire `pool_manager`.
pub mod config;
pub mod derivation;
pub mod error;
pub mod execution;
pub mod keys;
pub mod monitoring;
pub mod orchestrator;
pub mod rpc;
pub mod token_swap;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{PoolError, PoolResult};
