pub mod inspect;
pub mod provision;
pub mod swap;


pub use inspect::{fetch_active_pool_state, fetch_pool_state};
pub use provision::{ActivePool, PoolProvisioner, ProvisionedPool};
pub use swap::{PoolAccounts, SlippageGuard, SwapDirection, SwapOrchestrator, SwapRequest};
