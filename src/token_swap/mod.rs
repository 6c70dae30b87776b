pub mod fees;
pub mod instruction;
pub mod state;

pub use fees::{CurveKind, FeeSchedule};
pub use state::{POOL_STATE_LEN, PoolState, decode_pool_state};
