pub mod ledger;
pub mod resilient_client;

pub use ledger::LedgerClient;
pub use resilient_client::ResilientRpcClient;
