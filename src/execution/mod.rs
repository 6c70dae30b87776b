pub mod composer;

pub use composer::TransactionComposer;
