pub mod associated;
pub mod authority;

pub use associated::{AssociatedAccount, associated_account_address, resolve_associated_account};
pub use authority::{ProgramAuthority, derive_authority};
