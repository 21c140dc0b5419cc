//! Member savings movements.
//!
//! The savings transaction guard wraps deposit and withdrawal requests:
//! member validation, balance sufficiency, type-specific withdrawal rules,
//! and the rolling daily-withdrawal limit, before handing the movement to
//! the ledger as a balanced entry.

pub mod directory;
pub mod error;
pub mod guard;
pub mod types;

pub use directory::{InMemoryMemberDirectory, MemberDirectory, SavingsChart};
pub use error::SavingsError;
pub use guard::SavingsTransactionGuard;
pub use types::{Member, MemberStatus, SavingsReceipt, SavingsType};
