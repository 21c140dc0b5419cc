//! Tenant resolution and authorization.
//!
//! Every engine call takes an explicit, already-validated `TenantId`; this
//! module is where that validation happens. No component reads tenant
//! identity from ambient or global state.

pub mod context;
pub mod error;
pub mod types;

pub use context::{InMemoryTenantDirectory, TenantContext, TenantDirectory};
pub use error::TenantError;
pub use types::Tenant;
