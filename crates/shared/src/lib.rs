//! Shared types, errors, and configuration for Kopra.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide and storage-port error types
//! - Clock abstraction for testable time
//! - Configuration management

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult, StoreError};
