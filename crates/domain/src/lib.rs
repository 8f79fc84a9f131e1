//! # xanodash Domain
//!
//! Wire models and configuration types for the xanodash service layer.
//!
//! This crate contains:
//! - Request/response models for the auth, credentials, analytics and billing
//!   API groups
//! - Client configuration structures (`ClientConfig`, `ApiGroupsConfig`)
//! - Domain error type and `Result` alias
//! - Shared constants
//!
//! ## Architecture
//! - No dependencies on other xanodash crates
//! - No I/O; everything impure lives in `xanodash-infra`

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
