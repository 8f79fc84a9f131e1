//! Domain types and models
//!
//! One module per backend API group, plus the small request/response shapes
//! that several groups share.

pub mod analytics;
pub mod auth;
pub mod billing;
pub mod common;
pub mod credentials;

pub use analytics::*;
pub use auth::*;
pub use billing::*;
pub use common::*;
pub use credentials::*;
