//! Error conversions at the infrastructure boundary
//!
//! The error type itself lives in [`crate::api::errors`]; this module only
//! maps third-party errors (reqwest, keyring, domain) into it.

mod conversions;
