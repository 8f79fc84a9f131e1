//! Configuration loading
//!
//! Builds a [`xanodash_domain::ClientConfig`] from environment variables or
//! a config file and validates it before any client is constructed.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths, validate};
