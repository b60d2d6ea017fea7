//! Application identity from Cargo.toml.
//!
//! Single source of truth for the app name and vendor used across the codebase.

/// Application name (from Cargo.toml `package.name`).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Vendor / organization used in ProjectDirs.
pub const VENDOR: &str = "ollama-bar";
