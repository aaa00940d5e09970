//! Shared types, error model, and configuration for notipress.
//!
//! This crate is the foundation depended on by all other notipress crates.
//! It provides:
//! - [`NotipressError`] — the unified error type
//! - Domain types ([`PostSummary`], [`PageDigest`])
//! - Configuration ([`AppConfig`], [`SiteConfig`], [`SiteRegistry`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, NotionConfig, SiteConfig, SiteRegistry, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{NotipressError, Result};
pub use types::{PageDigest, PostSummary};
