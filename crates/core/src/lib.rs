//! Core types and shared functionality for docscout.
//!
//! This crate provides:
//! - Disk-backed result cache
//! - URL normalization for cache keys
//! - Collaborator traits and the lookup orchestrator
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod page;
pub mod provider;

pub use cache::{DiskCache, Lookup};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use lookup::{LookupReport, LookupRequest, LookupService, PageSource};
pub use normalize::normalize_url;
pub use page::PageMetadata;
pub use provider::{PageDiscovery, PageFilter};
