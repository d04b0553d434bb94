//! Collaborator clients for docscout.
//!
//! This crate provides the HTTP-backed implementations of the core provider
//! traits:
//! - [`FirecrawlClient`] discovers pages under a root URL ([`docscout_core::PageDiscovery`])
//! - [`GeminiClient`] picks the pages relevant to a question ([`docscout_core::PageFilter`])

pub mod firecrawl;
pub mod gemini;

pub use firecrawl::{CrawlRequest, FirecrawlClient, FirecrawlConfig, FirecrawlError};
pub use gemini::{GeminiClient, GeminiConfig, GeminiError};
