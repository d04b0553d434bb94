//! MCP tool implementations.
//!
//! This module contains all tools exposed by the docscout server.

pub mod cache_purge;
pub mod find_relevant;

#[cfg(test)]
pub(crate) mod testing;
