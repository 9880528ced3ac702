//! Client code for adunblock.
//!
//! This crate provides the HTTP fetch for the script-source endpoint, the
//! TTL-cached source list, and the head injector that ties settings, rules
//! and sources together.

pub mod fetch;
pub mod head;
pub mod sources;

#[cfg(test)]
mod testing;

pub use fetch::{FetchClient, FetchConfig};
pub use head::HeadInjector;
pub use sources::{CachePolicy, HttpSourceFetcher, ScriptSourceCache, SourceFetcher, parse_sources};
