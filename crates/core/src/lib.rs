//! Core types and shared functionality for adunblock.
//!
//! This crate provides:
//! - Page-eligibility rule evaluation
//! - Settings persistence and sanitization
//! - Option and transient stores (SQLite and in-memory)
//! - Head markup for the verification marker and script tag
//! - Unified error types and configuration structures

pub mod config;
pub mod error;
pub mod inject;
pub mod rules;
pub mod settings;
pub mod store;

pub use error::Error;
pub use inject::HeadInjection;
pub use rules::{PageKind, RequestContext, RuleMatch, TargetingConfig, evaluate, should_inject};
pub use settings::{PageRules, PageRulesInput, SettingsStore, Toggle};
pub use store::{CacheDb, Clock, ManualClock, MemoryStore, OptionStore, SystemClock, TransientStore};
