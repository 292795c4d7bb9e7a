//! Common utilities for the Sieve selector engine.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - deduplicated, colored terminal output for
//!   recoverable oddities (duplicate ids, skipped selector text)

pub mod warning;
