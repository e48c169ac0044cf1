//! Common utilities for the Weft style engine.
//!
//! This crate provides shared infrastructure used by all Weft components:
//! - **Warning System** - deduplicated warnings routed through `tracing`

pub mod warning;
