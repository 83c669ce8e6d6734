//! Common utilities for the quire layout engine.
//!
//! This crate provides shared infrastructure used by the layout core and the CLI:
//! - **Warning System** - deduplicated diagnostics routed through the `log` facade

pub mod warning;
