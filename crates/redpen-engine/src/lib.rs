//! The redpen paper lifecycle engine.
//!
//! This crate is the heart of redpen. It owns the mutable `Paper` records
//! and orchestrates, per operation and inside one row-exclusive critical
//! section: actor resolution (redpen-guard), version comparison
//! (redpen-types), the review transition table (redpen-review), and the
//! audit history append (redpen-history). Either the row update and its
//! history row commit together, or neither does.

pub mod engine;
pub mod error;

pub use engine::PaperEngine;
pub use error::{EngineError, ErrorClass};
