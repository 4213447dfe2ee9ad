//! Append-only audit history for redpen.
//!
//! Every accepted paper mutation produces exactly one immutable
//! [`redpen_types::PaperHistory`] row. This crate enforces append-only
//! architecturally: [`HistoryWriter`] has an `append` method and nothing
//! else, [`HistoryReader`] only reads, and the sole way a row ever leaves
//! the log is [`HistoryCascade::purge`], which exists for paper deletion
//! and nothing else. There is no update method to misuse.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::HistoryError;
pub use memory::InMemoryAuditLog;
pub use traits::{HistoryCascade, HistoryReader, HistoryWriter};
