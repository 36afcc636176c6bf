//! Pantry inventory importer.
//!
//! Reads a CSV export of pantry items, normalizes each row's loosely formatted
//! fields into a [`types::NormalizedItem`], and writes the items one by one to
//! a [`storage::Storage`] backend. Rows without a name are skipped, failed
//! writes are counted without stopping the batch.

pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod storage;
pub mod types;

pub use error::{IngestError, Result};
pub use pipeline::Pipeline;
