//! Error types.
//!
//! A missing key is never an error: lookups return `Option` and deletes
//! return `bool`.

use core::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("load factor must lie strictly between 0 and 1, got {0}")]
    InvalidLoadFactor(f64),

    /// The slot array could not be allocated. A failed resize leaves the
    /// table untouched.
    #[error("failed to allocate a slot array of {requested} slots")]
    Allocation { requested: usize },

    /// No empty or tombstone slot on the probe path, even after a forced resize.
    #[error("probe sequence exhausted at capacity {capacity}")]
    ProbeExhausted { capacity: usize },
}

/// A failed insert. Ownership of the record returns to the caller.
#[derive(Error)]
#[error("record not inserted: {error}")]
pub struct InsertError<R> {
    error: TableError,
    record: R,
}

impl<R> InsertError<R> {
    pub(crate) fn new(error: TableError, record: R) -> Self {
        Self { error, record }
    }

    pub fn error(&self) -> &TableError {
        &self.error
    }

    pub fn into_record(self) -> R {
        self.record
    }

    pub fn into_parts(self) -> (TableError, R) {
        (self.error, self.record)
    }
}

impl<R> fmt::Debug for InsertError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<R> From<InsertError<R>> for TableError {
    fn from(e: InsertError<R>) -> Self {
        e.error
    }
}

/// Failure while loading a postal-range dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Insert { line: usize, source: TableError },
}
