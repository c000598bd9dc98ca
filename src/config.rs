//! Construction parameters for [`ProbeTable`](crate::ProbeTable).

use crate::error::TableError;
use crate::strategy::Strategy;

const DEFAULT_BUCKETS: usize = 16;
const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Bucket count, growth threshold and probing strategy.
///
/// These three values fully determine when the table resizes and which slots
/// a key may occupy. The slot array is allocated with `buckets + 1` slots.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub buckets: usize,
    /// Resize when `(len + 1) / capacity >= load_factor`. Must lie in (0, 1).
    pub load_factor: f64,
    pub strategy: Strategy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
            load_factor: DEFAULT_LOAD_FACTOR,
            strategy: Strategy::default(),
        }
    }
}

impl TableConfig {
    pub fn new(buckets: usize, strategy: Strategy, load_factor: f64) -> Self {
        Self {
            buckets,
            load_factor,
            strategy,
        }
    }

    pub fn with_buckets(mut self, buckets: usize) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Number of slots a fresh table allocates.
    pub fn initial_capacity(&self) -> Result<usize, TableError> {
        self.buckets
            .checked_add(1)
            .ok_or(TableError::Allocation {
                requested: usize::MAX,
            })
    }

    pub fn validate(&self) -> Result<(), TableError> {
        // NaN fails both comparisons.
        if self.load_factor > 0.0 && self.load_factor < 1.0 {
            Ok(())
        } else {
            Err(TableError::InvalidLoadFactor(self.load_factor))
        }
    }
}
