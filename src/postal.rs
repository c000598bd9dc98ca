//! Postal-code range records and the interval query over a table of them.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::probe_table::{KeyFn, ProbeTable};

/// A record covering the inclusive code interval `[range_start, range_end]`.
pub trait CodeRange {
    fn range_start(&self) -> &str;
    fn range_end(&self) -> &str;

    /// Whether `code` falls inside the interval. Records whose bounds do not
    /// parse as codes contain nothing.
    fn contains_code(&self, code: u32) -> bool {
        match (parse_code(self.range_start()), parse_code(self.range_end())) {
            (Some(lo), Some(hi)) => lo <= code && code <= hi,
            _ => false,
        }
    }
}

/// Parse a decimal postal code, ignoring surrounding whitespace.
pub fn parse_code(code: &str) -> Option<u32> {
    code.trim().parse().ok()
}

/// One row of the postal dataset: the codes `start..=end` belong to `city`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PostalRange {
    pub state: String,
    pub city: String,
    pub start: String,
    pub end: String,
}

impl PostalRange {
    pub fn new(
        state: impl Into<String>,
        city: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Table key: the first code of the range.
    pub fn start(&self) -> &str {
        &self.start
    }
}

impl CodeRange for PostalRange {
    fn range_start(&self) -> &str {
        &self.start
    }

    fn range_end(&self) -> &str {
        &self.end
    }
}

/// Postal ranges keyed by their starting code.
pub type PostalTable = ProbeTable<PostalRange>;

pub fn new_table(config: TableConfig) -> Result<PostalTable, TableError> {
    ProbeTable::new(PostalRange::start as KeyFn<PostalRange>, config)
}

impl<R, F> ProbeTable<R, F>
where
    R: CodeRange,
    F: Fn(&R) -> &str,
{
    /// First record in slot-array order whose interval contains `code`.
    ///
    /// A linear scan of every slot: the query is not a table key, so hashing
    /// does not help. Overlapping intervals are not detected.
    pub fn find_containing(&self, code: &str) -> Option<&R> {
        let code = parse_code(code)?;
        self.iter()
            .map(|(_, r)| r)
            .find(|r| r.contains_code(code))
    }
}
