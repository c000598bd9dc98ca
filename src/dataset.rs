//! Loading postal ranges from a delimited text file.
//!
//! Expected layout, one header line then rows of
//! `state,city,range_label,start,end`. Fields are split on commas and empty
//! fields collapse, so `a,,b` reads as two fields. The label column is
//! ignored. Over-long values are truncated: state to 2 characters, city to
//! 49, codes to 5.

use crate::error::DatasetError;
use crate::postal::PostalRange;
use crate::probe_table::ProbeTable;
use std::io::BufRead;

const STATE_LEN: usize = 2;
const CITY_LEN: usize = 49;
const CODE_LEN: usize = 5;

/// Outcome of [`load`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LoadSummary {
    pub inserted: usize,
    /// Data lines with fewer than five fields.
    pub skipped: usize,
}

fn truncated(field: &str, max_chars: usize) -> String {
    field.chars().take(max_chars).collect()
}

/// Parse one data line. `None` when a field is missing.
pub fn parse_line(line: &str) -> Option<PostalRange> {
    let mut fields = line.split(',').filter(|f| !f.is_empty());
    let state = truncated(fields.next()?, STATE_LEN);
    let city = truncated(fields.next()?, CITY_LEN);
    let _label = fields.next();
    let start = truncated(fields.next()?, CODE_LEN);
    let end = truncated(fields.next()?, CODE_LEN);
    Some(PostalRange {
        state,
        city,
        start,
        end,
    })
}

/// Insert every row of `reader` into `table`. The first line is a header.
pub fn load<B, F>(reader: B, table: &mut ProbeTable<PostalRange, F>) -> Result<LoadSummary, DatasetError>
where
    B: BufRead,
    F: Fn(&PostalRange) -> &str,
{
    let mut summary = LoadSummary::default();
    let mut lines = reader.lines();
    if let Some(header) = lines.next() {
        header?;
    }
    for (idx, line) in lines.enumerate() {
        // 1-based, counting the header.
        let line_no = idx + 2;
        let line = line?;
        let Some(range) = parse_line(&line) else {
            log::debug!("skipping malformed dataset line {}: {:?}", line_no, line);
            summary.skipped += 1;
            continue;
        };
        table.insert(range).map_err(|e| DatasetError::Insert {
            line: line_no,
            source: e.into(),
        })?;
        summary.inserted += 1;
    }
    log::debug!(
        "loaded {} postal ranges ({} skipped), table capacity {}",
        summary.inserted,
        summary.skipped,
        table.capacity()
    );
    Ok(summary)
}
