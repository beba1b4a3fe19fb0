use std::path::Path;

use ahash::AHashMap;

use crate::errors::FaldiscoError;
use crate::sample::{Row, Sample};

/// Loads a delimited sample file (header row plus `r_j__`/`r__`/`t__`
/// columns) the way the teacher's `parse_tig_lengths` loads tabular input,
/// but with headers enabled and a dynamic column set instead of a fixed
/// struct, since the field set is only known at run time.
pub fn load_sample(path: &Path, max_rows: usize) -> Result<Sample, FaldiscoError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let header: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();

    let mut rows: Vec<Row> = Vec::new();
    for result in rdr.records() {
        if rows.len() >= max_rows {
            break;
        }
        let record = result?;
        let mut row: Row = AHashMap::default();
        for (column, value) in header.iter().zip(record.iter()) {
            row.insert(column.clone(), value.to_string());
        }
        rows.push(row);
    }

    Sample::new(&header, rows)
}
