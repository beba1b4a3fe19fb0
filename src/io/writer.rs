use std::path::Path;

use serde::Serialize;

use crate::errors::FaldiscoError;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), FaldiscoError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
