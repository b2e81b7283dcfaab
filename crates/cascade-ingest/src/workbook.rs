//! First-worksheet workbook reading via calamine.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use cascade_model::{CellValue, Dataset};

use crate::error::{IngestError, Result};
use crate::header::{assemble, assign_keys};

/// Convert a calamine cell into a dataset value.
///
/// Excel date serials stay numeric; ISO date and duration cells stay text.
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(int) => CellValue::Number(*int as f64),
        Data::Float(float) => CellValue::Number(*float),
        Data::Bool(flag) => CellValue::Bool(*flag),
        Data::DateTime(serial) => CellValue::Number(serial.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
    }
}

/// Read the first worksheet of a workbook held in memory.
///
/// The format is sniffed from the bytes, so the file extension only decides
/// whether this reader is used at all.
pub fn read_workbook_bytes(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Dataset::empty());
    };
    let header: Vec<String> = header_row
        .iter()
        .map(|cell| cell_value(cell).to_string())
        .collect();
    let keys = assign_keys(&header);
    let records = rows.map(|row| row.iter().map(cell_value).collect::<Vec<_>>());
    let dataset = assemble(&keys, records);

    tracing::debug!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "read first worksheet"
    );
    Ok(dataset)
}
