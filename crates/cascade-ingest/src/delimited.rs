//! Comma-separated uploads.

use cascade_model::{CellValue, Dataset};

use crate::error::{IngestError, Result};
use crate::header::{assemble, assign_keys};

/// Empty cells are missing. A cell becomes a number only when it parses as a
/// finite number that prints back as the same text, so `007`, `1e3` and
/// `1.50` stay text.
pub fn parse_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Missing;
    }
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => {
            let value = CellValue::Number(number);
            if value.to_string() == raw {
                value
            } else {
                CellValue::text(raw)
            }
        }
        _ => CellValue::text(raw),
    }
}

fn validate_encoding(bytes: &[u8]) -> Result<()> {
    // UTF-8 BOM is acceptable (stripped from the first header)
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }
    Ok(())
}

/// Read CSV bytes; the first record is the header row.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<Dataset> {
    validate_encoding(bytes)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let Some(header) = records.next().transpose()? else {
        return Ok(Dataset::empty());
    };
    let header: Vec<String> = header.iter().map(str::to_string).collect();
    let keys = assign_keys(&header);

    let mut values = Vec::new();
    for record in records {
        let record = record?;
        values.push(record.iter().map(parse_cell).collect::<Vec<_>>());
    }
    Ok(assemble(&keys, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(""), CellValue::Missing);
        assert_eq!(parse_cell("12"), CellValue::Number(12.0));
        assert_eq!(parse_cell("0.5"), CellValue::Number(0.5));
        assert_eq!(parse_cell("NaN"), CellValue::text("NaN"));
        assert_eq!(parse_cell(" A "), CellValue::text(" A "));
        assert_eq!(parse_cell("-3"), CellValue::Number(-3.0));
    }

    #[test]
    fn numeric_text_that_would_change_stays_text() {
        assert_eq!(parse_cell("007"), CellValue::text("007"));
        assert_eq!(parse_cell("1e3"), CellValue::text("1e3"));
        assert_eq!(parse_cell("1.50"), CellValue::text("1.50"));
        assert_eq!(parse_cell("+4"), CellValue::text("+4"));

        let dataset = read_csv_bytes(b"L_1\n007\n1e3\n7\n").unwrap();
        let values: Vec<String> = dataset
            .rows()
            .iter()
            .map(|row| row.value("L_1").to_string())
            .collect();
        assert_eq!(values, vec!["007", "1e3", "7"]);
        assert_eq!(dataset.rows()[2].value("L_1"), &CellValue::Number(7.0));
    }

    #[test]
    fn test_read_csv_bytes_with_bom_and_quotes() {
        let dataset = read_csv_bytes(b"\xEF\xBB\xBFL_1,L_2\n\"A, B\",X\n,\nC,1\n").unwrap();
        assert_eq!(dataset.columns(), ["L_1", "L_2"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[0].value("L_1"), &CellValue::text("A, B"));
        assert_eq!(dataset.rows()[1].value("L_2"), &CellValue::Number(1.0));
    }

    #[test]
    fn test_read_csv_bytes_rejects_utf16() {
        let err = read_csv_bytes(&[0xFF, 0xFE, b'L', 0]).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE"
            }
        ));
    }

    #[test]
    fn test_read_csv_bytes_empty_input() {
        let dataset = read_csv_bytes(b"").unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.columns().is_empty());
    }
}
