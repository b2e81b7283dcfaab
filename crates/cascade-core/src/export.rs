//! Newline-delimited JSON export of combinations.

use cascade_model::{Combination, ID_KEY, LevelChain, LevelEntry, LevelSnapshot};
use serde_json::Value;

use crate::error::ExportError;

/// One JSON object per combination, joined by `\n`, no trailing newline.
pub fn to_jsonl(combinations: &[Combination]) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    for (idx, combination) in combinations.iter().enumerate() {
        if idx > 0 {
            out.push(b'\n');
        }
        serde_json::to_writer(&mut out, combination)?;
    }
    Ok(out)
}

/// Parse an exported blob back into combinations keyed by `chain`'s columns.
///
/// Blank lines (including a trailing newline) are skipped. Extra keys are
/// ignored; `ID` and every chain column must be present.
pub fn read_jsonl(bytes: &[u8], chain: &LevelChain) -> Result<Vec<Combination>, ExportError> {
    let mut combinations = Vec::new();
    for (idx, line) in bytes.split(|byte| *byte == b'\n').enumerate() {
        let line_no = idx + 1;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let value: Value = serde_json::from_slice(line).map_err(|source| {
            ExportError::Malformed {
                line: line_no,
                source,
            }
        })?;
        let Value::Object(mut record) = value else {
            return Err(ExportError::NotAnObject { line: line_no });
        };

        let id = take_field(&mut record, ID_KEY, line_no)?;
        let id: String = parse_field(id, ID_KEY, line_no)?;
        let mut levels = Vec::with_capacity(chain.len());
        for column in chain.columns() {
            let raw = take_field(&mut record, column, line_no)?;
            let snapshot: LevelSnapshot = parse_field(raw, column, line_no)?;
            levels.push(LevelEntry {
                column: column.to_string(),
                snapshot,
            });
        }
        combinations.push(Combination::new(id, levels));
    }
    Ok(combinations)
}

fn take_field(
    record: &mut serde_json::Map<String, Value>,
    field: &str,
    line: usize,
) -> Result<Value, ExportError> {
    record.remove(field).ok_or_else(|| ExportError::MissingField {
        line,
        field: field.to_string(),
    })
}

fn parse_field<T: serde::de::DeserializeOwned>(
    value: Value,
    field: &str,
    line: usize,
) -> Result<T, ExportError> {
    serde_json::from_value(value).map_err(|source| ExportError::InvalidField {
        line,
        field: field.to_string(),
        source,
    })
}
