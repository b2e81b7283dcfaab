//! Header row normalization and record assembly.

use std::collections::BTreeSet;

use cascade_model::{CellValue, Dataset, Row};

/// Trim a header cell, strip a BOM, and collapse inner whitespace runs.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn the header row into record keys.
///
/// Empty headers drop their column (`None`). A repeated header gets the first
/// free `_N` suffix, so `L_1, L_1` becomes `L_1, L_1_1`.
pub fn assign_keys(raw: &[String]) -> Vec<Option<String>> {
    let mut used = BTreeSet::new();
    raw.iter()
        .map(|value| {
            let name = normalize_header(value);
            if name.is_empty() {
                return None;
            }
            let mut key = name.clone();
            let mut suffix = 1usize;
            while used.contains(&key) {
                key = format!("{name}_{suffix}");
                suffix += 1;
            }
            used.insert(key.clone());
            Some(key)
        })
        .collect()
}

/// Zip data records with the header keys, skipping rows with no values.
pub(crate) fn assemble<I>(keys: &[Option<String>], records: I) -> Dataset
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let columns: Vec<String> = keys.iter().flatten().cloned().collect();
    let mut rows = Vec::new();
    for record in records {
        let mut row = Row::new();
        for (key, value) in keys.iter().zip(record) {
            if let Some(key) = key {
                if !value.is_missing() {
                    row.insert(key.clone(), value);
                }
            }
        }
        if row.is_empty() {
            continue;
        }
        rows.push(row);
    }
    Dataset::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  L_1  "), "L_1");
        assert_eq!(normalize_header("\u{feff}L_1"), "L_1");
        assert_eq!(normalize_header("Level   one"), "Level one");
    }

    #[test]
    fn test_assign_keys_dedupes_and_drops_empty() {
        let keys = assign_keys(&strings(&["L_1", "", "L_1", "L_1", "L_2"]));
        assert_eq!(
            keys,
            vec![
                Some("L_1".to_string()),
                None,
                Some("L_1_1".to_string()),
                Some("L_1_2".to_string()),
                Some("L_2".to_string()),
            ]
        );
    }

    #[test]
    fn test_assemble_skips_blank_rows_and_short_records() {
        let keys = assign_keys(&strings(&["L_1", "L_2"]));
        let dataset = assemble(
            &keys,
            vec![
                vec![CellValue::text("A")],
                vec![CellValue::Missing, CellValue::Missing],
                vec![CellValue::text("B"), CellValue::Number(2.0)],
            ],
        );
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns(), ["L_1", "L_2"]);
        assert!(dataset.rows()[0].value("L_2").is_missing());
        assert_eq!(dataset.rows()[1].value("L_2"), &CellValue::Number(2.0));
    }
}
