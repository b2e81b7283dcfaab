//! Invariants that must hold for any dataset and any sequence of updates.

use std::collections::HashSet;

use cascade_core::{CascadeSelector, SelectionError};
use cascade_model::{CellValue, Dataset, DEFAULT_LEVEL_COLUMNS, LevelChain, Row};
use proptest::prelude::*;

const ALPHABET: [&str; 4] = ["a", "b", "c", ""];

fn arb_row() -> impl Strategy<Value = Row> {
    prop::collection::vec(prop::option::of(0usize..ALPHABET.len()), 6).prop_map(|cells| {
        let mut row = Row::new();
        for (column, cell) in DEFAULT_LEVEL_COLUMNS.iter().zip(cells) {
            if let Some(idx) = cell {
                row.insert(*column, CellValue::text(ALPHABET[idx]));
            }
        }
        row
    })
}

fn arb_dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(arb_row(), 0..24).prop_map(|rows| rows.into_iter().collect())
}

fn arb_ops() -> impl Strategy<Value = Vec<(usize, Vec<usize>)>> {
    prop::collection::vec((0usize..6, prop::collection::vec(0usize..8, 0..5)), 0..32)
}

fn dedup(values: Vec<CellValue>) -> Vec<CellValue> {
    let mut out: Vec<CellValue> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_root_options_are_distinct_column_values(dataset in arb_dataset()) {
        let selector = CascadeSelector::with_dataset(LevelChain::default(), dataset.clone());
        for (level, column) in DEFAULT_LEVEL_COLUMNS.iter().enumerate() {
            let options = selector.options_for(level, None);
            let unique: HashSet<&CellValue> = options.iter().collect();
            prop_assert_eq!(unique.len(), options.len());

            let expected: HashSet<&CellValue> = dataset
                .rows()
                .iter()
                .map(|row| row.value(column))
                .filter(|value| value.is_selectable())
                .collect();
            prop_assert_eq!(unique, expected);
        }
    }

    #[test]
    fn prop_empty_parent_yields_no_options(dataset in arb_dataset(), level in 1usize..6) {
        let selector = CascadeSelector::with_dataset(LevelChain::default(), dataset);
        prop_assert!(selector.options_for(level, Some(level - 1)).is_empty());
    }

    #[test]
    fn prop_updates_keep_cascade_and_cap_invariants(dataset in arb_dataset(), ops in arb_ops()) {
        let mut selector = CascadeSelector::with_dataset(LevelChain::default(), dataset);
        for (level, picks) in ops {
            let offered = selector.options(level);
            let values: Vec<CellValue> = if offered.is_empty() {
                picks.iter().map(|_| CellValue::text("zz")).collect()
            } else {
                picks.iter().map(|idx| offered[idx % offered.len()].clone()).collect()
            };
            let expected = dedup(values.clone());
            let cap = selector.chain().get(level).map(|spec| spec.max_selections).unwrap_or(0);
            let before = selector.selections().clone();

            match selector.set_level(level, values) {
                Ok(_) => {
                    prop_assert!(expected.len() <= cap);
                    prop_assert_eq!(selector.selection(level), expected.as_slice());
                    for descendant in level + 1..6 {
                        prop_assert!(selector.selection(descendant).is_empty());
                    }
                }
                Err(err) => {
                    if let SelectionError::CapExceeded { attempted, .. } = err {
                        prop_assert!(attempted > cap);
                    }
                    prop_assert_eq!(selector.selections(), &before);
                }
            }
            prop_assert!(selector.selections().is_consistent());
            for (idx, spec) in selector.chain().iter().enumerate() {
                prop_assert!(selector.selection(idx).len() <= spec.max_selections);
            }
        }
    }

    #[test]
    fn prop_export_preserves_add_order(ids in prop::collection::vec("[a-z0-9]{0,6}", 0..8)) {
        let mut selector = CascadeSelector::default();
        for id in &ids {
            selector.add(id.clone());
        }
        prop_assert_eq!(selector.pending_count(), ids.len());
        let blob = selector.export_log().unwrap();
        let parsed = cascade_core::read_jsonl(&blob, &LevelChain::default()).unwrap();
        let parsed_ids: Vec<String> = parsed.into_iter().map(|c| c.id).collect();
        prop_assert_eq!(parsed_ids, ids);
        prop_assert_eq!(selector.pending_count(), 0);
    }
}
