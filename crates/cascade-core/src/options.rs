//! Option derivation: which values a level offers given its parent's picks.

use std::collections::HashSet;

use cascade_model::{CellValue, Dataset};

use crate::selection::SelectionState;

/// Distinct selectable values of `level`'s column, in first-seen row order.
///
/// With `parent` set, only rows whose parent-column value equals one of the
/// parent's selected values contribute. An empty parent selection therefore
/// yields no options rather than disabling the filter.
///
/// Unknown level indices yield no options.
pub fn options_for(
    dataset: &Dataset,
    selections: &SelectionState,
    level: usize,
    parent: Option<usize>,
) -> Vec<CellValue> {
    let chain = selections.chain();
    let Some(spec) = chain.get(level) else {
        return Vec::new();
    };
    let filter = match parent {
        None => None,
        Some(parent) => match chain.get(parent) {
            Some(parent_spec) => Some((
                parent_spec.column.as_str(),
                selections.selection(parent),
            )),
            None => return Vec::new(),
        },
    };

    let mut seen: HashSet<&CellValue> = HashSet::new();
    let mut options = Vec::new();
    for row in dataset.rows() {
        if let Some((column, chosen)) = filter {
            let value = row.value(column);
            if !chosen.iter().any(|selected| selected == value) {
                continue;
            }
        }
        let value = row.value(&spec.column);
        if value.is_selectable() && seen.insert(value) {
            options.push(value.clone());
        }
    }
    options
}
