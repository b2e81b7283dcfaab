//! Per-level selections and the cascade-reset rule.

use cascade_model::{CellValue, LevelChain, LevelEntry, LevelSnapshot};

use crate::error::{Result, SelectionError};

/// Current picks for every level of a chain.
///
/// Invariants, held after every mutation:
/// - each level holds at most its cap of values, without duplicates;
/// - if a level is empty, every level after it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    chain: LevelChain,
    levels: Vec<Vec<CellValue>>,
}

impl SelectionState {
    pub fn new(chain: LevelChain) -> Self {
        let levels = vec![Vec::new(); chain.len()];
        Self { chain, levels }
    }

    pub fn chain(&self) -> &LevelChain {
        &self.chain
    }

    /// Selected values of `level` in selection order; empty for unknown levels.
    pub fn selection(&self, level: usize) -> &[CellValue] {
        self.levels.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `level` accepts a non-empty selection: it is the root, or its
    /// parent has something selected.
    pub fn is_enabled(&self, level: usize) -> bool {
        match self.chain.parent_of(level) {
            None => level < self.chain.len(),
            Some(parent) => !self.selection(parent).is_empty(),
        }
    }

    /// Replace `level`'s selection and clear every level after it.
    ///
    /// Duplicates collapse to their first occurrence before the cap is checked.
    /// Rejected updates leave the state untouched. Returns the number of
    /// descendant levels that lost a selection.
    pub fn set_level(&mut self, level: usize, values: Vec<CellValue>) -> Result<usize> {
        let spec = self
            .chain
            .get(level)
            .ok_or(SelectionError::UnknownLevel { level })?;

        let mut deduped: Vec<CellValue> = Vec::with_capacity(values.len());
        for value in values {
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }

        if deduped.len() > spec.max_selections {
            return Err(SelectionError::CapExceeded {
                column: spec.column.clone(),
                max: spec.max_selections,
                attempted: deduped.len(),
            });
        }
        if !deduped.is_empty() && !self.is_enabled(level) {
            let parent = self
                .chain
                .parent_of(level)
                .and_then(|parent| self.chain.get(parent))
                .map(|parent| parent.column.clone())
                .unwrap_or_default();
            return Err(SelectionError::ParentUnselected {
                column: spec.column.clone(),
                parent,
            });
        }

        self.levels[level] = deduped;
        Ok(self.clear_descendants(level))
    }

    /// Clear `level` and everything after it.
    pub fn clear_level(&mut self, level: usize) -> Result<usize> {
        self.set_level(level, Vec::new())
    }

    /// Clear every level.
    pub fn reset(&mut self) {
        for selection in &mut self.levels {
            selection.clear();
        }
    }

    /// Keep only the values of `level` found in `allowed`, preserving
    /// selection order. If nothing survives, descendants are cleared too.
    pub fn retain_allowed(&mut self, level: usize, allowed: &[CellValue]) {
        let Some(selection) = self.levels.get_mut(level) else {
            return;
        };
        selection.retain(|value| allowed.contains(value));
        if selection.is_empty() {
            self.clear_descendants(level);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }

    /// Snapshot of every level, empty levels as [`LevelSnapshot::Unset`].
    pub fn snapshot(&self) -> Vec<LevelEntry> {
        self.chain
            .iter()
            .zip(&self.levels)
            .map(|(spec, selection)| LevelEntry {
                column: spec.column.clone(),
                snapshot: LevelSnapshot::from_selection(selection),
            })
            .collect()
    }

    /// Check both invariants. Used by tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let within_caps = self
            .chain
            .iter()
            .zip(&self.levels)
            .all(|(spec, selection)| selection.len() <= spec.max_selections);
        let first_empty = self.levels.iter().position(Vec::is_empty);
        let cascades = match first_empty {
            None => true,
            Some(idx) => self.levels[idx..].iter().all(Vec::is_empty),
        };
        within_caps && cascades
    }

    fn clear_descendants(&mut self, level: usize) -> usize {
        let mut cleared = 0;
        for idx in self.chain.descendants(level) {
            if !self.levels[idx].is_empty() {
                self.levels[idx].clear();
                cleared += 1;
            }
        }
        debug_assert!(self.is_consistent());
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    fn filled() -> SelectionState {
        let mut state = SelectionState::new(LevelChain::default());
        state.set_level(0, text(&["A"])).unwrap();
        state.set_level(1, text(&["B"])).unwrap();
        state.set_level(2, text(&["C"])).unwrap();
        state.set_level(3, text(&["D"])).unwrap();
        state
    }

    #[test]
    fn setting_a_level_clears_all_descendants() {
        let mut state = filled();
        let cleared = state.set_level(1, text(&["B2"])).unwrap();
        assert_eq!(cleared, 2);
        assert_eq!(state.selection(0), text(&["A"]).as_slice());
        assert_eq!(state.selection(1), text(&["B2"]).as_slice());
        assert!(state.selection(2).is_empty());
        assert!(state.selection(3).is_empty());
        assert!(state.is_consistent());
    }

    #[test]
    fn setting_the_root_clears_everything_below() {
        let mut state = filled();
        state.set_level(0, text(&["Z"])).unwrap();
        assert!((1..6).all(|level| state.selection(level).is_empty()));
    }

    #[test]
    fn over_cap_update_is_rejected_unchanged() {
        let mut state = filled();
        let before = state.clone();
        let err = state.set_level(0, text(&["A", "B", "C"])).unwrap_err();
        assert_eq!(
            err,
            SelectionError::CapExceeded {
                column: "L_1".to_string(),
                max: 2,
                attempted: 3
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn duplicates_collapse_before_cap_check() {
        let mut state = SelectionState::new(LevelChain::default());
        state.set_level(0, text(&["A", "A", "B", "A"])).unwrap();
        assert_eq!(state.selection(0), text(&["A", "B"]).as_slice());
    }

    #[test]
    fn disabled_level_rejects_values() {
        let mut state = SelectionState::new(LevelChain::default());
        let err = state.set_level(2, text(&["C"])).unwrap_err();
        assert!(matches!(err, SelectionError::ParentUnselected { ref parent, .. } if parent == "L_2"));
        assert!(state.is_empty());
        // clearing a disabled level is always allowed
        assert_eq!(state.clear_level(2), Ok(0));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let mut state = SelectionState::new(LevelChain::default());
        assert_eq!(
            state.set_level(6, Vec::new()),
            Err(SelectionError::UnknownLevel { level: 6 })
        );
    }

    #[test]
    fn retain_allowed_prunes_and_cascades() {
        let mut state = filled();
        state.retain_allowed(1, &text(&["other"]));
        assert!(state.selection(1).is_empty());
        assert!(state.selection(2).is_empty());
        assert_eq!(state.selection(0), text(&["A"]).as_slice());
    }

    #[test]
    fn snapshot_marks_empty_levels_unset() {
        let state = filled();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.len(), 6);
        assert_eq!(snapshot[0].snapshot.values(), text(&["A"]).as_slice());
        assert!(snapshot[4].snapshot.is_unset());
        assert!(snapshot[5].snapshot.is_unset());
    }
}
