//! Level descriptors and the ordered chain that links them.

use std::collections::BTreeSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::combination::ID_KEY;
use crate::error::{ModelError, Result};

/// Column names of the standard six-level chain.
pub const DEFAULT_LEVEL_COLUMNS: [&str; 6] = ["L_1", "L_2", "L_3", "L_4", "L_5", "L_6"];

/// Selection caps of the standard six-level chain.
pub const DEFAULT_LEVEL_CAPS: [usize; 6] = [2, 2, 3, 3, 3, 3];

/// One level: the column it reads and how many values may be chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub column: String,
    pub max_selections: usize,
}

impl LevelSpec {
    pub fn new(column: impl Into<String>, max_selections: usize) -> Self {
        Self {
            column: column.into(),
            max_selections,
        }
    }
}

/// Ordered, validated list of levels. Level `k` filters on level `k - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelChain {
    levels: Vec<LevelSpec>,
}

impl LevelChain {
    pub fn new(levels: Vec<LevelSpec>) -> Result<Self> {
        if levels.is_empty() {
            return Err(ModelError::EmptyChain);
        }
        let mut seen = BTreeSet::new();
        for (idx, level) in levels.iter().enumerate() {
            if level.column.trim().is_empty() {
                return Err(ModelError::EmptyColumn { position: idx + 1 });
            }
            if level.column == ID_KEY {
                return Err(ModelError::ReservedColumn(level.column.clone()));
            }
            if level.max_selections == 0 {
                return Err(ModelError::ZeroCap {
                    column: level.column.clone(),
                });
            }
            if !seen.insert(level.column.as_str()) {
                return Err(ModelError::DuplicateColumn(level.column.clone()));
            }
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, level: usize) -> Option<&LevelSpec> {
        self.levels.get(level)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LevelSpec> {
        self.levels.iter()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|level| level.column.as_str())
    }

    pub fn parent_of(&self, level: usize) -> Option<usize> {
        level.checked_sub(1).filter(|parent| *parent < self.len())
    }

    /// Levels strictly after `level`.
    pub fn descendants(&self, level: usize) -> Range<usize> {
        (level + 1).min(self.len())..self.len()
    }

    /// Resolve a level by column name or by 1-based position.
    pub fn resolve(&self, name: &str) -> Result<usize> {
        let name = name.trim();
        if let Some(idx) = self.levels.iter().position(|level| level.column == name) {
            return Ok(idx);
        }
        match name.parse::<usize>() {
            Ok(position) if (1..=self.len()).contains(&position) => Ok(position - 1),
            _ => Err(ModelError::UnknownLevel(name.to_string())),
        }
    }
}

impl Default for LevelChain {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVEL_COLUMNS
                .iter()
                .zip(DEFAULT_LEVEL_CAPS)
                .map(|(column, cap)| LevelSpec::new(*column, cap))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LevelChain {
    type Item = &'a LevelSpec;
    type IntoIter = std::slice::Iter<'a, LevelSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}
