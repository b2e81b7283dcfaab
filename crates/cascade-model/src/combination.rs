use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

use crate::CellValue;

/// Key of the identifier field in an exported record.
pub const ID_KEY: &str = "ID";

/// One level's contribution to a [`Combination`].
///
/// `Unset` is written as the placeholder `[null]` so that "not chosen" stays
/// distinguishable from any real selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSnapshot {
    Unset,
    Chosen(Vec<CellValue>),
}

impl LevelSnapshot {
    pub fn from_selection(selection: &[CellValue]) -> Self {
        if selection.is_empty() {
            Self::Unset
        } else {
            Self::Chosen(selection.to_vec())
        }
    }

    pub fn values(&self) -> &[CellValue] {
        match self {
            Self::Unset => &[],
            Self::Chosen(values) => values,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl Serialize for LevelSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&CellValue::Missing)?;
                seq.end()
            }
            Self::Chosen(values) => values.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for LevelSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<CellValue>::deserialize(deserializer)?;
        match values.as_slice() {
            [] | [CellValue::Missing] => Ok(Self::Unset),
            _ if values.iter().any(CellValue::is_missing) => Err(D::Error::custom(
                "null is only allowed as the single placeholder element",
            )),
            _ => Ok(Self::Chosen(values)),
        }
    }
}

/// A level column paired with its snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub column: String,
    pub snapshot: LevelSnapshot,
}

/// An identifier plus the snapshot of every level at the moment it was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub id: String,
    pub levels: Vec<LevelEntry>,
}

impl Combination {
    pub fn new(id: impl Into<String>, levels: Vec<LevelEntry>) -> Self {
        Self {
            id: id.into(),
            levels,
        }
    }

    pub fn snapshot(&self, column: &str) -> Option<&LevelSnapshot> {
        self.levels
            .iter()
            .find(|entry| entry.column == column)
            .map(|entry| &entry.snapshot)
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.levels.len() + 1))?;
        map.serialize_entry(ID_KEY, &self.id)?;
        for entry in &self.levels {
            map.serialize_entry(&entry.column, &entry.snapshot)?;
        }
        map.end()
    }
}
