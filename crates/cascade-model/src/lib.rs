//! Data model for the cascade picker.
//!
//! A [`Dataset`] of [`Row`]s feeds an ordered [`LevelChain`]; the user's picks
//! across the chain are captured as [`Combination`]s.

pub mod combination;
pub mod config;
pub mod dataset;
pub mod error;
pub mod level;
pub mod value;

pub use combination::{Combination, ID_KEY, LevelEntry, LevelSnapshot};
pub use config::{CascadeConfig, DEFAULT_EXPORT_FILE, EXPORT_MIME_TYPE};
pub use dataset::{Dataset, Row};
pub use error::{ModelError, Result};
pub use level::{DEFAULT_LEVEL_CAPS, DEFAULT_LEVEL_COLUMNS, LevelChain, LevelSpec};
pub use value::CellValue;
