//! Cascading selection engine.
//!
//! [`CascadeSelector`] owns the uploaded dataset, the per-level selections,
//! the pending identifier and the combination log. Level `k` offers the
//! values of its column found in rows matching level `k - 1`'s selection;
//! changing a level clears every level after it.
//!
//! # Example
//!
//! ```ignore
//! use cascade_core::CascadeSelector;
//! use cascade_model::{CellValue, LevelChain};
//!
//! let mut selector = CascadeSelector::new(LevelChain::default());
//! selector.load_path(Path::new("levels.xlsx"));
//! selector.set_level(0, vec![CellValue::text("A")])?;
//! selector.add("first");
//! let blob = selector.export_log()?;
//! ```

pub mod error;
pub mod export;
pub mod log;
pub mod options;
pub mod selection;
pub mod selector;

pub use error::{ExportError, SelectionError};
pub use export::{read_jsonl, to_jsonl};
pub use log::CombinationLog;
pub use options::options_for;
pub use selection::SelectionState;
pub use selector::{CascadeSelector, LevelView, UploadOutcome, UploadTicket};
