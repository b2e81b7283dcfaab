//! The owning component: dataset, selections, pending identifier, and log.

use std::path::Path;

use cascade_ingest::{DatasetSource, LoadedDataset, read_dataset};
use cascade_model::{CellValue, Combination, Dataset, LevelChain};
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result, SelectionError};
use crate::export::to_jsonl;
use crate::log::CombinationLog;
use crate::options::options_for;
use crate::selection::SelectionState;

/// Ticket handed out when an upload starts; only the newest ticket applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
}

impl UploadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// What happened to a finished upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The dataset was replaced.
    Applied { rows: usize },
    /// The upload could not be read; the dataset is now empty.
    Failed,
    /// A newer upload started after this one; nothing changed.
    Stale,
}

/// Render-ready state of one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelView {
    pub index: usize,
    pub column: String,
    pub max_selections: usize,
    pub selected: Vec<CellValue>,
    pub options: Vec<CellValue>,
    /// False while the parent level has no selection.
    pub enabled: bool,
    /// True when the cap is reached; the "max N" notice is shown.
    pub at_cap: bool,
}

/// Cascading multi-level selector over an uploaded dataset.
///
/// All mutation goes through the methods below, each of which keeps the
/// cascade and cap invariants of [`SelectionState`].
#[derive(Debug, Clone)]
pub struct CascadeSelector {
    dataset: Dataset,
    source: Option<DatasetSource>,
    selections: SelectionState,
    identifier: String,
    log: CombinationLog,
    upload_generation: u64,
}

impl CascadeSelector {
    pub fn new(chain: LevelChain) -> Self {
        Self {
            dataset: Dataset::empty(),
            source: None,
            selections: SelectionState::new(chain),
            identifier: String::new(),
            log: CombinationLog::new(),
            upload_generation: 0,
        }
    }

    pub fn with_dataset(chain: LevelChain, dataset: Dataset) -> Self {
        let mut selector = Self::new(chain);
        selector.dataset = dataset;
        selector
    }

    pub fn chain(&self) -> &LevelChain {
        self.selections.chain()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn source(&self) -> Option<&DatasetSource> {
        self.source.as_ref()
    }

    pub fn selections(&self) -> &SelectionState {
        &self.selections
    }

    pub fn selection(&self, level: usize) -> &[CellValue] {
        self.selections.selection(level)
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    /// Start an upload. Any ticket issued earlier becomes stale.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.upload_generation += 1;
        UploadTicket {
            generation: self.upload_generation,
        }
    }

    /// Apply a finished upload if `ticket` is still the newest one.
    ///
    /// A failed read leaves an empty dataset, which is a valid state with no
    /// options anywhere.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: cascade_ingest::Result<LoadedDataset>,
    ) -> UploadOutcome {
        if ticket.generation != self.upload_generation {
            debug!(
                ticket = ticket.generation,
                current = self.upload_generation,
                "discarding stale upload"
            );
            return UploadOutcome::Stale;
        }
        match result {
            Ok(loaded) => {
                let rows = loaded.dataset.len();
                self.replace_dataset(loaded.dataset, Some(loaded.source));
                UploadOutcome::Applied { rows }
            }
            Err(error) => {
                warn!(%error, "upload unreadable, no options available");
                self.replace_dataset(Dataset::empty(), None);
                UploadOutcome::Failed
            }
        }
    }

    /// Read `path` and apply it as the newest upload.
    pub fn load_path(&mut self, path: &Path) -> UploadOutcome {
        let ticket = self.begin_upload();
        let result = read_dataset(path);
        self.finish_upload(ticket, result)
    }

    /// Replace the dataset wholesale.
    ///
    /// Existing selections keep their order but are pruned, top-down, to the
    /// values the new dataset still offers; emptied levels cascade.
    pub fn replace_dataset(&mut self, dataset: Dataset, source: Option<DatasetSource>) {
        self.dataset = dataset;
        self.source = source;
        for level in 0..self.chain().len() {
            if self.selections.selection(level).is_empty() {
                continue;
            }
            let allowed = self.options(level);
            self.selections.retain_allowed(level, &allowed);
        }
        info!(
            rows = self.dataset.len(),
            columns = self.dataset.columns().len(),
            "dataset replaced"
        );
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// Options for `level` filtered by an explicit `parent` (or none).
    pub fn options_for(&self, level: usize, parent: Option<usize>) -> Vec<CellValue> {
        options_for(&self.dataset, &self.selections, level, parent)
    }

    /// Options for `level` filtered by its parent in the chain.
    pub fn options(&self, level: usize) -> Vec<CellValue> {
        self.options_for(level, self.chain().parent_of(level))
    }

    pub fn is_enabled(&self, level: usize) -> bool {
        self.selections.is_enabled(level)
    }

    pub fn level_views(&self) -> Vec<LevelView> {
        self.chain()
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let selected = self.selection(index).to_vec();
                LevelView {
                    index,
                    column: spec.column.clone(),
                    max_selections: spec.max_selections,
                    at_cap: selected.len() >= spec.max_selections,
                    selected,
                    options: self.options(index),
                    enabled: self.is_enabled(index),
                }
            })
            .collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Replace `level`'s selection and clear every level after it.
    ///
    /// Rejected updates (over the cap, disabled level, value not offered)
    /// leave every selection unchanged.
    pub fn set_level(&mut self, level: usize, values: Vec<CellValue>) -> Result<usize> {
        if level < self.chain().len() && self.is_enabled(level) {
            let offered = self.options(level);
            if let Some(value) = values.iter().find(|value| !offered.contains(value)) {
                let column = self
                    .chain()
                    .get(level)
                    .map(|spec| spec.column.clone())
                    .unwrap_or_default();
                let err = SelectionError::UnknownOption {
                    column,
                    value: value.to_string(),
                };
                warn!(%err, "selection rejected");
                return Err(err);
            }
        }
        match self.selections.set_level(level, values) {
            Ok(cleared) => {
                debug!(
                    level,
                    selected = self.selection(level).len(),
                    cleared,
                    "selection updated"
                );
                Ok(cleared)
            }
            Err(err) => {
                warn!(%err, "selection rejected");
                Err(err)
            }
        }
    }

    pub fn clear_level(&mut self, level: usize) -> Result<usize> {
        self.set_level(level, Vec::new())
    }

    pub fn reset_selections(&mut self) {
        self.selections.reset();
    }

    // =========================================================================
    // Combinations
    // =========================================================================

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    /// Snapshot every level under `identifier`, then reset selections and the
    /// pending identifier. Returns the pending count.
    pub fn add(&mut self, identifier: impl Into<String>) -> usize {
        let combination = Combination::new(identifier, self.selections.snapshot());
        let id = combination.id.clone();
        let count = self.log.push(combination);
        self.selections.reset();
        self.identifier.clear();
        info!(id = %id, pending = count, "combination added");
        count
    }

    /// [`add`](Self::add) using the pending identifier.
    pub fn add_pending(&mut self) -> usize {
        let identifier = std::mem::take(&mut self.identifier);
        self.add(identifier)
    }

    pub fn combinations(&self) -> &[Combination] {
        self.log.entries()
    }

    /// Combinations added since the last export.
    pub fn pending_count(&self) -> usize {
        self.log.counter()
    }

    /// Serialize the log as newline-delimited JSON and clear it.
    ///
    /// The log is only cleared when serialization succeeds.
    pub fn export_log(&mut self) -> Result<Vec<u8>, ExportError> {
        self.export_log_with(|blob| Ok(blob.to_vec()))
    }

    /// Serialize the log once, hand the blob to `write`, and clear the log
    /// only if `write` succeeds.
    pub fn export_log_with<T, E>(
        &mut self,
        write: impl FnOnce(&[u8]) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<ExportError>,
    {
        let blob = to_jsonl(self.log.entries()).map_err(E::from)?;
        let written = write(&blob)?;
        let exported = self.log.entries().len();
        self.log.clear();
        info!(exported, bytes = blob.len(), "combinations exported");
        Ok(written)
    }
}

impl Default for CascadeSelector {
    fn default() -> Self {
        Self::new(LevelChain::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_ingest::IngestError;
    use cascade_model::Row;

    fn text(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    fn dataset(rows: &[(&str, &str)]) -> Dataset {
        rows.iter()
            .map(|(l1, l2)| Row::from_pairs([("L_1", *l1), ("L_2", *l2)]))
            .collect()
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut selector =
            CascadeSelector::with_dataset(LevelChain::default(), dataset(&[("A", "X")]));
        let err = selector.set_level(0, text(&["Q"])).unwrap_err();
        assert_eq!(
            err,
            SelectionError::UnknownOption {
                column: "L_1".to_string(),
                value: "Q".to_string()
            }
        );
        assert!(selector.selection(0).is_empty());
    }

    #[test]
    fn stale_upload_is_discarded() {
        let mut selector = CascadeSelector::default();
        let first = selector.begin_upload();
        let second = selector.begin_upload();
        assert!(second.generation() > first.generation());

        let outcome = selector.finish_upload(first, Err(IngestError::NoWorksheet));
        assert_eq!(outcome, UploadOutcome::Stale);

        let outcome = selector.finish_upload(second, Err(IngestError::NoWorksheet));
        assert_eq!(outcome, UploadOutcome::Failed);
        assert!(selector.dataset().is_empty());
        assert!(selector.source().is_none());
    }

    #[test]
    fn add_pending_uses_and_clears_identifier() {
        let mut selector =
            CascadeSelector::with_dataset(LevelChain::default(), dataset(&[("A", "X")]));
        selector.set_identifier("first");
        selector.set_level(0, text(&["A"])).unwrap();
        assert_eq!(selector.add_pending(), 1);
        assert_eq!(selector.identifier(), "");
        assert!(selector.selections().is_empty());
        assert_eq!(selector.combinations()[0].id, "first");
    }

    #[derive(Debug, PartialEq)]
    enum SinkError {
        Full,
        Export,
    }

    impl From<ExportError> for SinkError {
        fn from(_: ExportError) -> Self {
            Self::Export
        }
    }

    #[test]
    fn failed_export_sink_keeps_the_log() {
        let mut selector =
            CascadeSelector::with_dataset(LevelChain::default(), dataset(&[("A", "X")]));
        selector.add("kept");

        let result: std::result::Result<(), SinkError> =
            selector.export_log_with(|_| Err(SinkError::Full));
        assert_eq!(result, Err(SinkError::Full));
        assert_eq!(selector.pending_count(), 1);

        let mut seen = Vec::new();
        let written: std::result::Result<usize, ExportError> =
            selector.export_log_with(|blob| {
                seen.extend_from_slice(blob);
                Ok(blob.len())
            });
        assert_eq!(written.unwrap(), seen.len());
        assert!(seen.starts_with(br#"{"ID":"kept""#));
        assert!(selector.combinations().is_empty());
        assert_eq!(selector.pending_count(), 0);
    }

    #[test]
    fn reset_selections_clears_every_level_but_keeps_the_log() {
        let mut selector = CascadeSelector::with_dataset(
            LevelChain::default(),
            dataset(&[("A", "X"), ("B", "Y")]),
        );
        selector.add("first");
        selector.set_identifier("pending");
        selector.set_level(0, text(&["A"])).unwrap();
        selector.set_level(1, text(&["X"])).unwrap();

        selector.reset_selections();
        assert!(selector.selections().is_empty());
        assert_eq!(selector.identifier(), "pending");
        assert_eq!(selector.pending_count(), 1);
    }

    #[test]
    fn level_views_report_disabled_and_cap_state() {
        let mut selector = CascadeSelector::with_dataset(
            LevelChain::default(),
            dataset(&[("A", "X"), ("B", "Y")]),
        );
        selector.set_level(0, text(&["A", "B"])).unwrap();
        let views = selector.level_views();
        assert!(views[0].at_cap);
        assert!(views[1].enabled);
        assert_eq!(views[1].options, text(&["X", "Y"]));
        assert!(!views[2].enabled);
        assert!(views[2].options.is_empty());
    }
}
