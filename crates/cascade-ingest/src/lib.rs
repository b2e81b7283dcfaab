//! Spreadsheet ingestion for the cascade picker.
//!
//! Turns an uploaded file into a [`Dataset`](cascade_model::Dataset): the first
//! worksheet only, with the header row supplying the record keys.
//!
//! # Features
//!
//! - **Workbooks**: `xlsx`, `xlsm`, `xlsb`, `xls`, `ods` via calamine
//! - **CSV**: comma-separated text with the same header rules
//! - **Provenance**: size and SHA-256 fingerprint of every upload
//! - **Lenient loading**: [`load_dataset_or_empty`] never fails
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cascade_ingest::read_dataset;
//!
//! let loaded = read_dataset(Path::new("levels.xlsx"))?;
//! println!("{} rows from {}", loaded.dataset.len(), loaded.source.short_fingerprint());
//! ```

mod delimited;
mod error;
mod format;
mod header;
mod load;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Format Readers ===
pub use delimited::{parse_cell, read_csv_bytes};
pub use format::SourceFormat;
pub use header::{assign_keys, normalize_header};
pub use workbook::{cell_value, read_workbook_bytes};

// === File Loading ===
pub use load::{
    DatasetSource, LoadedDataset, MAX_UPLOAD_SIZE, load_dataset_or_empty, read_dataset,
    read_dataset_bytes, sha256_hex,
};
