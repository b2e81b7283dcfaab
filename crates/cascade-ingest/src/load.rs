//! File-level loading: size checks, format dispatch, provenance.

use std::path::{Path, PathBuf};

use cascade_model::Dataset;
use sha2::Digest;

use crate::delimited::read_csv_bytes;
use crate::error::{IngestError, Result};
use crate::format::SourceFormat;
use crate::workbook::read_workbook_bytes;

/// Maximum upload size (100 MB).
pub const MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024;

/// Where a dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub size: u64,
    /// Lowercase hex SHA-256 of the uploaded bytes.
    pub sha256: String,
}

impl DatasetSource {
    /// First twelve hex digits of the fingerprint, for display.
    pub fn short_fingerprint(&self) -> &str {
        &self.sha256[..self.sha256.len().min(12)]
    }
}

/// A parsed upload together with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub source: DatasetSource,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// Parse in-memory bytes of a known format.
pub fn read_dataset_bytes(bytes: &[u8], format: SourceFormat) -> Result<Dataset> {
    match format {
        SourceFormat::Workbook => read_workbook_bytes(bytes),
        SourceFormat::Csv => read_csv_bytes(bytes),
    }
}

fn read_upload(path: &Path) -> Result<Vec<u8>> {
    let io_error = |e: std::io::Error| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    };
    let metadata = std::fs::metadata(path).map_err(io_error)?;
    if metadata.len() > MAX_UPLOAD_SIZE {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_UPLOAD_SIZE,
        });
    }
    std::fs::read(path).map_err(io_error)
}

/// Load an upload from disk: first worksheet (or the CSV body), header row as keys.
pub fn read_dataset(path: &Path) -> Result<LoadedDataset> {
    let format = SourceFormat::from_path(path)?;
    let bytes = read_upload(path)?;
    let dataset = read_dataset_bytes(&bytes, format)?;
    let source = DatasetSource {
        path: path.to_path_buf(),
        format,
        size: bytes.len() as u64,
        sha256: sha256_hex(&bytes),
    };
    tracing::info!(
        path = %path.display(),
        format = %format,
        rows = dataset.len(),
        fingerprint = source.short_fingerprint(),
        "loaded dataset"
    );
    Ok(LoadedDataset { dataset, source })
}

/// Load an upload, degrading any failure to an empty dataset.
///
/// Returns `None` for the source when the load failed.
pub fn load_dataset_or_empty(path: &Path) -> (Dataset, Option<DatasetSource>) {
    match read_dataset(path) {
        Ok(loaded) => (loaded.dataset, Some(loaded.source)),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "upload unreadable, using empty dataset");
            (Dataset::empty(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let err = read_dataset(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let (dataset, source) = load_dataset_or_empty(Path::new("/definitely/not/here.csv"));
        assert!(dataset.is_empty());
        assert!(source.is_none());
    }
}
