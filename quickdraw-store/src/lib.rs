//! CSV persistence for sample sets.
//!
//! One file per collection run, named `sample-<k>.csv` inside a data
//! directory. Files carry a header row naming the pick slots `1..6`
//! positionally, then one row per sample. Short rows (a glitched collection)
//! are padded with empty fields on write and the empty fields are skipped on
//! read, so a round trip preserves the recorded numbers exactly.

use std::fs;
use std::path::{Path, PathBuf};

use quickdraw_common::{Sample, SampleSet, PICK_SLOTS};
use thiserror::Error;
use tracing::{debug, info};

/// File extension of persisted sample tables.
pub const SAMPLE_EXTENSION: &str = "csv";

const SAMPLE_STEM: &str = "sample";

/// Errors from reading or writing sample tables.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path does not exist or is not a regular file.
    #[error("sample file not found: {0}")]
    NotFound(PathBuf),

    /// A cell could not be parsed as a pick number.
    #[error("malformed sample file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Load one persisted sample table.
///
/// A missing path is an error, never an empty set: silently returning
/// nothing here would corrupt any set merged downstream.
pub fn read_sample(path: &Path) -> Result<SampleSet, StoreError> {
    if !path.is_file() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut set = SampleSet::default();
    for record in reader.records() {
        let record = record?;
        let mut numbers = Vec::with_capacity(PICK_SLOTS);
        for field in record.iter() {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            let number: u8 = field.parse().map_err(|_| StoreError::Malformed {
                path: path.to_path_buf(),
                reason: format!("cell {field:?} is not a pick number"),
            })?;
            numbers.push(number);
        }
        set.push(Sample::new(numbers));
    }

    debug!(
        target: "store",
        path = %path.display(),
        rows = set.len(),
        "sample file loaded"
    );
    Ok(set)
}

/// Persist a sample set, creating parent directories as needed.
///
/// Writing an empty set is a silent no-op: no file is created.
pub fn write_sample(set: &SampleSet, path: &Path) -> Result<(), StoreError> {
    if set.is_empty() {
        debug!(target: "store", path = %path.display(), "empty set; nothing written");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    writer.write_record((1..=PICK_SLOTS).map(|slot| slot.to_string()))?;
    for sample in set.iter() {
        let mut row: Vec<String> = sample.numbers().iter().map(u8::to_string).collect();
        row.resize(PICK_SLOTS, String::new());
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!(
        target: "store",
        path = %path.display(),
        rows = set.len(),
        "sample file written"
    );
    Ok(())
}

/// Load and concatenate every sample table in `dir` (non-recursive).
///
/// Per-file row order is preserved; the order across files follows directory
/// iteration order, which is platform-defined; callers must not rely on a
/// specific cross-file ordering.
pub fn read_samples(dir: &Path) -> Result<SampleSet, StoreError> {
    let mut combined = SampleSet::default();
    let mut files = 0usize;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if has_sample_extension(&path) {
            combined.extend(read_sample(&path)?);
            files += 1;
        }
    }

    info!(
        target: "store",
        dir = %dir.display(),
        files,
        rows = combined.len(),
        "sample directory merged"
    );
    Ok(combined)
}

/// Compute the path of the next sample file in `dir`: existing tables are
/// counted and the next 1-indexed name is taken.
///
/// Best-effort only: collision-free with a single writer and an unbroken
/// naming sequence.
pub fn next_sample_path(dir: &Path) -> Result<PathBuf, StoreError> {
    let existing = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| has_sample_extension(&entry.path()))
        .count();
    Ok(dir.join(format!("{SAMPLE_STEM}-{}.{SAMPLE_EXTENSION}", existing + 1)))
}

fn has_sample_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(SAMPLE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set(rows: &[&[u8]]) -> SampleSet {
        rows.iter()
            .map(|numbers| Sample::new(numbers.to_vec()))
            .collect()
    }

    #[test]
    fn round_trip_preserves_rows_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample-1.csv");

        let set = sample_set(&[&[1, 2, 3, 4, 5, 6], &[7, 14, 21, 28, 35, 42]]);
        write_sample(&set, &path).unwrap();

        let loaded = read_sample(&path).unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn short_rows_survive_a_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample-1.csv");

        let set = sample_set(&[&[9, 17], &[1, 2, 3, 4, 5, 6]]);
        write_sample(&set, &path).unwrap();

        let loaded = read_sample(&path).unwrap();
        assert_eq!(loaded.samples()[0].numbers(), &[9, 17]);
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn empty_set_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("sample-1.csv");

        write_sample(&SampleSet::default(), &path).unwrap();
        assert!(!path.exists());
        // Parent creation is skipped along with the file.
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn write_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("sample-1.csv");

        write_sample(&sample_set(&[&[1, 2, 3, 4, 5, 6]]), &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_sample(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn malformed_cells_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample-1.csv");
        fs::write(&path, "1,2,3,4,5,6\n1,2,three,4,5,6\n").unwrap();

        let err = read_sample(&path).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn merge_concatenates_every_table() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(
            &sample_set(&[&[1, 2, 3, 4, 5, 6]]),
            &dir.path().join("sample-1.csv"),
        )
        .unwrap();
        write_sample(
            &sample_set(&[&[7, 8, 9, 10, 11, 12], &[13, 14, 15, 16, 17, 18]]),
            &dir.path().join("sample-2.csv"),
        )
        .unwrap();
        // Files with other extensions are ignored.
        fs::write(dir.path().join("notes.txt"), "not a table").unwrap();

        let combined = read_samples(dir.path()).unwrap();
        assert_eq!(combined.len(), 3);
    }

    #[test]
    fn next_path_counts_existing_tables() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            next_sample_path(dir.path()).unwrap(),
            dir.path().join("sample-1.csv")
        );

        write_sample(
            &sample_set(&[&[1, 2, 3, 4, 5, 6]]),
            &dir.path().join("sample-1.csv"),
        )
        .unwrap();
        write_sample(
            &sample_set(&[&[1, 2, 3, 4, 5, 6]]),
            &dir.path().join("sample-2.csv"),
        )
        .unwrap();

        assert_eq!(
            next_sample_path(dir.path()).unwrap(),
            dir.path().join("sample-3.csv")
        );
    }
}
