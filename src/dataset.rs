//! CSV ingest and deterministic partitioning of historical observations.
//!
//! Ingest is strict about schema: the six feature columns and the target must
//! all be present in the header before any numeric work starts. Row handling
//! is lenient: a row missing (or failing to parse) any required value is
//! dropped and counted, never guessed at.

use std::fs::File;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::error::TrainError;
use crate::schema::{FeatureVector, Observation, FEATURE_COLUMNS, FEATURE_COUNT, TARGET_COLUMN};

/// Historical observations loaded from a tabular source, with ingest counts.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub observations: Vec<Observation>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Loads observations from a CSV file.
///
/// Fails with [`TrainError::DataSource`] when the file cannot be opened and
/// with [`TrainError::Schema`] (listing every missing name) when a required
/// column is absent from the header.
pub fn load_csv(path: &Path) -> Result<Dataset, TrainError> {
    let file = File::open(path).map_err(|source| TrainError::DataSource {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| TrainError::DataSource {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?
        .clone();

    let column_index = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = FEATURE_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(TARGET_COLUMN))
        .filter(|name| column_index(name).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(TrainError::Schema { missing });
    }

    // Indices are resolved once; rows are then read positionally.
    let feature_indices: Vec<usize> = FEATURE_COLUMNS
        .iter()
        .map(|name| column_index(name).expect("presence checked above"))
        .collect();
    let target_index = column_index(TARGET_COLUMN).expect("presence checked above");

    let mut observations = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for record in reader.records() {
        let record = record.map_err(|e| TrainError::DataSource {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        rows_read += 1;

        match parse_row(&record, &feature_indices, target_index) {
            Some(obs) => observations.push(obs),
            None => rows_dropped += 1,
        }
    }

    debug!(rows_read, rows_dropped, path = %path.display(), "dataset loaded");

    Ok(Dataset { observations, rows_read, rows_dropped })
}

/// A row is admissible only if fully observed on the required columns.
fn parse_row(
    record: &csv::StringRecord,
    feature_indices: &[usize],
    target_index: usize,
) -> Option<Observation> {
    let mut values = [0.0f64; FEATURE_COUNT];
    for (slot, &idx) in values.iter_mut().zip(feature_indices) {
        *slot = parse_cell(record.get(idx)?)?;
    }
    let target = parse_cell(record.get(target_index)?)?;

    Some(Observation {
        features: FeatureVector::from_array(values),
        energy_delta_wh: target,
    })
}

fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Splits observations into training and held-out partitions with a seeded
/// shuffle. The same seed on the same data always yields the same partition.
pub fn train_test_split(
    observations: &[Observation],
    test_fraction: f64,
    seed: u64,
) -> (Vec<Observation>, Vec<Observation>) {
    let n = observations.len();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = ((n as f64) * test_fraction).ceil() as usize;
    let test_len = test_len.min(n);

    let test = indices[..test_len].iter().map(|&i| observations[i]).collect();
    let train = indices[test_len..].iter().map(|&i| observations[i]).collect();
    (train, test)
}
