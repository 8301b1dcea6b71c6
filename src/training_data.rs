//! Training-data file writer: appends batches of network inputs/targets/mask
//! rows to `<prefix>.inputs`, `<prefix>.targets`, `<prefix>.mask`. This is an
//! output boundary for an external data generator, not part of the solving
//! core itself, and knows nothing about row width beyond what the caller
//! already flattened its batch into.

use std::fs;
use std::path::Path;

use crate::error::CoreResult;

/// A flat, row-major batch: `rows * width` values, `width` fixed per file.
pub struct TrainingDataWriter;

impl TrainingDataWriter {
    /// Appends one batch to the three files rooted at `prefix`. If a file
    /// already exists its contents are read back, concatenated with the new
    /// batch, and rewritten whole (no streaming append format).
    pub fn append(prefix: &str, inputs: &[f64], targets: &[f64], mask: &[f64]) -> CoreResult<()> {
        Self::append_one(&format!("{prefix}.inputs"), inputs)?;
        Self::append_one(&format!("{prefix}.targets"), targets)?;
        Self::append_one(&format!("{prefix}.mask"), mask)?;
        Ok(())
    }

    fn append_one(path: &str, batch: &[f64]) -> CoreResult<()> {
        let mut data = Self::read(path)?;
        data.extend_from_slice(batch);
        let encoded = bincode::serialize(&data)?;
        fs::write(path, encoded)?;
        Ok(())
    }

    /// Reads back a previously written file, or an empty vector if it
    /// doesn't exist yet.
    pub fn read(path: &str) -> CoreResult<Vec<f64>> {
        if !Path::new(path).exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(path)?;
        let data: Vec<f64> = bincode::deserialize(&bytes)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_prefix(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("resolve-core-test-{name}-{}", std::process::id()));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn append_then_read_roundtrips() {
        let prefix = temp_prefix("roundtrip");
        let _ = fs::remove_file(format!("{prefix}.inputs"));
        let _ = fs::remove_file(format!("{prefix}.targets"));
        let _ = fs::remove_file(format!("{prefix}.mask"));

        TrainingDataWriter::append(&prefix, &[1.0, 2.0], &[0.5, 0.25], &[1.0, 0.0]).unwrap();
        let inputs = TrainingDataWriter::read(&format!("{prefix}.inputs")).unwrap();
        assert_eq!(inputs, vec![1.0, 2.0]);

        let _ = fs::remove_file(format!("{prefix}.inputs"));
        let _ = fs::remove_file(format!("{prefix}.targets"));
        let _ = fs::remove_file(format!("{prefix}.mask"));
    }

    #[test]
    fn second_append_concatenates_along_sample_axis() {
        let prefix = temp_prefix("concat");
        let _ = fs::remove_file(format!("{prefix}.inputs"));
        let _ = fs::remove_file(format!("{prefix}.targets"));
        let _ = fs::remove_file(format!("{prefix}.mask"));

        TrainingDataWriter::append(&prefix, &[1.0, 2.0], &[0.1, 0.2], &[1.0, 1.0]).unwrap();
        TrainingDataWriter::append(&prefix, &[3.0, 4.0], &[0.3, 0.4], &[1.0, 1.0]).unwrap();

        let inputs = TrainingDataWriter::read(&format!("{prefix}.inputs")).unwrap();
        assert_eq!(inputs, vec![1.0, 2.0, 3.0, 4.0]);
        let targets = TrainingDataWriter::read(&format!("{prefix}.targets")).unwrap();
        assert_eq!(targets, vec![0.1, 0.2, 0.3, 0.4]);

        let _ = fs::remove_file(format!("{prefix}.inputs"));
        let _ = fs::remove_file(format!("{prefix}.targets"));
        let _ = fs::remove_file(format!("{prefix}.mask"));
    }
}
