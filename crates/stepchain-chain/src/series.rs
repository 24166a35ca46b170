//! A named chain of step records and the storage names derived from it.

use crate::error::{Error, Result};
use stepchain_consensus::{series_stem, step_file_name};

/// Default bucket width.
pub const DEFAULT_STEP: u64 = 4000;

/// File holding the node's write-ahead seed, inside the series directory.
pub const SEED_FILE: &str = "random_number.txt";

/// File holding the write-ahead back-off marker, inside the series directory.
pub const MARKER_FILE: &str = "write_next_when.txt";

/// A record series such as `receiver.csv`, bucketed by `step` heights.
///
/// Records live in a directory named after the series stem:
/// `receiver.csv` index 7 is stored as `receiver/receiver_7.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    name: String,
    step: u64,
}

impl Series {
    /// Describe a series. `name` must be a plain file name.
    pub fn new(name: impl Into<String>, step: u64) -> Result<Self> {
        let name = name.into();
        if step == 0 {
            return Err(Error::ZeroStep);
        }
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && !series_stem(&name).is_empty()
            && name != "."
            && name != "..";
        if !plain {
            return Err(Error::InvalidSeries(name));
        }
        Ok(Self { name, step })
    }

    /// Series file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bucket width.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Storage directory of the series.
    pub fn stem(&self) -> &str {
        series_stem(&self.name)
    }

    /// Step index of `height`.
    pub fn index_of(&self, height: u64) -> u64 {
        height / self.step
    }

    /// Position of `height` inside its bucket.
    pub fn remainder(&self, height: u64) -> u64 {
        height % self.step
    }

    /// Un-prefixed record name, as found in a seed directory or on a peer.
    pub fn seed_name(&self, index: u64) -> String {
        step_file_name(&self.name, index)
    }

    /// Data-store name of the record for step `index`.
    pub fn record_name(&self, index: u64) -> String {
        format!("{}/{}", self.stem(), self.seed_name(index))
    }

    /// Data-store name of the write-ahead seed.
    pub fn seed_file(&self) -> String {
        format!("{}/{}", self.stem(), SEED_FILE)
    }

    /// Data-store name of the write-ahead marker.
    pub fn marker_file(&self) -> String {
        format!("{}/{}", self.stem(), MARKER_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_names() {
        let series = Series::new("receiver.csv", 100).unwrap();
        assert_eq!(series.record_name(7), "receiver/receiver_7.csv");
        assert_eq!(series.seed_name(7), "receiver_7.csv");
        assert_eq!(series.seed_file(), "receiver/random_number.txt");
        assert_eq!(series.marker_file(), "receiver/write_next_when.txt");
    }

    #[test]
    fn bucket_arithmetic() {
        let series = Series::new("receiver.csv", 100).unwrap();
        assert_eq!(series.index_of(250), 2);
        assert_eq!(series.remainder(250), 50);
        assert_eq!(series.index_of(99), 0);
        assert_eq!(series.remainder(300), 0);
    }

    #[test]
    fn rejects_bad_series() {
        assert!(matches!(Series::new("receiver.csv", 0), Err(Error::ZeroStep)));
        assert!(matches!(Series::new("", 10), Err(Error::InvalidSeries(_))));
        assert!(matches!(Series::new("a/receiver.csv", 10), Err(Error::InvalidSeries(_))));
        assert!(matches!(Series::new(".csv", 10), Err(Error::InvalidSeries(_))));
    }
}
