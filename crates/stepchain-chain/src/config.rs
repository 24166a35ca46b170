//! Tunables for resolution and write-ahead scheduling.

/// Fraction of a bucket that must pass before any node writes ahead.
pub const WRITE_NEXT_THRESHOLD: f64 = 0.75;

/// Scale of the per-node bias, and the "near the boundary" fraction.
pub const LESS_THAN_ONE: f64 = 0.95;

/// Configuration for a [`StepResolver`](crate::StepResolver).
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Earliest bucket fraction at which write-ahead may start
    pub write_threshold: f64,
    /// Bias scale; also the bucket fraction past which retries come sooner
    pub less_than_one: f64,
    /// Back-off, in heights, after a failed write-ahead
    pub retry_after: u64,
    /// Back-off once the remainder is past `less_than_one` of the bucket
    pub retry_after_near_boundary: u64,
    /// Step indices whose seed-directory record overwrites the local copy
    pub pinned_indices: Vec<u64>,
    /// Where to download the index-0 record when nobody has it
    pub bootstrap_url: Option<String>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            write_threshold: WRITE_NEXT_THRESHOLD,
            less_than_one: LESS_THAN_ONE,
            retry_after: 10,
            retry_after_near_boundary: 3,
            pinned_indices: vec![1, 2],
            bootstrap_url: None,
        }
    }
}
