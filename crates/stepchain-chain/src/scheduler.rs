//! Write-ahead scheduling: resolve the next step before anyone asks for it.
//!
//! Every node keeps a fixed random seed `r ∈ (0,1)`. Write-ahead only starts
//! once the in-bucket remainder reaches
//!
//! ```text
//! cutoff = step × (0.75 + r × 0.95 × (1 − 0.75))
//! ```
//!
//! so nodes reach their cutoff at different heights and the "who asks peers
//! first" burst is spread over the last quarter of the bucket. A failed
//! attempt writes a marker remainder; no retry happens below it.

use crate::config::ChainConfig;
use crate::parse::parse_or_zero;
use crate::resolver::StepResolver;
use crate::series::Series;
use rand::Rng;
use stepchain_fetch::PageFetch;

/// What a write-ahead attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The remainder has not reached this node's cutoff
    TooEarly { remainder: u64, cutoff: u64 },
    /// A previous failure asked to wait until `until`
    BackedOff { remainder: u64, until: u64 },
    /// The next record is already stored
    AlreadyPresent { index: u64 },
    /// The next record was resolved and stored
    Written { index: u64 },
    /// Peers did not agree yet; retry from `until`
    Deferred { index: u64, until: u64 },
}

/// Remainder at which a node with `seed` starts writing ahead.
pub fn write_ahead_cutoff(step: u64, seed: f64, config: &ChainConfig) -> u64 {
    let bias = seed * config.less_than_one * (1.0 - config.write_threshold);
    (step as f64 * (config.write_threshold + bias)) as u64
}

/// Marker value written after a failed attempt at `remainder`.
pub fn retry_marker(remainder: u64, step: u64, config: &ChainConfig) -> u64 {
    let near_boundary = (config.less_than_one * step as f64) as u64;
    if remainder > near_boundary {
        remainder + config.retry_after_near_boundary
    } else {
        remainder + config.retry_after
    }
}

/// Fresh seed: one of 10 000 evenly spaced values strictly inside (0,1).
pub fn random_seed() -> f64 {
    let slot = rand::thread_rng().gen_range(0..10_000u32);
    (slot as f64 + 0.5) / 10_000.0
}

impl<F: PageFetch> StepResolver<F> {
    /// This node's write-ahead seed for `series`, created on first use.
    pub async fn node_seed(&self, series: &Series) -> f64 {
        let name = series.seed_file();
        if let Some(text) = self.cache.get(&name).await {
            return parse_or_zero(&name, &text);
        }
        let seed = random_seed();
        self.cache.put(&name, &seed.to_string()).await;
        tracing::info!(series = series.name(), seed, "created write-ahead seed");
        seed
    }

    /// Possibly resolve and store the step after the one containing `height`.
    pub async fn maybe_advance(&self, series: &Series, height: u64, current_text: &str) -> Advance {
        let step = series.step();
        let remainder = series.remainder(height);
        let seed = self.node_seed(series).await;
        let cutoff = write_ahead_cutoff(step, seed, &self.config);

        if remainder < cutoff {
            return Advance::TooEarly { remainder, cutoff };
        }

        let marker = series.marker_file();
        if let Some(text) = self.cache.get(&marker).await {
            let until: u64 = parse_or_zero(&marker, &text);
            if remainder < until {
                return Advance::BackedOff { remainder, until };
            }
            self.cache.remove(&marker).await;
        }

        let next = series.index_of(height) + 1;
        let next_name = series.record_name(next);
        if self.cache.contains(&next_name).await {
            return Advance::AlreadyPresent { index: next };
        }

        match self.merger.merge(series.name(), current_text, next).await.into_text() {
            Some(text) => {
                self.cache.put(&next_name, &text).await;
                tracing::info!(series = series.name(), index = next, "wrote next step ahead");
                Advance::Written { index: next }
            }
            None => {
                let until = retry_marker(remainder, step, &self.config);
                self.cache.put(&marker, &until.to_string()).await;
                tracing::info!(series = series.name(), index = next, until, "write-ahead deferred");
                Advance::Deferred { index: next, until }
            }
        }
    }
}
