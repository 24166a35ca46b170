//! Step resolver and chain rebuilder.
//!
//! # Resolution
//!
//! 1. The record for the requested step exists → return it (and give the
//!    write-ahead scheduler a chance to prepare the next step)
//! 2. Otherwise walk back one step at a time to the nearest existing record,
//!    the anchor
//! 3. Rebuild forward from the anchor, one merge per hop, persisting every
//!    intermediate record
//!
//! Each hop's peers come from the previous hop's text, so hops are strictly
//! sequential. The rebuild never invents a starting point: with no anchor the
//! series is unbootstrapped.

use crate::config::ChainConfig;
use crate::series::Series;
use std::sync::Arc;
use stepchain_consensus::Merger;
use stepchain_fetch::PageFetch;
use stepchain_store::{Store, TextCache};

/// Outcome of resolving a height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The record of the requested step
    Resolved { index: u64, text: String },
    /// The rebuild broke before the target; `text` is the record of `reached`
    Partial {
        target: u64,
        reached: u64,
        text: String,
    },
    /// No record exists at or below the requested step
    Unbootstrapped { target: u64 },
}

impl Resolution {
    /// Text of the requested step, only when fully resolved.
    pub fn text(&self) -> Option<&str> {
        match self {
            Resolution::Resolved { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Best text available, including a partial rebuild's last step.
    pub fn best_text(&self) -> Option<&str> {
        match self {
            Resolution::Resolved { text, .. } | Resolution::Partial { text, .. } => Some(text),
            Resolution::Unbootstrapped { .. } => None,
        }
    }

    /// Step index the returned text belongs to.
    pub fn reached(&self) -> Option<u64> {
        match self {
            Resolution::Resolved { index, .. } => Some(*index),
            Resolution::Partial { reached, .. } => Some(*reached),
            Resolution::Unbootstrapped { .. } => None,
        }
    }

    /// Check if the requested step was resolved.
    pub fn is_complete(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// Resolves step records for any series, sharing one text cache.
pub struct StepResolver<F> {
    pub(crate) cache: Arc<TextCache>,
    pub(crate) seeds: Option<Arc<dyn Store>>,
    pub(crate) merger: Merger<F>,
    pub(crate) config: ChainConfig,
}

impl<F: PageFetch> StepResolver<F> {
    /// Create a resolver over a data-store cache.
    pub fn new(cache: Arc<TextCache>, merger: Merger<F>, config: ChainConfig) -> Self {
        Self {
            cache,
            seeds: None,
            merger,
            config,
        }
    }

    /// Import missing and pinned records from `seeds`, keyed by un-prefixed
    /// record name (`receiver_0.csv`).
    pub fn with_seeds(mut self, seeds: Arc<dyn Store>) -> Self {
        self.seeds = Some(seeds);
        self
    }

    /// The shared text cache.
    pub fn cache(&self) -> &Arc<TextCache> {
        &self.cache
    }

    /// The merger used for every hop.
    pub fn merger(&self) -> &Merger<F> {
        &self.merger
    }

    /// Resolver configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Resolve the record for the step containing `height`.
    pub async fn resolve(&self, series: &Series, height: u64) -> Resolution {
        let index = series.index_of(height);
        self.apply_pinned(series, index).await;

        if let Some(text) = self.step_text(series, index).await {
            self.maybe_advance(series, height, &text).await;
            return Resolution::Resolved { index, text };
        }

        let mut value_down = height.checked_sub(series.step());
        while let Some(down) = value_down {
            if let Some(anchor) = self.step_text(series, series.index_of(down)).await {
                tracing::info!(
                    series = series.name(),
                    anchor = series.index_of(down),
                    target = index,
                    "rebuilding from anchor"
                );
                return self.rebuild(series, height, anchor, down).await;
            }
            value_down = down.checked_sub(series.step());
        }

        tracing::warn!(
            series = series.name(),
            target = index,
            "no anchor record, series is not bootstrapped"
        );
        Resolution::Unbootstrapped { target: index }
    }

    /// Recompute every step from the anchor at `value_down` up to `height`.
    pub async fn rebuild(
        &self,
        series: &Series,
        height: u64,
        anchor_text: String,
        value_down: u64,
    ) -> Resolution {
        let target = series.index_of(height);
        let mut previous = anchor_text;
        let mut reached = series.index_of(value_down);
        let mut value_up = value_down;

        while value_up < height {
            let next_value = value_up + series.step();
            let next = series.index_of(next_value);

            match self.merger.merge(series.name(), &previous, next).await.into_text() {
                Some(text) => {
                    self.cache.put(&series.record_name(next), &text).await;
                    previous = text;
                    reached = next;
                }
                None => {
                    tracing::warn!(
                        series = series.name(),
                        target,
                        reached,
                        "chain broken, returning last resolved step"
                    );
                    return Resolution::Partial {
                        target,
                        reached,
                        text: previous,
                    };
                }
            }

            value_up = next_value;
        }

        Resolution::Resolved {
            index: reached,
            text: previous,
        }
    }

    /// Existing record for step `index`, importing it if only a seed or the
    /// bootstrap address has it.
    pub async fn step_text(&self, series: &Series, index: u64) -> Option<String> {
        let name = series.record_name(index);
        if let Some(text) = self.cache.get(&name).await.filter(|t| !t.is_empty()) {
            return Some(text);
        }

        if let Some(text) = self.seed_text(series, index) {
            self.cache.put(&name, &text).await;
            return Some(text);
        }

        if index == 0 {
            if let Some(url) = &self.config.bootstrap_url {
                tracing::info!(series = series.name(), url = %url, "downloading base record");
                if let Some(text) = self.merger.fetcher().fetch(url).await {
                    if let Some(seeds) = &self.seeds {
                        if let Err(e) = seeds.write(&series.seed_name(0), &text) {
                            tracing::warn!(error = %e, "could not keep base record in seed store");
                        }
                    }
                    self.cache.put(&name, &text).await;
                    return Some(text);
                }
            }
        }

        None
    }

    fn seed_text(&self, series: &Series, index: u64) -> Option<String> {
        let seeds = self.seeds.as_ref()?;
        let name = series.seed_name(index);
        match seeds.read(&name) {
            Ok(text) => text.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "seed store read failed");
                None
            }
        }
    }

    /// Overwrite a pinned step's local record with the seed copy.
    async fn apply_pinned(&self, series: &Series, index: u64) {
        if !self.config.pinned_indices.contains(&index) {
            return;
        }
        let Some(seed) = self.seed_text(series, index) else {
            return;
        };
        let name = series.record_name(index);
        if self.cache.get(&name).await.as_deref() != Some(seed.as_str()) {
            tracing::info!(series = series.name(), index, "applying pinned correction");
            self.cache.put(&name, &seed).await;
        }
    }
}
