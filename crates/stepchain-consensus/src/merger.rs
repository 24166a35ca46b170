//! Majority merger: ask every listed peer for the next step and accept the
//! content a strict majority of the sample agrees on.
//!
//! # Sample
//!
//! All peers of one merge are fetched concurrently and tallied as a single
//! sample. A peer that fails, times out or answers without the format
//! sentinel still counts toward the sample size, so silence is a vote
//! against agreement.

use crate::naming::{peer_location, step_file_name};
use crate::scan::peer_names;
use crate::tally::{has_format_sentinel, ContentDigest, Tally, DEFAULT_PROTOCOL_TAG};
use futures::future::join_all;
use std::sync::Arc;
use stepchain_fetch::PageFetch;
use stepchain_store::Store;

/// Configuration for [`Merger`].
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Identifier the first line of every counted snapshot must contain
    pub protocol_tag: String,
    /// Step indices whose record may be supplied by the override store
    pub bootstrap_indices: [u64; 2],
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            protocol_tag: DEFAULT_PROTOCOL_TAG.to_string(),
            bootstrap_indices: [0, 1],
        }
    }
}

/// Result of one merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A locally supplied bootstrap record was used; no peers were polled
    Override { text: String },
    /// A strict majority of the sample agreed
    Agreed {
        text: String,
        digest: ContentDigest,
        votes: usize,
        sampled: usize,
    },
    /// No group reached the threshold
    NoConsensus {
        sampled: usize,
        eligible: usize,
        largest: usize,
    },
}

impl MergeOutcome {
    /// The accepted text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            MergeOutcome::Override { text } | MergeOutcome::Agreed { text, .. } => Some(text),
            MergeOutcome::NoConsensus { .. } => None,
        }
    }

    /// Consume the outcome, keeping the accepted text.
    pub fn into_text(self) -> Option<String> {
        match self {
            MergeOutcome::Override { text } | MergeOutcome::Agreed { text, .. } => Some(text),
            MergeOutcome::NoConsensus { .. } => None,
        }
    }
}

/// Polls peers and applies majority agreement.
pub struct Merger<F> {
    fetcher: F,
    overrides: Option<Arc<dyn Store>>,
    config: MergeConfig,
}

impl<F: PageFetch> Merger<F> {
    /// Create a merger without an override store.
    pub fn new(fetcher: F, config: MergeConfig) -> Self {
        Self {
            fetcher,
            overrides: None,
            config,
        }
    }

    /// Let `store` supply the records of the bootstrap indices.
    pub fn with_overrides(mut self, store: Arc<dyn Store>) -> Self {
        self.overrides = Some(store);
        self
    }

    /// The page fetcher used for sampling.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Merger configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Resolve step `index` of `series` from the peers listed in `peer_text`.
    pub async fn merge(&self, series: &str, peer_text: &str, index: u64) -> MergeOutcome {
        if let Some(text) = self.override_text(series, index) {
            tracing::info!(series, index, "using local bootstrap record");
            return MergeOutcome::Override { text };
        }

        let locations: Vec<String> = peer_names(peer_text)
            .iter()
            .map(|peer| peer_location(peer, index))
            .collect();
        let pages = self.sample(&locations).await;
        let sampled = locations.len();

        let mut tally = Tally::new();
        for (location, page) in locations.iter().zip(&pages) {
            match page {
                Some(text) if has_format_sentinel(text, &self.config.protocol_tag) => {
                    tally.add(text);
                }
                Some(_) => tracing::debug!(location = %location, "page lacks format sentinel"),
                None => tracing::debug!(location = %location, "no page"),
            }
        }

        tracing::info!(series, index, sampled, eligible = tally.eligible(), "sampled peers");

        match tally.winner(sampled) {
            Some(group) => {
                tracing::info!(
                    series,
                    index,
                    votes = group.votes,
                    digest = %group.digest,
                    "peers agree"
                );
                MergeOutcome::Agreed {
                    text: group.text.clone(),
                    digest: group.digest,
                    votes: group.votes,
                    sampled,
                }
            }
            None => {
                tracing::warn!(
                    series,
                    index,
                    sampled,
                    largest = tally.largest(),
                    "insufficient identical pages"
                );
                MergeOutcome::NoConsensus {
                    sampled,
                    eligible: tally.eligible(),
                    largest: tally.largest(),
                }
            }
        }
    }

    /// Fetch every location concurrently. Results line up with `locations`.
    pub async fn sample(&self, locations: &[String]) -> Vec<Option<String>> {
        join_all(locations.iter().map(|location| self.fetcher.fetch(location))).await
    }

    fn override_text(&self, series: &str, index: u64) -> Option<String> {
        if !self.config.bootstrap_indices.contains(&index) {
            return None;
        }
        let store = self.overrides.as_ref()?;
        let name = step_file_name(series, index);
        match store.read(&name) {
            Ok(text) => text.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "override store read failed");
                None
            }
        }
    }
}
