//! A stepchain node: one series, file-backed stores and a network fetcher.

use crate::config::NodeConfig;
use crate::error::Result;
use serde::Serialize;
use std::sync::Arc;
use stepchain_chain::{ChainConfig, Resolution, Series, StepResolver};
use stepchain_consensus::{MergeConfig, Merger};
use stepchain_fetch::{FetchConfig, LocationFetcher};
use stepchain_store::{FileStore, Store, TextCache};

/// Outcome of `resolve`, as reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveReport {
    Resolved {
        height: u64,
        index: u64,
        text: String,
    },
    Partial {
        height: u64,
        target: u64,
        reached: u64,
        text: String,
    },
    Unbootstrapped {
        height: u64,
        target: u64,
    },
}

impl ResolveReport {
    fn new(height: u64, resolution: Resolution) -> Self {
        match resolution {
            Resolution::Resolved { index, text } => ResolveReport::Resolved { height, index, text },
            Resolution::Partial { target, reached, text } => ResolveReport::Partial {
                height,
                target,
                reached,
                text,
            },
            Resolution::Unbootstrapped { target } => ResolveReport::Unbootstrapped { height, target },
        }
    }
}

/// Expected payout addresses for a height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressReport {
    pub height: u64,
    pub addresses: Vec<String>,
}

/// Whether a payout satisfies a height's address list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub height: u64,
    pub share: i64,
    pub sufficient: bool,
}

/// A node serving one series.
pub struct Node {
    resolver: StepResolver<LocationFetcher>,
    series: Series,
}

impl Node {
    /// Create a node from config.
    pub fn new(config: NodeConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let series = Series::new(config.series.clone(), config.step)?;
        let data: Arc<dyn Store> = Arc::new(FileStore::open(&config.data_dir));
        let seeds: Arc<dyn Store> = Arc::new(FileStore::open(&config.seed_dir));

        let fetcher = LocationFetcher::new(FetchConfig {
            timeout: config.fetch_timeout,
            accept_invalid_certs: config.accept_invalid_certs,
        })?;
        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for peer fetches");
        }

        let merger = Merger::new(
            fetcher,
            MergeConfig {
                protocol_tag: config.protocol_tag.clone(),
                ..MergeConfig::default()
            },
        )
        .with_overrides(seeds.clone());

        let chain = ChainConfig {
            bootstrap_url: config.bootstrap_url.clone(),
            ..ChainConfig::default()
        };
        let resolver =
            StepResolver::new(Arc::new(TextCache::new(data)), merger, chain).with_seeds(seeds);

        tracing::info!(
            series = series.name(),
            step = series.step(),
            data_dir = %config.data_dir.display(),
            seed_dir = %config.seed_dir.display(),
            "node ready"
        );

        Ok(Self { resolver, series })
    }

    /// The served series.
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &StepResolver<LocationFetcher> {
        &self.resolver
    }

    /// Resolve the step record for `height`.
    pub async fn resolve(&self, height: u64) -> ResolveReport {
        ResolveReport::new(height, self.resolver.resolve(&self.series, height).await)
    }

    /// Payout addresses expected at `height`.
    pub async fn addresses(&self, height: u64) -> AddressReport {
        AddressReport {
            height,
            addresses: self.resolver.addresses(&self.series, height).await,
        }
    }

    /// Check `pairs` against the addresses expected at `height`.
    pub async fn verify(&self, height: u64, share: i64, pairs: &[(String, i64)]) -> VerifyReport {
        VerifyReport {
            height,
            share,
            sufficient: self.resolver.is_sufficient(pairs, &self.series, height, share).await,
        }
    }
}
