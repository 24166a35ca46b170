//! Node configuration from `STEPCHAIN_*` environment variables.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use stepchain_chain::DEFAULT_STEP;
use stepchain_consensus::DEFAULT_PROTOCOL_TAG;
use stepchain_fetch::DEFAULT_TIMEOUT;

/// Configuration for a [`Node`](crate::Node).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Data directory holding resolved records, seed and marker
    pub data_dir: PathBuf,
    /// Directory of shipped records (`receiver_0.csv`, ...)
    pub seed_dir: PathBuf,
    /// Series file name
    pub series: String,
    /// Bucket width
    pub step: u64,
    /// Per-location fetch budget
    pub fetch_timeout: Duration,
    /// Identifier required on the first line of every counted snapshot
    pub protocol_tag: String,
    /// Where to download the index-0 record when nobody has it
    pub bootstrap_url: Option<String>,
    /// Accept invalid TLS certificates from peers
    pub accept_invalid_certs: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./stepchain-data"),
            seed_dir: PathBuf::from("."),
            series: "receiver.csv".to_string(),
            step: DEFAULT_STEP,
            fetch_timeout: DEFAULT_TIMEOUT,
            protocol_tag: DEFAULT_PROTOCOL_TAG.to_string(),
            bootstrap_url: None,
            accept_invalid_certs: false,
        }
    }
}

impl NodeConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any variable source.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("STEPCHAIN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let seed_dir = lookup("STEPCHAIN_SEED_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.seed_dir);

        let series = lookup("STEPCHAIN_SERIES").unwrap_or(defaults.series);

        let step = parsed(&lookup, "STEPCHAIN_STEP")?.unwrap_or(defaults.step);
        if step == 0 {
            return Err(Error::Config("STEPCHAIN_STEP must be positive".to_string()));
        }

        let fetch_timeout = parsed(&lookup, "STEPCHAIN_FETCH_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let protocol_tag = lookup("STEPCHAIN_PROTOCOL_TAG")
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .unwrap_or(defaults.protocol_tag);

        let bootstrap_url = lookup("STEPCHAIN_BOOTSTRAP_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let accept_invalid_certs =
            parsed(&lookup, "STEPCHAIN_ACCEPT_INVALID_CERTS")?.unwrap_or(defaults.accept_invalid_certs);

        Ok(Self {
            data_dir,
            seed_dir,
            series,
            step,
            fetch_timeout,
            protocol_tag,
            bootstrap_url,
            accept_invalid_certs,
        })
    }
}

fn parsed<T, L>(lookup: &L, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid {}={:?}: {}", key, raw, e))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = NodeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, NodeConfig::default());
        assert_eq!(config.step, 4000);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_overrides() {
        let config = NodeConfig::from_lookup(lookup(&[
            ("STEPCHAIN_DATA_DIR", "/var/lib/stepchain"),
            ("STEPCHAIN_SERIES", "payout.csv"),
            ("STEPCHAIN_STEP", " 100 "),
            ("STEPCHAIN_FETCH_TIMEOUT_SECS", "3"),
            ("STEPCHAIN_PROTOCOL_TAG", "DevNet"),
            ("STEPCHAIN_BOOTSTRAP_URL", "https://seed.example/payout_0.csv"),
            ("STEPCHAIN_ACCEPT_INVALID_CERTS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/stepchain"));
        assert_eq!(config.series, "payout.csv");
        assert_eq!(config.step, 100);
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.protocol_tag, "devnet");
        assert_eq!(config.bootstrap_url.as_deref(), Some("https://seed.example/payout_0.csv"));
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            NodeConfig::from_lookup(lookup(&[("STEPCHAIN_STEP", "many")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            NodeConfig::from_lookup(lookup(&[("STEPCHAIN_STEP", "0")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            NodeConfig::from_lookup(lookup(&[("STEPCHAIN_ACCEPT_INVALID_CERTS", "yes")])),
            Err(Error::Config(_))
        ));
    }
}
