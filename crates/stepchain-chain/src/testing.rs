//! Shared fixtures for resolver tests.

use crate::{ChainConfig, StepResolver};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stepchain_consensus::{MergeConfig, Merger};
use stepchain_fetch::PageFetch;
use stepchain_store::{MemoryStore, TextCache};

/// Serves canned pages and records every location asked for.
#[derive(Default)]
pub struct Pages {
    pages: HashMap<String, String>,
    asked: Mutex<Vec<String>>,
    fetches: AtomicUsize,
}

impl Pages {
    pub fn with(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Locations asked for, sorted.
    pub fn asked(&self) -> Vec<String> {
        let mut asked = self.asked.lock().unwrap().clone();
        asked.sort();
        asked
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PageFetch for Pages {
    async fn fetch(&self, location: &str) -> Option<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.asked.lock().unwrap().push(location.to_string());
        self.pages.get(location).cloned()
    }
}

/// A normalized step page tagged `tag` listing `peers`.
pub fn peers_page(tag: &str, peers: &[&str]) -> String {
    let mut text = format!("Format,pluribusunum\n{}\n_beginpeers\n", tag);
    for peer in peers {
        text.push_str(peer);
        text.push('\n');
    }
    text.push_str("_endpeers\n");
    text
}

/// Resolver over an in-memory data store, returned alongside the store.
pub fn fixture(pages: Pages) -> (StepResolver<Pages>, Arc<MemoryStore>) {
    let data = Arc::new(MemoryStore::new());
    let cache = Arc::new(TextCache::new(data.clone()));
    let merger = Merger::new(pages, MergeConfig::default());
    (
        StepResolver::new(cache, merger, ChainConfig::default()),
        data,
    )
}
