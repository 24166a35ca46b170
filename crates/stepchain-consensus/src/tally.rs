//! Snapshot tally: group peer responses by normalized content.

use crate::text::{normalize, text_lines};
use crate::threshold::minimum_identical;
use std::collections::HashMap;

/// Default protocol identifier a snapshot's first line must contain.
pub const DEFAULT_PROTOCOL_TAG: &str = "pluribusunum";

/// A 32-byte Blake3 digest of normalized snapshot content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Digest of already-normalized text.
    pub fn of(normalized: &str) -> Self {
        Self(*blake3::hash(normalized.as_bytes()).as_bytes())
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 hex chars
        write!(f, "{}...", &self.to_hex()[..8])
    }
}

/// Check the format sentinel: the first non-blank line, lower-cased, must
/// start with `format` and contain `protocol_tag`.
pub fn has_format_sentinel(text: &str, protocol_tag: &str) -> bool {
    match text_lines(text).next() {
        Some(first) => {
            let first = first.trim().to_lowercase();
            first.starts_with("format") && first.contains(&protocol_tag.to_lowercase())
        }
        None => false,
    }
}

/// One group of identical snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Digest of the normalized content
    pub digest: ContentDigest,
    /// Normalized content shared by the group
    pub text: String,
    /// Number of snapshots in the group
    pub votes: usize,
}

/// Groups of eligible snapshots, kept in discovery order.
#[derive(Debug, Default)]
pub struct Tally {
    groups: Vec<Group>,
    index: HashMap<ContentDigest, usize>,
}

impl Tally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one snapshot. Returns its group's digest.
    pub fn add(&mut self, snapshot: &str) -> ContentDigest {
        let text = normalize(snapshot);
        let digest = ContentDigest::of(&text);
        match self.index.get(&digest) {
            Some(&slot) => self.groups[slot].votes += 1,
            None => {
                self.index.insert(digest, self.groups.len());
                self.groups.push(Group {
                    digest,
                    text,
                    votes: 1,
                });
            }
        }
        digest
    }

    /// Groups in discovery order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Total snapshots counted.
    pub fn eligible(&self) -> usize {
        self.groups.iter().map(|g| g.votes).sum()
    }

    /// Size of the largest group.
    pub fn largest(&self) -> usize {
        self.groups.iter().map(|g| g.votes).max().unwrap_or(0)
    }

    /// First group (in discovery order) holding at least
    /// `minimum_identical(sampled)` votes.
    pub fn winner(&self, sampled: usize) -> Option<&Group> {
        let minimum = minimum_identical(sampled);
        self.groups
            .iter()
            .find(|g| g.votes > 0 && g.votes >= minimum)
    }
}
