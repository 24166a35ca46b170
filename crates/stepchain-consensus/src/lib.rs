//! Majority-Sampling Step Consensus
//!
//! A step record is never taken from a single peer. The previous step's text
//! lists the peers to ask; every peer is polled for its copy of the next step
//! and the copy a strict majority of the sample agrees on is accepted.
//!
//! # Core Insight
//!
//! A resolved step carries both payload and routing: its peer list decides who
//! is asked for the following step, so the peer set evolves along the chain.
//!
//! # Agreement
//!
//! - Snapshots are grouped by whitespace-normalized content
//! - Only snapshots whose first line is a `format` line naming the protocol
//!   tag are counted
//! - Every polled peer counts toward the sample, answered or not
//! - A group wins with at least ceil(0.500001 × sampled) members
//!
//! This is best-effort agreement, not Byzantine fault tolerance: there are no
//! identities or signatures, only a supermajority of polled copies.

mod merger;
mod naming;
mod scan;
mod tally;
mod text;
mod threshold;

pub use merger::{MergeConfig, MergeOutcome, Merger};
pub use naming::{peer_location, series_stem, step_file_name, suffixed_name, DO_NOT_SUFFIX};
pub use scan::{carry_forward, coin_lists, peer_names, REPEAT_TOKEN};
pub use tally::{has_format_sentinel, ContentDigest, Group, Tally, DEFAULT_PROTOCOL_TAG};
pub use text::{normalize, text_lines};
pub use threshold::{meets_threshold, minimum_identical, AGREEMENT_PROPORTION};
