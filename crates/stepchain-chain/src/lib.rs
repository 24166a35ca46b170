//! Step Resolution and Chain Rebuild
//!
//! Turns a height into the agreed step record for that height's bucket, and
//! derives payout expectations from it.
//!
//! # Flow
//!
//! ```text
//! resolve(height)
//!   ├─ record for height / step exists ──► Resolved (+ maybe write ahead)
//!   ├─ nearest earlier record (anchor) ──► rebuild hop by hop ──► Resolved | Partial
//!   └─ nothing below ───────────────────► Unbootstrapped
//! ```
//!
//! Downstream, [`StepResolver::addresses`] picks this height's address list
//! from the resolved record and [`StepResolver::is_sufficient`] checks a
//! payout against it.
//!
//! # Storage names
//!
//! All state of a series lives under its stem in the data store:
//!
//! | Name | Content |
//! |------|---------|
//! | `receiver/receiver_<i>.csv` | step record `i` |
//! | `receiver/random_number.txt` | this node's write-ahead seed |
//! | `receiver/write_next_when.txt` | write-ahead back-off marker |

mod addresses;
mod config;
mod error;
mod parse;
mod resolver;
mod scheduler;
mod series;
mod verifier;

#[cfg(test)]
mod testing;

pub use addresses::select_addresses;
pub use config::{ChainConfig, LESS_THAN_ONE, WRITE_NEXT_THRESHOLD};
pub use error::{Error, Result};
pub use resolver::{Resolution, StepResolver};
pub use scheduler::{random_seed, retry_marker, write_ahead_cutoff, Advance};
pub use series::{Series, DEFAULT_STEP, MARKER_FILE, SEED_FILE};
pub use verifier::{check_amounts, AmountCheck};
