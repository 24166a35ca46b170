//! Stepchain Node
//!
//! Wires the engine to the local machine: a [`FileStore`](stepchain_store::FileStore)
//! data directory, a seed directory of shipped records (also consulted for
//! bootstrap overrides and pinned corrections) and a network
//! [`LocationFetcher`](stepchain_fetch::LocationFetcher).
//!
//! The `stepchain` binary exposes three commands: `resolve`, `addresses` and
//! `verify`. Reports are printed as JSON.

pub mod command;
pub mod config;
pub mod error;
pub mod node;

pub use command::{print_usage, run, Command, Report};
pub use config::NodeConfig;
pub use error::{Error, Result};
pub use node::{AddressReport, Node, ResolveReport, VerifyReport};
