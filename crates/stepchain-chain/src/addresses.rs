//! Address-list selection: which payout addresses a height must pay.
//!
//! A step record may carry several candidate lists. Heights inside the step
//! rotate through them by in-bucket remainder.

use crate::resolver::{Resolution, StepResolver};
use crate::series::Series;
use stepchain_consensus::{carry_forward, coin_lists};
use stepchain_fetch::PageFetch;

/// Addresses selected from step `text` for `height`.
///
/// List `(height % step) % lists` is chosen and its `=` tokens expanded.
/// Returns an empty list when the text carries no candidate lists.
pub fn select_addresses(text: &str, height: u64, step: u64) -> Vec<String> {
    let lists = coin_lists(text);
    if lists.is_empty() || step == 0 {
        return Vec::new();
    }
    let choice = ((height % step) % lists.len() as u64) as usize;
    carry_forward(&lists[choice])
}

impl<F: PageFetch> StepResolver<F> {
    /// Expected payout addresses for `height`.
    ///
    /// Only a fully resolved step is trusted; a partial rebuild yields nothing.
    pub async fn addresses(&self, series: &Series, height: u64) -> Vec<String> {
        let text = match self.resolve(series, height).await {
            Resolution::Resolved { text, .. } => text,
            Resolution::Partial { target, reached, .. } => {
                tracing::warn!(
                    series = series.name(),
                    height,
                    target,
                    reached,
                    "step not resolved, no addresses"
                );
                return Vec::new();
            }
            Resolution::Unbootstrapped { target } => {
                tracing::warn!(series = series.name(), height, target, "series not bootstrapped, no addresses");
                return Vec::new();
            }
        };

        let addresses = select_addresses(&text, height, series.step());
        if addresses.is_empty() {
            tracing::warn!(series = series.name(), height, "step lists no coin addresses");
        }
        addresses
    }
}
