//! Majority agreement threshold.
//!
//! A snapshot group is accepted when it holds at least
//! `ceil(0.500001 × sampled)` of the polled copies:
//! - 0 sampled → no group can exist, so never agreed
//! - n sampled → strictly more than half
//!
//! Ties (2 of 4) and all-distinct samples never agree.

/// Fraction of sampled copies that must be identical. Just above one half.
pub const AGREEMENT_PROPORTION: f64 = 0.500001;

/// Minimum number of identical copies required out of `sampled`.
///
/// # Examples
///
/// ```
/// use stepchain_consensus::minimum_identical;
///
/// assert_eq!(minimum_identical(1), 1);
/// assert_eq!(minimum_identical(4), 3);
/// assert_eq!(minimum_identical(5), 3);
/// ```
pub fn minimum_identical(sampled: usize) -> usize {
    (AGREEMENT_PROPORTION * sampled as f64).ceil() as usize
}

/// Check if `votes` identical copies out of `sampled` reach agreement.
pub fn meets_threshold(votes: usize, sampled: usize) -> bool {
    votes > 0 && votes >= minimum_identical(sampled)
}
