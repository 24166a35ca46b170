//! Amount verification: did a payout give every expected address its share?

use crate::resolver::StepResolver;
use crate::series::Series;
use std::collections::HashMap;
use stepchain_fetch::PageFetch;

/// Result of checking supplied amounts against an expected address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountCheck {
    /// No expected addresses, so nothing can be satisfied
    NoAddresses,
    /// Every expected address received at least `per_address`
    Sufficient { per_address: i64 },
    /// These addresses received less than `per_address` (address, received)
    Insufficient {
        per_address: i64,
        short: Vec<(String, i64)>,
    },
}

impl AmountCheck {
    /// Check if the payout is acceptable.
    pub fn is_sufficient(&self) -> bool {
        matches!(self, AmountCheck::Sufficient { .. })
    }
}

/// Compare `pairs` of (address, amount) against `expected`, which must each
/// receive `share / expected.len()`.
///
/// Amounts to the same address add up. Pairs naming unlisted addresses are
/// ignored. An address listed twice is one accumulator.
pub fn check_amounts<S: AsRef<str>>(expected: &[String], pairs: &[(S, i64)], share: i64) -> AmountCheck {
    if expected.is_empty() {
        return AmountCheck::NoAddresses;
    }
    let per_address = share / expected.len() as i64;

    let mut received: HashMap<&str, i64> = expected.iter().map(|a| (a.as_str(), 0)).collect();
    for (address, amount) in pairs {
        if let Some(total) = received.get_mut(address.as_ref()) {
            *total = total.saturating_add(*amount);
        }
    }

    let mut short = Vec::new();
    for address in expected {
        let total = received[address.as_str()];
        if total < per_address && !short.iter().any(|(a, _): &(String, i64)| a == address) {
            short.push((address.clone(), total));
        }
    }

    if short.is_empty() {
        AmountCheck::Sufficient { per_address }
    } else {
        AmountCheck::Insufficient { per_address, short }
    }
}

impl<F: PageFetch> StepResolver<F> {
    /// Check that `pairs` pay every address expected at `height` its part of
    /// `share`.
    pub async fn is_sufficient<S: AsRef<str>>(
        &self,
        pairs: &[(S, i64)],
        series: &Series,
        height: u64,
        share: i64,
    ) -> bool {
        let expected = self.addresses(series, height).await;
        let check = check_amounts(&expected, pairs, share);
        if check.is_sufficient() {
            return true;
        }

        let given: Vec<String> = pairs
            .iter()
            .map(|(address, amount)| format!("{}={}", address.as_ref(), amount))
            .collect();
        match &check {
            AmountCheck::NoAddresses => tracing::warn!(
                series = series.name(),
                height,
                share,
                step = series.step(),
                given = ?given,
                "no expected addresses for height"
            ),
            AmountCheck::Insufficient { per_address, short } => tracing::warn!(
                series = series.name(),
                height,
                share,
                step = series.step(),
                per_address,
                expected = ?expected,
                given = ?given,
                short = ?short,
                "payout below required share"
            ),
            AmountCheck::Sufficient { .. } => {}
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, Pages};
    use stepchain_store::Store;

    fn abc() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[test]
    fn one_short_fails() {
        let check = check_amounts(&abc(), &[("A", 100), ("B", 100), ("C", 99)], 300);
        assert_eq!(
            check,
            AmountCheck::Insufficient {
                per_address: 100,
                short: vec![("C".to_string(), 99)]
            }
        );
    }

    #[test]
    fn at_least_share_succeeds() {
        let check = check_amounts(&abc(), &[("A", 100), ("B", 150), ("C", 100)], 300);
        assert_eq!(check, AmountCheck::Sufficient { per_address: 100 });
    }

    #[test]
    fn amounts_accumulate_and_strangers_are_ignored() {
        let pairs = [("A", 60), ("A", 40), ("B", 100), ("C", 100), ("Z", -1000)];
        assert!(check_amounts(&abc(), &pairs, 300).is_sufficient());
    }

    #[test]
    fn overpaying_a_stranger_does_not_cover_a_shortfall() {
        let pairs = [("A", 100), ("B", 100), ("C", 99), ("Z", 10_000)];
        assert_eq!(
            check_amounts(&abc(), &pairs, 300),
            AmountCheck::Insufficient {
                per_address: 100,
                short: vec![("C".to_string(), 99)]
            }
        );
    }

    #[test]
    fn integer_share() {
        // 301 / 3 = 100
        assert!(check_amounts(&abc(), &[("A", 100), ("B", 100), ("C", 100)], 301).is_sufficient());
    }

    #[test]
    fn no_addresses_never_sufficient() {
        assert_eq!(check_amounts::<&str>(&[], &[], 0), AmountCheck::NoAddresses);
    }

    #[test]
    fn repeated_address_reported_once() {
        let expected = vec!["A".to_string(), "A".to_string(), "B".to_string()];
        let check = check_amounts(&expected, &[("B", 10)], 30);
        assert_eq!(
            check,
            AmountCheck::Insufficient {
                per_address: 10,
                short: vec![("A".to_string(), 0)]
            }
        );
    }

    #[tokio::test]
    async fn verifies_against_stored_step() {
        let (resolver, data) = fixture(Pages::default());
        data.write("r/r_0.csv", "Format,pluribusunum\ncoin,A,B,C\n").unwrap();
        let series = Series::new("r.csv", 100).unwrap();

        assert!(resolver.is_sufficient(&[("A", 100), ("B", 150), ("C", 100)], &series, 10, 300).await);
        assert!(!resolver.is_sufficient(&[("A", 100), ("B", 100), ("C", 99)], &series, 10, 300).await);
    }

    #[tokio::test]
    async fn unknown_height_fails() {
        let (resolver, _data) = fixture(Pages::default());
        let series = Series::new("r.csv", 100).unwrap();

        assert!(!resolver.is_sufficient(&[("A", 100)], &series, 10, 100).await);
    }
}
