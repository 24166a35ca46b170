//! Lenient parsing of small numeric records.

use std::str::FromStr;

/// Parse a stored number, treating unreadable text as zero.
pub(crate) fn parse_or_zero<T>(name: &str, text: &str) -> T
where
    T: FromStr + Default,
{
    match text.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(name, text, "unreadable number, using zero");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_or_zero() {
        assert_eq!(parse_or_zero::<u64>("m", " 97\n"), 97);
        assert_eq!(parse_or_zero::<u64>("m", "-3"), 0);
        assert_eq!(parse_or_zero::<f64>("s", "0.25"), 0.25);
        assert_eq!(parse_or_zero::<f64>("s", ""), 0.0);
    }
}
