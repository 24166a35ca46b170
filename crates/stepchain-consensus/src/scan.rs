//! Marker scanner for step text.
//!
//! Step text embeds routing and payout data as marker lines:
//!
//! ```text
//! Format,pluribusunum
//! peer,http://a.example/receiver.csv
//! _beginpeers
//! http://b.example/receiver.csv
//! _endpeers
//! coin,addrA,=,addrB
//! _begincoins
//! addrC,addrD
//! _endcoins
//! ```
//!
//! One pass, one "inside block" flag per section. Marker keywords are
//! case-insensitive and matched with whitespace removed.

use crate::text::{comma_divided, marker_key, spaceless, text_lines};

/// Token meaning "repeat the previous address".
pub const REPEAT_TOKEN: &str = "=";

/// Keywords delimiting one kind of section.
struct Section {
    inline: &'static str,
    begins: &'static [&'static str],
    ends: &'static [&'static str],
}

const PEERS: Section = Section {
    inline: "peer",
    begins: &["_beginpeers"],
    ends: &["_endpeers"],
};

const COINS: Section = Section {
    inline: "coin",
    begins: &["_begincoins", "_beginaddresses"],
    ends: &["_endcoins", "_endaddresses"],
};

/// One entry found by the scanner.
enum Entry<'a> {
    /// Text after the comma of an inline `keyword,<rest>` line
    Inline(&'a str),
    /// A whole line enclosed by begin/end markers
    Enclosed(&'a str),
}

fn scan<'a>(text: &'a str, section: &Section) -> Vec<Entry<'a>> {
    let mut entries = Vec::new();
    let mut inside = false;

    for line in text_lines(text) {
        let key = marker_key(line);
        if section.ends.contains(&key.as_str()) {
            inside = false;
        } else if section.begins.contains(&key.as_str()) {
            inside = true;
        } else if key == section.inline {
            if let Some(rest) = comma_divided(line).1 {
                entries.push(Entry::Inline(rest));
            }
        } else if inside {
            entries.push(Entry::Enclosed(line));
        }
    }

    entries
}

/// Peer names listed in `text`, in order of appearance.
///
/// Inline entries keep everything after the comma; enclosed lines keep the
/// text before their first comma. Whitespace is removed and empty names are
/// skipped.
pub fn peer_names(text: &str) -> Vec<String> {
    scan(text, &PEERS)
        .into_iter()
        .map(|entry| match entry {
            Entry::Inline(rest) => spaceless(rest),
            Entry::Enclosed(line) => spaceless(comma_divided(line).0),
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Candidate coin address lists in `text`, in order of appearance.
///
/// Each inline `coin,...` line and each enclosed line is one list.
pub fn coin_lists(text: &str) -> Vec<Vec<String>> {
    scan(text, &COINS)
        .into_iter()
        .map(|entry| match entry {
            Entry::Inline(csv) | Entry::Enclosed(csv) => csv_tokens(csv),
        })
        .filter(|list| !list.is_empty())
        .collect()
}

fn csv_tokens(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand [`REPEAT_TOKEN`] shorthand: each `=` becomes the closest preceding
/// real token. A leading `=` has nothing to repeat and is dropped.
pub fn carry_forward<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut expanded = Vec::with_capacity(tokens.len());
    let mut previous: Option<&str> = None;

    for token in tokens {
        let token = token.as_ref();
        if token != REPEAT_TOKEN {
            previous = Some(token);
        }
        match previous {
            Some(address) => expanded.push(address.to_string()),
            None => tracing::warn!("address list starts with '=', nothing to repeat"),
        }
    }

    expanded
}
