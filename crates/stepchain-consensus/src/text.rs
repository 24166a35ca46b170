//! Line-level text primitives shared by the scanner and the tally.

/// Split text into non-blank lines. `\r` counts as a line break.
pub fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|line| !line.trim().is_empty())
}

/// Whitespace-normalized form of a snapshot.
///
/// Every line is trimmed, blank lines are dropped and each kept line is
/// terminated by `\n`. Two snapshots differing only in blank lines or
/// line-edge whitespace normalize identically.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for line in text_lines(text) {
        normalized.push_str(line.trim());
        normalized.push('\n');
    }
    normalized
}

/// Split a line at its first comma into `(head, rest)`.
pub fn comma_divided(line: &str) -> (&str, Option<&str>) {
    match line.split_once(',') {
        Some((head, rest)) => (head, Some(rest)),
        None => (line, None),
    }
}

/// Remove every whitespace character.
pub fn spaceless(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Marker key of a line: the text before the first comma, lower-cased with
/// all whitespace removed.
pub fn marker_key(line: &str) -> String {
    spaceless(comma_divided(line).0).to_lowercase()
}
