//! Step file naming.
//!
//! A step record is named by inserting `_<index>` just before the extension of
//! the series name: `receiver.csv` at index 7 is `receiver_7.csv`. Peer names
//! are turned into poll locations the same way, unless they carry the
//! [`DO_NOT_SUFFIX`] marker, in which case they are cut at the marker.

/// Marker segment that pins a peer location to a fixed page.
pub const DO_NOT_SUFFIX: &str = "_do_not_add_suffix_";

/// Insert `_<suffix>` before the extension of the final path segment.
///
/// Dots in host names or directories are not extensions:
/// `http://a.example/receiver` becomes `http://a.example/receiver_3`.
pub fn suffixed_name(name: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return name.to_string();
    }
    let segment_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[segment_start..].rfind('.') {
        Some(dot) => {
            let dot = segment_start + dot;
            format!("{}_{}{}", &name[..dot], suffix, &name[dot..])
        }
        None => format!("{}_{}", name, suffix),
    }
}

/// Name of the record for step `index` of `series`.
pub fn step_file_name(series: &str, index: u64) -> String {
    suffixed_name(series, &index.to_string())
}

/// Location to poll a peer for step `index`.
pub fn peer_location(peer: &str, index: u64) -> String {
    match peer.find(DO_NOT_SUFFIX) {
        Some(cut) => peer[..cut].to_string(),
        None => step_file_name(peer, index),
    }
}

/// Series name without its extension, used as the series' storage directory.
pub fn series_stem(series: &str) -> &str {
    let segment_start = series.rfind('/').map_or(0, |i| i + 1);
    match series[segment_start..].rfind('.') {
        Some(dot) => &series[..segment_start + dot],
        None => series,
    }
}
