//! Suffix composition.

/// Delimiter placed between a custom property name and the hash when none is configured.
pub const DEFAULT_DELIMITER: &str = "-";

/// Build the suffix appended to every renamed identifier: `delimiter + hash`.
///
/// Returns `None` when `hash` is missing or empty, which disables renaming altogether. An empty
/// delimiter falls back to [`DEFAULT_DELIMITER`]. With `max_length` set, the suffix is cut to
/// `max_length + 1` characters so that the hash part keeps at most `max_length` characters; a
/// `max_length` of zero counts as unset.
pub fn compose_suffix(
    delimiter: Option<&str>,
    hash: Option<&str>,
    max_length: Option<usize>,
) -> Option<String> {
    let hash = hash.filter(|text| !text.is_empty())?;
    let delimiter = delimiter
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_DELIMITER);
    let suffix = [delimiter, hash].concat();
    match max_length.filter(|&limit| limit > 0) {
        Some(limit) => Some(suffix.chars().take(limit.saturating_add(1)).collect()),
        None => Some(suffix),
    }
}
