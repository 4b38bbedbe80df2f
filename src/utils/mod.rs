//! Shared normalization helpers and logging utilities

pub mod logging;

/// Normalize free text for comparison: trimmed, lowercase, inner whitespace
/// collapsed to single spaces.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Compare raw text against an already normalized string without allocating
#[must_use]
pub fn matches_normalized(raw: &str, normalized: &str) -> bool {
    raw.split_whitespace()
        .enumerate()
        .flat_map(|(i, word)| {
            (i > 0)
                .then_some(' ')
                .into_iter()
                .chain(word.chars().flat_map(char::to_lowercase))
        })
        .eq(normalized.chars())
}

/// Normalize a header cell for column lookup. Strips a UTF-8 byte order mark.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    normalize_text(raw.trim_start_matches('\u{feff}'))
}

/// Normalize an ICD-10 cause code for joining: trimmed, uppercase, dots removed.
///
/// `"x95.4"` and `"X954"` normalize to the same key.
#[must_use]
pub fn normalize_cause_code(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Parse a numeric code, tolerating leading zeros and `.0` suffixes
#[must_use]
pub fn parse_code(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(code) = trimmed.parse::<u32>() {
        return Some(code);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

/// Compose a full DIVIPOLA municipality code.
///
/// Values below 1000 are local municipality codes within the department;
/// anything larger is already a full code. `None` when the composed code
/// does not fit in a `u32`.
#[must_use]
pub const fn divipola_code(department: u32, municipality: u32) -> Option<u32> {
    if municipality >= 1000 {
        return Some(municipality);
    }
    match department.checked_mul(1000) {
        Some(base) => base.checked_add(municipality),
        None => None,
    }
}
