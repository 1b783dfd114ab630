// Text normalization: encoding repair, then markup stripping, then
// whitespace cleanup.

use unicode_normalization::UnicodeNormalization;

use crate::encoding::{repair_with, SingleByteEncoding, DEFAULT_CANDIDATES};
use crate::markup::strip;

/// A normalized field plus what it took to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanText {
    pub text: String,
    pub encoding_repaired: bool,
    pub markup_stripped: bool,
}

/// Normalize free text to clean, single-spaced plain text.
///
/// Empty or all-whitespace input yields an empty string.
pub fn normalize(text: &str) -> String {
    normalize_with(text, &DEFAULT_CANDIDATES).text
}

/// Normalize with an explicit mojibake candidate list, reporting which
/// repairs applied.
///
/// Entity-escaped mojibake (`Descripci&Atilde;&sup3;n`) only becomes visible
/// after markup decoding, so repair runs a second time on stripped text.
pub fn normalize_with(text: &str, candidates: &[SingleByteEncoding]) -> CleanText {
    let repaired = repair_with(text, candidates);
    let stripped = strip(&repaired);
    let markup_stripped = stripped != repaired;

    let second_pass = if markup_stripped {
        Some(repair_with(&stripped, candidates)).filter(|s| *s != stripped)
    } else {
        None
    };
    let encoding_repaired = repaired != text || second_pass.is_some();
    let decoded = second_pass.unwrap_or(stripped);

    CleanText {
        text: collapse_whitespace(&decoded).nfc().collect(),
        encoding_repaired,
        markup_stripped,
    }
}

/// Collapse every whitespace run (including no-break spaces) to one ASCII
/// space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
