// Mojibake repair.
//
// Feed text is sometimes UTF-8 that was decoded as a single-byte Western
// encoding and re-encoded, so "í" shows up as "Ã­". Reversing that is a
// round trip: map every char back to the byte the single-byte decoder
// produced it from, then decode those bytes as UTF-8. Detection is
// heuristic, so a round trip that fails is "not mojibake", never an error.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Single-byte encodings a mojibake round trip can go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleByteEncoding {
    /// Windows code page 1252 (what most "Latin-1" text really is).
    Windows1252,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

/// Code points for bytes 0x80..=0x9F in Windows-1252. The five slots the
/// code page leaves undefined map to the C1 control of the same value,
/// which is how browsers decode them.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{8D}', '\u{017D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{9D}', '\u{017E}', '\u{0178}',
];

impl SingleByteEncoding {
    /// The byte this encoding decodes to `c`, if any.
    fn encode_char(self, c: char) -> Option<u8> {
        let cp = u32::from(c);
        match self {
            SingleByteEncoding::Latin1 => u8::try_from(cp).ok(),
            SingleByteEncoding::Windows1252 => {
                if cp < 0x80 || (0xA0..=0xFF).contains(&cp) {
                    u8::try_from(cp).ok()
                } else {
                    CP1252_HIGH
                        .iter()
                        .position(|&h| h == c)
                        .and_then(|i| u8::try_from(0x80 + i).ok())
                }
            }
        }
    }

    /// Encode `text` back into this encoding's bytes. `None` if any char
    /// has no byte in this encoding.
    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        text.chars().map(|c| self.encode_char(c)).collect()
    }
}

/// Default candidate order.
pub const DEFAULT_CANDIDATES: [SingleByteEncoding; 2] =
    [SingleByteEncoding::Windows1252, SingleByteEncoding::Latin1];

/// Repair double-encoded UTF-8 using the default candidate encodings.
///
/// ```
/// assert_eq!(catalog_clean::encoding::repair("T\u{c3}\u{ad}tulo"), "Título");
/// assert_eq!(catalog_clean::encoding::repair("Título"), "Título");
/// ```
pub fn repair(text: &str) -> String {
    repair_with(text, &DEFAULT_CANDIDATES)
}

/// Repair double-encoded UTF-8, trying `candidates` in priority order.
///
/// Text that was encoded more than once is unwound layer by layer until no
/// candidate changes it, which makes the result a fixed point:
/// `repair_with(repair_with(x)) == repair_with(x)`.
pub fn repair_with(text: &str, candidates: &[SingleByteEncoding]) -> String {
    let mut current = Cow::Borrowed(text);
    // Every accepted round trip strictly shrinks the UTF-8 length, so this
    // loop terminates.
    while let Some(fixed) = round_trip(&current, candidates) {
        current = Cow::Owned(fixed);
    }
    current.into_owned()
}

/// First candidate whose round trip succeeds and changes the text.
fn round_trip(text: &str, candidates: &[SingleByteEncoding]) -> Option<String> {
    if text.is_ascii() {
        return None;
    }
    candidates.iter().find_map(|encoding| {
        let bytes = encoding.encode(text)?;
        let decoded = String::from_utf8(bytes).ok()?;
        let plausible = decoded != text
            && !decoded.contains(char::REPLACEMENT_CHARACTER)
            && !decoded.chars().any(is_c1_control);
        plausible.then_some(decoded)
    })
}

fn is_c1_control(c: char) -> bool {
    ('\u{80}'..='\u{9F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_accented_title() {
        assert_eq!(repair("T\u{c3}\u{ad}tulo con UTF-8 roto"), "Título con UTF-8 roto");
    }

    #[test]
    fn test_repair_common_spanish_patterns() {
        assert_eq!(repair("Ã¡rbol"), "árbol");
        assert_eq!(repair("EspaÃ±a"), "España");
        assert_eq!(repair("pingÃ¼ino"), "pingüino");
        assert_eq!(repair("Â¿QuÃ© pasÃ³?"), "¿Qué pasó?");
    }

    #[test]
    fn test_repair_windows_1252_punctuation() {
        // U+2014 is E2 80 94; 0x80 and 0x94 only exist in Windows-1252.
        assert_eq!(repair("uno \u{e2}\u{20ac}\u{201d} dos"), "uno \u{2014} dos");
        assert_eq!(repair("\u{e2}\u{201a}\u{ac}"), "\u{20ac}");
    }

    #[test]
    fn test_repair_latin1_only_candidate() {
        let latin1 = [SingleByteEncoding::Latin1];
        assert_eq!(repair_with("Ã³", &latin1), "ó");
        // Windows-1252 punctuation has no Latin-1 byte.
        let dash = "\u{e2}\u{20ac}\u{201d}";
        assert_eq!(repair_with(dash, &latin1), dash);
    }

    #[test]
    fn test_repair_leaves_correct_text() {
        for text in ["Título", "España", "año 2024", "Crème brûlée", "日本語", "plain ascii", ""] {
            assert_eq!(repair(text), text);
        }
    }

    #[test]
    fn test_repair_unwinds_double_layers() {
        // "é" encoded twice over.
        assert_eq!(repair("\u{c3}\u{192}\u{c2}\u{a9}"), "é");
    }

    #[test]
    fn test_repair_is_idempotent() {
        let samples = [
            "T\u{c3}\u{ad}tulo con UTF-8 roto",
            "\u{c3}\u{192}\u{c2}\u{a9}t\u{c3}\u{192}\u{c2}\u{a9}",
            "Título",
            "Ã",
            "Â",
            "mixed Título and Ã³",
            "\u{FFFD}Ã©",
            "Ã\u{80}",
        ];
        for sample in samples {
            let once = repair(sample);
            assert_eq!(repair(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_repair_rejects_mixed_valid_and_broken() {
        // The correct "í" has no valid UTF-8 reading as a lone byte, so the
        // whole string is left alone.
        assert_eq!(repair("Título Ã³"), "Título Ã³");
    }

    #[test]
    fn test_encode_unmappable() {
        assert!(SingleByteEncoding::Latin1.encode("€").is_none());
        assert_eq!(SingleByteEncoding::Windows1252.encode("€"), Some(vec![0x80]));
    }
}
