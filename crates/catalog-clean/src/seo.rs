// SEO field synthesis: "Title | Author" page titles, URL slugs and
// meta-length descriptions.
//
// Inputs are expected to be normalized text already. Every output is a
// pure function of its inputs and the config; nothing here deduplicates
// slugs across a catalog.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::SeoConfig;

/// Synthesized SEO fields for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoFields {
    pub seo_title: String,
    pub slug: String,
    pub short_description: String,
    /// The author suffix didn't fit and was left out.
    pub author_dropped: bool,
    /// The title itself had to be cut.
    pub title_truncated: bool,
}

impl SeoFields {
    pub fn was_truncated(&self) -> bool {
        self.author_dropped || self.title_truncated
    }
}

/// Synthesize SEO fields with the default limits (70-char titles,
/// 160-char descriptions).
pub fn synthesize(title: &str, author: &str, description: &str) -> SeoFields {
    synthesize_with(title, author, description, &SeoConfig::default())
}

pub fn synthesize_with(
    title: &str,
    author: &str,
    description: &str,
    config: &SeoConfig,
) -> SeoFields {
    let (seo_title, author_dropped, title_truncated) = build_seo_title(title, author, config);
    let slug = slugify(&seo_title, config.slug_max_chars);
    let short_description = short_description(
        description,
        config.short_description_max_chars,
        &config.ellipsis,
    );

    SeoFields {
        seo_title,
        slug,
        short_description,
        author_dropped,
        title_truncated,
    }
}

/// Build the page title. When the whole thing doesn't fit, the author is
/// dropped first; only then is the title cut, at a word boundary where one
/// exists. An empty title falls back to the author alone.
fn build_seo_title(title: &str, author: &str, config: &SeoConfig) -> (String, bool, bool) {
    let max = config.title_max_chars;
    let (head, suffix) = match (title.is_empty(), author.is_empty()) {
        (true, true) => return (String::new(), false, false),
        (true, false) => (author, None),
        (false, true) => (title, None),
        (false, false) => (title, Some(author)),
    };

    if let Some(author) = suffix {
        let combined = format!("{head}{}{author}", config.separator);
        if char_len(&combined) <= max {
            return (combined, false, false);
        }
    }

    let author_dropped = suffix.is_some();
    if char_len(head) <= max {
        return (head.to_string(), author_dropped, false);
    }
    (truncate_at_word(head, max), author_dropped, true)
}

/// Derive a URL slug: ASCII-folded, lowercase, runs of anything that isn't
/// a letter or digit collapsed to one hyphen, no leading/trailing hyphen.
///
/// Text with no Latin content (e.g. CJK titles) falls back to hex code
/// points, so a non-empty input always produces a non-empty slug.
pub fn slugify(text: &str, max_chars: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.nfkd() {
        if is_combining_mark(c) || is_apostrophe(c) {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            push_slug_char(&mut slug, c, &mut pending_hyphen);
        } else if let Some(folded) = fold_latin(c) {
            for f in folded.chars() {
                push_slug_char(&mut slug, f, &mut pending_hyphen);
            }
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        slug = codepoint_slug(text);
    }
    truncate_slug(slug, max_chars)
}

fn push_slug_char(slug: &mut String, c: char, pending_hyphen: &mut bool) {
    if *pending_hyphen && !slug.is_empty() {
        slug.push('-');
    }
    *pending_hyphen = false;
    slug.push(c.to_ascii_lowercase());
}

/// Letters NFKD doesn't decompose to an ASCII base.
fn fold_latin(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ø' | 'Ø' => "o",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'þ' | 'Þ' => "th",
        'ł' | 'Ł' => "l",
        'ı' => "i",
        'ħ' | 'Ħ' => "h",
        _ => return None,
    };
    Some(folded)
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '\u{2018}' | '`')
}

fn codepoint_slug(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| format!("u{:x}", u32::from(c)))
        .collect::<Vec<_>>()
        .join("-")
}

fn truncate_slug(slug: String, max_chars: usize) -> String {
    // Slugs are pure ASCII here, so byte and char offsets agree.
    if slug.len() <= max_chars {
        return slug;
    }
    let cut = &slug[..max_chars];
    let cut = if slug.as_bytes()[max_chars] == b'-' {
        cut
    } else {
        match cut.rfind('-') {
            Some(i) if i > 0 => &cut[..i],
            _ => cut,
        }
    };
    cut.trim_end_matches('-').to_string()
}

/// Cut `description` to at most `max_chars` characters including the
/// ellipsis, at a word boundary.
pub fn short_description(description: &str, max_chars: usize, ellipsis: &str) -> String {
    if char_len(description) <= max_chars {
        return description.to_string();
    }
    let budget = max_chars.saturating_sub(char_len(ellipsis));
    let mut cut = truncate_at_word(description, budget)
        .trim_end_matches('.')
        .to_string();
    cut.push_str(ellipsis);
    cut
}

/// Cut to at most `max_chars` characters, backing off to the last
/// whitespace when the cut would land mid-word. A single word longer than
/// the limit is hard-cut.
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(i, _)| i);
    let prefix = &text[..end];
    let at_boundary = text[end..].starts_with(char::is_whitespace);

    let cut = if at_boundary {
        prefix
    } else {
        match prefix.rfind(char::is_whitespace) {
            Some(i) if i > 0 => &prefix[..i],
            _ => prefix,
        }
    };

    let trimmed = cut.trim_end_matches(|c: char| {
        c.is_whitespace() || matches!(c, ',' | ';' | ':' | '|' | '-' | '\u{2013}' | '\u{2014}')
    });
    if trimmed.is_empty() {
        cut.trim_end().to_string()
    } else {
        trimmed.to_string()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
