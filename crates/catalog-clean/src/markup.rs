// HTML markup stripping.
//
// Descriptions arrive as HTML fragments of varying quality. html5ever does
// the hard part (entity decoding, recovery from unclosed or stray tags);
// this module walks the resulting tree and keeps only text, turning block
// boundaries into spaces so paragraphs don't run together.

use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Node};

/// Elements whose boundaries separate words.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Elements whose content is never visible text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

/// Named references that browsers decode even without the trailing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Entity references that survive decoding, e.g. from double-escaped
/// input like `&amp;eacute;` or `&amp;lt`.
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"&(?:#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[A-Za-z][A-Za-z0-9]*;|(?:{}))",
        LEGACY_ENTITIES.join("|")
    );
    Regex::new(&pattern).expect("valid entity regex")
});

/// Remove all tags and decode entities, keeping only text.
///
/// Block-level boundaries become a single space, so `<p>A</p><p>B</p>`
/// yields `"A B"` once whitespace is collapsed. Malformed markup never
/// fails; the output never contains `<`, `>` or an entity reference.
/// Whitespace is left as found apart from the inserted separators.
pub fn strip(html_text: &str) -> String {
    if !html_text.contains('<') && !html_text.contains('&') {
        return html_text.replace('>', " ");
    }

    let fragment = Html::parse_fragment(html_text);
    let mut text = String::with_capacity(html_text.len());
    for child in fragment.tree.root().children() {
        walk_node(child, &mut text);
    }

    scrub(&text)
}

fn walk_node(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text.deref()),
        Node::Element(elem) => {
            let tag = elem.name();
            if SKIPPED_ELEMENTS.contains(&tag) {
                return;
            }
            let block = BLOCK_ELEMENTS.contains(&tag);
            if block {
                out.push(' ');
            }
            for child in node.children() {
                walk_node(child, out);
            }
            if block {
                out.push(' ');
            }
        }
        _ => {
            // Comments, doctypes and processing instructions carry no text,
            // but the fragment root and document nodes contain children.
            for child in node.children() {
                walk_node(child, out);
            }
        }
    }
}

/// Drop anything in decoded text that would still read as markup: literal
/// angle brackets (from `&lt;`/`&gt;`) and leftover entity references.
fn scrub(text: &str) -> String {
    let no_brackets = text.replace(['<', '>'], " ");
    ENTITY_RE.replace_all(&no_brackets, " ").into_owned()
}
