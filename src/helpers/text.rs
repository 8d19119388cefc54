use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*(br|/p|/div|/li)\s*/?>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static BLANK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static NEWLINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

const ENTITIES: [(&str, &str); 8] = [
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&deg;", "°"),
    // Last, so `&amp;lt;` stays `&lt;`
    ("&amp;", "&"),
];

/// Turn report markup into plain text, one paragraph per line
pub fn plain_text(input: &str) -> String {
    let text = BLOCK_TAG_RE.replace_all(input, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = ENTITIES
        .iter()
        .fold(text.into_owned(), |text, (entity, replacement)| {
            text.replace(entity, replacement)
        });
    let text = BLANK_RE.replace_all(&text, " ");
    NEWLINES_RE.replace_all(text.trim(), "\n").into_owned()
}
