//! Inline marker spans inside the product description HTML.
//!
//! Two spans are managed:
//! - `<span class="invisible-date">Mindestens haltbar bis: DD.MM.YYYY</span>`
//! - `<span class="single-ean">Einzel EAN: 4006381333931</span>`
//!
//! A span is recognised by its class (either quote style, other classes and
//! attributes allowed). Its content may carry inline markup but never another
//! `<span>` or `</span>` tag: an opening tag left unclosed before the next span
//! is not a marker, so neither the text after it nor a following span is
//! swallowed.

use std::sync::LazyLock;

use regex::Regex;

use super::spec::MarkerSpec;
use super::splicer::MarkerSplicer;

pub const BEST_BEFORE_CLASS: &str = "invisible-date";
pub const SINGLE_EAN_CLASS: &str = "single-ean";

static EMPTY_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<span\b[^>]*>\s*</span>").unwrap());

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\n[ \t\r]*){3,}").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static LONG_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}\.\d{1,2}\.\d{4}").unwrap());

/// Span content up to, not including, the closing tag. Any `<` must not start
/// a `<span` or `</span` tag.
const SPAN_CONTENT: &str = concat!(
    r"(?:[^<]|<(?:",
    r"[^s/<]|s(?:[^p<]|p(?:[^a<]|a(?:[^n<]|n[^\s>/<])))",
    r"|/(?:[^s<]|s(?:[^p<]|p(?:[^a<]|a(?:[^n<]|n[^\s></]))))",
    r"))*?",
);

/// Opening tag of a span carrying `class` among its classes.
fn span_open(class: &str) -> String {
    format!(
        r#"<span(?:\s[^>]*)?\sclass\s*=\s*["'](?:[^"'>]*\s)?{}(?:\s[^"'>]*)?["'][^>]*>"#,
        regex::escape(class)
    )
}

/// Whole span with `class`, content in group 1.
fn span_pattern(class: &str) -> String {
    format!(r"(?is){}({SPAN_CONTENT})</span\s*>", span_open(class))
}

pub static BEST_BEFORE_MARKER: LazyLock<MarkerSpec> = LazyLock::new(|| {
    let locate = Regex::new(&span_pattern(BEST_BEFORE_CLASS)).unwrap();
    MarkerSpec::new("best-before", locate, |date| {
        format!(r#"<span class="{BEST_BEFORE_CLASS}">Mindestens haltbar bis: {date}</span>"#)
    })
    .with_accept(accept_long_date)
    .with_cleanup(clean_description)
});

pub static SINGLE_EAN_MARKER: LazyLock<MarkerSpec> = LazyLock::new(|| {
    let locate = Regex::new(&format!(
        r"(?is){}\s*Einzel\s+EAN:\s*([^<]*?)\s*</span>",
        span_open(SINGLE_EAN_CLASS)
    ))
    .unwrap();
    MarkerSpec::new("single-ean", locate, |ean| {
        format!(r#"<span class="{SINGLE_EAN_CLASS}">Einzel EAN: {ean}</span>"#)
    })
    .with_accept(accept_ean)
    .with_cleanup(clean_description)
});

pub fn best_before_splicer() -> MarkerSplicer<'static> {
    MarkerSplicer::new(&BEST_BEFORE_MARKER)
}

pub fn single_ean_splicer() -> MarkerSplicer<'static> {
    MarkerSplicer::new(&SINGLE_EAN_MARKER)
}

/// Set (`Some`) or remove (`None`) the best-before span. `date` is `DD.MM.YYYY`.
pub fn update_best_before(description: &str, date: Option<&str>) -> String {
    best_before_splicer().upsert(description, date)
}

/// Set (`Some`) or remove (`None`) the single-EAN span.
pub fn update_single_ean(description: &str, ean: Option<&str>) -> String {
    single_ean_splicer().upsert(description, ean)
}

/// The `DD.MM.YYYY` date inside the best-before span.
pub fn extract_best_before(description: &str) -> Option<String> {
    best_before_splicer().extract(description)
}

/// The EAN inside the single-EAN span, if it is 8 to 13 digits.
pub fn extract_single_ean(description: &str) -> Option<String> {
    single_ean_splicer().extract(description)
}

/// Text content of the first span with the given class, tags stripped.
pub fn find_span_content(description: &str, class: &str) -> Option<String> {
    let re = Regex::new(&span_pattern(class)).ok()?;
    let caps = re.captures(description)?;
    Some(TAG_RE.replace_all(&caps[1], "").trim().to_string())
}

/// Drop empty spans, squeeze runs of blank lines to one, trim.
pub fn clean_description(description: &str) -> String {
    let mut text = description.to_string();
    loop {
        let next = EMPTY_SPAN_RE.replace_all(&text, "").into_owned();
        if next == text {
            break;
        }
        text = next;
    }
    BLANK_LINES_RE.replace_all(&text, "\n\n").trim().to_string()
}

fn accept_long_date(content: &str) -> Option<String> {
    let text = TAG_RE.replace_all(content, "");
    LONG_DATE_RE.find(&text).map(|m| m.as_str().to_string())
}

fn accept_ean(value: &str) -> Option<String> {
    let value = value.trim();
    let digits = value.len();
    ((8..=13).contains(&digits) && value.bytes().all(|b| b.is_ascii_digit()))
        .then(|| value.to_string())
}
