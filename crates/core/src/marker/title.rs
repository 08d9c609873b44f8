//! The `MHD <date>` suffix at the end of a product title.
//!
//! Only a well-formed date is recognised: `MHD` (any case, optional colon)
//! followed by `DD.MM.YY` or `DD.MM.YYYY` at the very end of the title.
//! Anything else after `MHD` is ordinary title text and is never touched.

use std::sync::LazyLock;

use regex::Regex;

use super::spec::{MarkerSpec, Placement};
use super::splicer::MarkerSplicer;

pub static TITLE_MARKER: LazyLock<MarkerSpec> = LazyLock::new(|| {
    let locate =
        Regex::new(r"(?i)(?:^|\s+)MHD:?\s*(\d{2}\.\d{2}\.(?:\d{4}|\d{2}))\s*$").unwrap();
    MarkerSpec::new("title-mhd", locate, |date| format!("MHD {date}"))
        .with_separator(" ")
        .with_placement(Placement::Suffix)
});

pub fn title_splicer() -> MarkerSplicer<'static> {
    MarkerSplicer::new(&TITLE_MARKER)
}

/// Add or replace the MHD suffix. Blank titles are returned unchanged.
pub fn update_title(title: &str, display_date: &str) -> String {
    if title.trim().is_empty() {
        return title.to_string();
    }
    title_splicer().upsert(title, Some(display_date))
}

/// Strip the MHD suffix. Blank titles are returned unchanged.
pub fn remove_from_title(title: &str) -> String {
    if title.trim().is_empty() {
        return title.to_string();
    }
    title_splicer().remove(title)
}

/// The date in the title's MHD suffix, e.g. `"31.12.24"`.
pub fn extract_from_title(title: &str) -> Option<String> {
    title_splicer().extract(title)
}
