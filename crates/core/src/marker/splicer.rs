//! Idempotent insert/replace/remove of a marker inside free text.

use tracing::debug;

use super::spec::{MarkerSpec, Placement};

/// Applies a [`MarkerSpec`] to text blobs.
///
/// All operations are pure: they take the current text and return the new
/// text. Applying the same update twice yields the same text as applying it
/// once.
#[derive(Debug, Clone, Copy)]
pub struct MarkerSplicer<'a> {
    spec: &'a MarkerSpec,
}

impl<'a> MarkerSplicer<'a> {
    pub fn new(spec: &'a MarkerSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &'a MarkerSpec {
        self.spec
    }

    /// Set the marker to `value`, or remove it when `value` is absent or blank.
    ///
    /// An existing marker is replaced in place. Only one marker of a kind is
    /// expected per text: when several match, the first one receives the new
    /// value and the others are dropped (last writer wins). Without an
    /// existing marker the rendered one is appended to the trimmed text after
    /// the marker's separator.
    pub fn upsert(&self, text: &str, value: Option<&str>) -> String {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return self.remove(text);
        };

        let rendered = self.spec.render(value);
        let mut found = self.spec.locate.find_iter(text);

        let Some(first) = found.next() else {
            let base = text.trim();
            return if base.is_empty() {
                rendered
            } else {
                format!("{base}{}{rendered}", self.spec.separator)
            };
        };

        let mut out = String::with_capacity(text.len() + rendered.len());
        out.push_str(&text[..first.start()]);
        if self.spec.placement == Placement::Suffix {
            out.push_str(self.spec.separator);
        }
        out.push_str(&rendered);

        let mut last = first.end();
        let mut duplicates = 0usize;
        for m in found {
            out.push_str(&text[last..m.start()]);
            last = m.end();
            duplicates += 1;
        }
        out.push_str(&text[last..]);

        if duplicates > 0 {
            debug!(marker = self.spec.name, duplicates, "collapsed duplicate markers");
            out = (self.spec.cleanup)(&out);
        }

        match self.spec.placement {
            Placement::Suffix => out.trim().to_string(),
            Placement::Inline => out,
        }
    }

    /// Strip every occurrence of the marker.
    ///
    /// Text without a marker is returned untouched. Otherwise the marker's
    /// cleanup runs after stripping, repeatedly, until nothing more changes.
    pub fn remove(&self, text: &str) -> String {
        if !self.spec.remove.is_match(text) {
            return text.to_string();
        }

        let mut current = text.to_string();
        loop {
            let stripped = self.spec.remove.replace_all(&current, "");
            let next = (self.spec.cleanup)(&stripped);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    /// The marker's value, if present and accepted by its `accept` filter.
    pub fn extract(&self, text: &str) -> Option<String> {
        let caps = self.spec.locate.captures(text)?;
        let raw = caps.get(1)?.as_str();
        (self.spec.accept)(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn tag_spec() -> MarkerSpec {
        MarkerSpec::new(
            "tag",
            Regex::new(r"\[tag:([^\]]*)\]").unwrap(),
            |v| format!("[tag:{v}]"),
        )
        .with_separator(" ")
    }

    #[test]
    fn test_upsert_appends_when_missing() {
        let spec = tag_spec();
        let s = MarkerSplicer::new(&spec);
        assert_eq!(s.upsert("  hello  ", Some("a")), "hello [tag:a]");
        assert_eq!(s.upsert("", Some("a")), "[tag:a]");
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let spec = tag_spec();
        let s = MarkerSplicer::new(&spec);
        assert_eq!(s.upsert("x [tag:old] y", Some("new")), "x [tag:new] y");
    }

    #[test]
    fn test_upsert_collapses_duplicates() {
        let spec = tag_spec();
        let s = MarkerSplicer::new(&spec);
        let once = s.upsert("[tag:1] mid [tag:2]", Some("3"));
        assert_eq!(once, "[tag:3] mid");
        assert_eq!(s.upsert(&once, Some("3")), once);
    }

    #[test]
    fn test_upsert_blank_value_removes() {
        let spec = tag_spec();
        let s = MarkerSplicer::new(&spec);
        assert_eq!(s.upsert("body [tag:x]", None), "body");
        assert_eq!(s.upsert("body [tag:x]", Some("   ")), "body");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let spec = tag_spec();
        let s = MarkerSplicer::new(&spec);
        let once = s.remove(" a [tag:1] b [tag:2] ");
        assert_eq!(once, "a  b");
        assert_eq!(s.remove(&once), once);
        assert_eq!(s.remove("[tag:1]"), "");
        assert_eq!(s.remove("untouched  "), "untouched  ");
    }

    #[test]
    fn test_extract() {
        let spec = tag_spec();
        let s = MarkerSplicer::new(&spec);
        assert_eq!(s.extract("a [tag: v ] b"), Some("v".to_string()));
        assert_eq!(s.extract("a [tag:] b"), None);
        assert_eq!(s.extract("plain"), None);
    }

    #[test]
    fn test_upsert_idempotent_over_inputs() {
        let spec = tag_spec();
        let s = MarkerSplicer::new(&spec);
        let inputs = ["", "   ", "plain", "[tag:a]", "x [tag:a] [tag:b] y", "\n\nz\n"];
        for input in inputs {
            let once = s.upsert(input, Some("v"));
            assert_eq!(s.upsert(&once, Some("v")), once, "input {input:?}");
            assert_eq!(s.extract(&once).as_deref(), Some("v"));
        }
    }
}
