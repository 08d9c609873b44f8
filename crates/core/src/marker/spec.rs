//! Marker configuration: how one kind of marker is found, rendered, and removed.

use regex::Regex;

/// Where a marker lives inside its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Trailing suffix (title). Replacements keep the separator in front of
    /// the marker and the result is trimmed.
    Suffix,
    /// Inline element somewhere in the text (description span). Surrounding
    /// text is left exactly as it was.
    Inline,
}

/// Describes one marker kind.
///
/// `locate` must expose the marker value as capture group 1. `remove` is
/// usually the same pattern but may be looser, so that removal also catches
/// malformed leftovers.
#[derive(Debug, Clone)]
pub struct MarkerSpec {
    pub name: &'static str,
    pub(crate) locate: Regex,
    pub(crate) remove: Regex,
    pub(crate) render: fn(&str) -> String,
    pub(crate) separator: &'static str,
    pub(crate) placement: Placement,
    pub(crate) accept: fn(&str) -> Option<String>,
    pub(crate) cleanup: fn(&str) -> String,
}

impl MarkerSpec {
    /// New inline marker whose removal pattern equals its locate pattern.
    pub fn new(name: &'static str, locate: Regex, render: fn(&str) -> String) -> Self {
        Self {
            name,
            remove: locate.clone(),
            locate,
            render,
            separator: "\n\n",
            placement: Placement::Inline,
            accept: accept_trimmed,
            cleanup: trim_owned,
        }
    }

    pub fn with_remove(mut self, remove: Regex) -> Self {
        self.remove = remove;
        self
    }

    pub fn with_separator(mut self, separator: &'static str) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Filter applied to captured values by `extract`.
    pub fn with_accept(mut self, accept: fn(&str) -> Option<String>) -> Self {
        self.accept = accept;
        self
    }

    /// Pass run over the text after something was removed.
    pub fn with_cleanup(mut self, cleanup: fn(&str) -> String) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Render a marker occurrence for `value`.
    pub fn render(&self, value: &str) -> String {
        (self.render)(value)
    }
}

fn accept_trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn trim_owned(text: &str) -> String {
    text.trim().to_string()
}
