//! Marker management inside product text.
//!
//! A marker is a machine-locatable substring that carries a derived value:
//! the `MHD <date>` title suffix and the inline description spans. Each kind
//! is a [`MarkerSpec`] (locate pattern, renderer, removal pattern) applied
//! through a [`MarkerSplicer`].

pub mod description;
pub mod spec;
pub mod splicer;
pub mod title;

pub use description::{
    BEST_BEFORE_CLASS, BEST_BEFORE_MARKER, SINGLE_EAN_CLASS, SINGLE_EAN_MARKER,
    clean_description, extract_best_before, extract_single_ean, find_span_content,
    update_best_before, update_single_ean,
};
pub use spec::{MarkerSpec, Placement};
pub use splicer::MarkerSplicer;
pub use title::{TITLE_MARKER, extract_from_title, remove_from_title, update_title};
