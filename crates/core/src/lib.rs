//! Keeps best-before (MHD) markers of product records in sync.
//!
//! A product's 6-digit `DDMMYY` token is the single source of truth. From it
//! the [`sync::FieldSynchronizer`] derives a structured date, a days-remaining
//! counter, a `MHD <date>` title suffix, and an invisible description span.

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod config;
pub mod events;
pub mod marker;
pub mod rule;
pub mod store;
pub mod sync;
pub mod token;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
