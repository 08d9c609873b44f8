//! Best-before token handling.
//!
//! - [`codec`]: `DDMMYY` decoding, validation, and the display/description/storage forms
//! - [`clock`]: injectable "today"

pub mod clock;
pub mod codec;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{
    MhdDate, STORAGE_FORMAT, days_until, decode, format_for_description,
    format_for_display, format_for_storage, format_to_token,
    is_valid_token_format, parse_storage_value,
};
