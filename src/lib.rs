//! cellfmt - spreadsheet ECMA-376 number format codes
//!
//! This crate evaluates spreadsheet number format codes against cell values,
//! matching the observable behavior of the major implementations including
//! their undocumented quirks (the phantom February 29, 1900 among them).
//!
//! ```
//! use cellfmt::Formatter;
//!
//! let f = Formatter::default();
//! assert_eq!(f.format("#,##0.00", 1234.5), "1,234.50");
//! assert_eq!(f.format(14u32, 43_880.0), "2/19/2020");
//! assert_eq!(f.format("[hh]:mm", 1.5), "36:00");
//! ```

pub mod error;
pub mod options;
pub mod value;

pub mod date_serial;

mod cache;
mod formatter;
mod locale;
mod math;
mod sections;
mod table;
mod tokenizer;

pub use date_serial::{DateParts, MAX_SERIAL};
pub use error::FormatError;
pub use formatter::{CategorySpec, FormatRef, Formatter};
pub use locale::{Era, Locale, Numerals};
pub use math::round_half_away;
pub use options::{Align, DateSystem, ErrorPolicy, FormatOptions, RenderOptions};
pub use table::FormatTable;
pub use value::Value;

/// Format a value with a throwaway default engine. Callers with more than
/// one value to format should build a [`Formatter`] and reuse it.
pub fn format<'a>(fmt: &'a str, value: impl Into<Value<'a>>) -> String {
    Formatter::default().format(fmt, value)
}
