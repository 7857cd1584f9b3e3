//! Error types for format evaluation.

use thiserror::Error;

/// Errors that can occur while scanning or evaluating a format code.
///
/// Most of these are recoverable: how they surface depends on the engine's
/// [`ErrorPolicy`](crate::ErrorPolicy). Under the default `Warn` policy they
/// are logged and rendering continues with a local fallback; `Raise` turns
/// them into `Err` results from `try_format`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("unterminated string in format |{0}|")]
    UnterminatedString(String),

    #[error("unterminated \"[\" block in format |{0}|")]
    UnterminatedBracket(String),

    #[error("unrecognized character '{ch}' in format |{fmt}|")]
    UnrecognizedCharacter { ch: char, fmt: String },

    #[error("invalid escape at end of format |{0}|")]
    InvalidEscape(String),

    #[error("cannot pick a section from format |{0}|")]
    TooManySections(String),

    #[error("invalid condition in |{0}|")]
    InvalidCondition(String),

    #[error("bad hour format: {0}")]
    BadHourFormat(String),

    #[error("bad minute format: {0}")]
    BadMinuteFormat(String),

    #[error("bad second format: {0}")]
    BadSecondFormat(String),

    #[error("bad elapsed-time format: {0}")]
    BadAbsTimeFormat(String),

    #[error("unsupported number format |{0}|")]
    UnsupportedFormat(String),

    #[error("unknown locale {0}")]
    UnknownLocale(String),

    #[error("unsupported value of type {0} for this format")]
    UnsupportedValue(&'static str),

    #[error("fraction format with a zero denominator")]
    ZeroDenominator,
}
