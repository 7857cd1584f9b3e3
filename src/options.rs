//! Engine and per-call formatting options.

/// Which epoch serial numbers are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSystem {
    /// Serial 1 = January 1, 1900 (with the Lotus leap-year bug at serial 60).
    #[default]
    Date1900,
    /// Serial 0 = January 1, 1904 (classic Mac workbooks).
    Date1904,
}

/// Horizontal alignment when a cell width is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// What to do when a format code or value cannot be handled cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Surface the error through `try_format`.
    Raise,
    /// Emit a `tracing` warning and continue with the local fallback.
    #[default]
    Warn,
    /// Continue silently.
    Ignore,
    /// Fill the result with `#` characters.
    Pounds,
}

/// Engine-level options, fixed at [`Formatter`](crate::Formatter) construction.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub date_system: DateSystem,
    pub errors: ErrorPolicy,
    /// Default locale tag, e.g. `"en-US"`.
    pub locale: String,
    /// Width applied to every call that does not specify one.
    pub default_width: Option<usize>,
    /// Replacement for the short-date pattern (format id 14, `m/d/yy`).
    pub date_nf: Option<String>,
    /// Template emitted before a colored result; `{}` is the color name,
    /// `{rgb}` the hex value.
    pub color_pre: Option<String>,
    /// Template emitted after a colored result.
    pub color_post: Option<String>,
    /// Overrides the locale's decimal separator.
    pub decimal_separator: Option<String>,
    /// Overrides the locale's thousands separator.
    pub thousands_separator: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            date_system: DateSystem::default(),
            errors: ErrorPolicy::default(),
            locale: "en-US".to_string(),
            default_width: None,
            date_nf: None,
            color_pre: None,
            color_post: None,
            decimal_separator: None,
            thousands_separator: None,
        }
    }
}

/// Per-call rendering options.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub width: Option<usize>,
    pub align: Option<Align>,
    /// Locale for this call only; falls back to the engine locale.
    pub locale: Option<String>,
    pub decimal_separator: Option<String>,
    pub thousands_separator: Option<String>,
}

impl RenderOptions {
    pub fn width(width: usize) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }
}
