//! The formatting engine.
//!
//! [`Formatter`] owns the engine-wide state: options, the resolved base
//! locale, the numbered format table and the locale cache. Each call builds a
//! short-lived [`Render`] that carries the per-call state (width, alignment,
//! the locale pair, digit shaping) through section evaluation.
//!
//! Evaluation follows the classic three-pass shape: scan the section into
//! pieces, fix up date tokens with a backward pass (hour style, sub-second
//! precision, minutes vs. months), then resolve each piece against the value.
//! Digit placeholders are rendered once for the whole section and the output
//! is redistributed across the placeholder pieces afterwards, which is what
//! makes formats like `"$"#,##0.00` or `# ?/?` come out aligned.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::LocaleCache;
use crate::date_serial::{decode_serial, DateParts};
use crate::error::FormatError;
use crate::locale::{self, Locale, Numerals};
use crate::math::{fill, pounds, round_half_away, to_str};
use crate::options::{Align, ErrorPolicy, FormatOptions, RenderOptions};
use crate::sections::{choose_section, fmt_is_date, negcond};
use crate::table::FormatTable;
use crate::tokenizer::{tokenize, RawToken};
use crate::value::Value;

mod date;
mod general;
mod localize;
mod number;

/// A format reference: either a numbered table entry or a literal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRef<'a> {
    Id(u32),
    Code(&'a str),
}

impl<'a> From<u32> for FormatRef<'a> {
    fn from(id: u32) -> Self {
        FormatRef::Id(id)
    }
}

impl<'a> From<&'a str> for FormatRef<'a> {
    fn from(code: &'a str) -> Self {
        FormatRef::Code(code)
    }
}

/// Options for [`Formatter::get_format`], the category-to-code builder.
#[derive(Debug, Clone, Default)]
pub struct CategorySpec {
    /// Decimal places; each category has its own default.
    pub places: Option<u32>,
    /// Group the integer part (`#,##0` instead of `0`).
    pub thousands: bool,
    /// Show negative values in red.
    pub red_negative: bool,
    /// Show negative values in parentheses.
    pub paren_negative: bool,
    /// Fraction denominator: negative for "up to N digits", positive for a
    /// fixed denominator.
    pub denominator: Option<i32>,
    /// Scientific: `E-00` instead of `E+00`.
    pub negative_exponent: bool,
}

const CATEGORY_TITLES: [&str; 11] = [
    "Number",
    "Currency",
    "Accounting",
    "Date",
    "Short Date",
    "Long Date",
    "Time",
    "Percentage",
    "Fraction",
    "Scientific",
    "Text",
];

/// The indexed color palette; `[Color12]` addresses entry 12.
const PALETTE: [&str; 57] = [
    "000000", "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF",
    "800000", "008000", "000080", "808000", "800080", "008080", "C0C0C0", "808080", "9999FF",
    "993366", "FFFFCC", "CCFFFF", "660066", "FF8080", "0066CC", "CCCCFF", "000080", "FF00FF",
    "FFFF00", "00FFFF", "800080", "800000", "008080", "0000FF", "00CCFF", "CCFFFF", "CCFFCC",
    "FFFF99", "99CCFF", "FF99CC", "CC99FF", "FFCC99", "3366FF", "33CCCC", "99CC00", "FFCC00",
    "FF9900", "FF6600", "666699", "969696", "003366", "339966", "003300", "333300", "993300",
    "993366", "333399", "333333",
];

fn title_case(s: &str) -> String {
    let mut out = String::new();
    let mut start = true;
    for c in s.chars() {
        if c.is_ascii_alphabetic() {
            if start {
                out.push(c.to_ascii_uppercase());
                start = false;
            } else {
                out.push(c.to_ascii_lowercase());
            }
        } else {
            out.push(c);
            start = true;
        }
    }
    out
}

fn color_rgb(name: &str) -> &'static str {
    let idx: usize = match name {
        "Black" => 1,
        "White" => 2,
        "Red" => 3,
        "Green" => 4,
        "Blue" => 5,
        "Yellow" => 6,
        "Magenta" => 7,
        "Cyan" => 8,
        _ => name
            .strip_prefix("Color")
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0),
    };
    PALETTE.get(idx).copied().unwrap_or(PALETTE[0])
}

fn is_general_prefix(s: &str) -> bool {
    let head: String = s.chars().take(7).collect();
    head.eq_ignore_ascii_case("General")
}

/// The formatting engine.
#[derive(Debug)]
pub struct Formatter {
    opts: FormatOptions,
    base: Arc<Locale>,
    table: FormatTable,
    cache: LocaleCache,
    locales: HashMap<String, Arc<Locale>>,
    numerals: HashMap<u8, Numerals>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

impl Formatter {
    pub fn new(opts: FormatOptions) -> Self {
        let base = match locale::builtin(&opts.locale) {
            Some(l) => Arc::new(l),
            None => {
                tracing::warn!(locale = %opts.locale, "unknown engine locale, using en-US");
                Arc::new(Locale::default())
            }
        };
        Self {
            opts,
            base,
            table: FormatTable::new(),
            cache: LocaleCache::new(),
            locales: HashMap::new(),
            numerals: HashMap::new(),
        }
    }

    /// Format a value, swallowing errors into a cell of `#` characters.
    pub fn format<'a>(
        &self,
        fmt: impl Into<FormatRef<'a>>,
        value: impl Into<Value<'a>>,
    ) -> String {
        self.format_with(fmt, value, &RenderOptions::default())
    }

    pub fn format_with<'a>(
        &self,
        fmt: impl Into<FormatRef<'a>>,
        value: impl Into<Value<'a>>,
        opts: &RenderOptions,
    ) -> String {
        let width = opts.width.or(self.opts.default_width);
        match self.try_format_with(fmt, value, opts) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "formatting failed");
                pounds(width)
            }
        }
    }

    pub fn try_format<'a>(
        &self,
        fmt: impl Into<FormatRef<'a>>,
        value: impl Into<Value<'a>>,
    ) -> Result<String, FormatError> {
        self.try_format_with(fmt, value, &RenderOptions::default())
    }

    pub fn try_format_with<'a>(
        &self,
        fmt: impl Into<FormatRef<'a>>,
        value: impl Into<Value<'a>>,
        opts: &RenderOptions,
    ) -> Result<String, FormatError> {
        let fref = fmt.into();
        let value = value.into();
        let mut r = self.begin(opts)?;
        let sfmt = self.resolve_ref(&fref);

        #[cfg(feature = "chrono")]
        let (value, was_datetime) = match self.serial_of(&value) {
            Some(s) => (Value::Number(s), true),
            None => (value, false),
        };

        // Booleans route like numbers so `General` reaches the
        // TRUE/FALSE renderer instead of the text fallback.
        let numv = value.as_number();
        let mut errs = Vec::new();
        let choice = choose_section(&sfmt, numv, &mut errs);
        for e in errs {
            r.soft(e)?;
        }
        let choice = match choice {
            Some(c) => c,
            None => return Ok(pounds(r.width)),
        };
        let text_fmt = sfmt.contains('@');

        if is_general_prefix(&choice.section) {
            #[cfg(feature = "chrono")]
            if was_datetime {
                // General on a datetime value shows the short date.
                return if text_fmt {
                    self.try_format_with(FormatRef::Code("@"), value, opts)
                } else {
                    self.try_format_with(FormatRef::Id(14), value, opts)
                };
            }
            return r.general_value(&value, text_fmt);
        }
        if value.is_empty() {
            return Ok(fill(' ', r.width.unwrap_or(0)));
        }
        let out = r.eval_fmt(&choice.section, &value, choice.flen)?;
        if r.pound {
            return Ok(pounds(r.width));
        }
        Ok(out)
    }

    /// The code a category renders with, built from the engine locale.
    pub fn get_format(&self, category: &str, spec: &CategorySpec) -> Result<String, FormatError> {
        let loc = &*self.base;
        let dec = |d: u32| -> String {
            if d == 0 {
                String::new()
            } else {
                format!(".{}", "0".repeat(d as usize))
            }
        };
        match category {
            "Number" => {
                let d = spec.places.unwrap_or(2).min(30);
                let base = format!("{}{}", if spec.thousands { "#,##0" } else { "0" }, dec(d));
                Ok(match (spec.paren_negative, spec.red_negative) {
                    (false, false) => base,
                    (false, true) => format!("{0};[Red]{0}", base),
                    (true, false) => format!("{0}_);({0})", base),
                    (true, true) => format!("{0}_);[Red]({0})", base),
                })
            }
            "Currency" => Ok(self.currency_format(loc, false, spec.places)),
            "Accounting" => Ok(self.currency_format(loc, true, spec.places)),
            "Date" | "Short Date" => Ok(self
                .opts
                .date_nf
                .clone()
                .unwrap_or_else(|| loc.short_date_format.clone())),
            "Long Date" => Ok("[$-F800]dddd, mmmm dd, yyyy".into()),
            "Time" => Ok("[$-F400]h:mm:ss AM/PM".into()),
            "Percentage" => {
                let d = spec.places.unwrap_or(2).min(30);
                Ok(format!("0{}%", dec(d)))
            }
            "Fraction" => {
                let fd = spec.denominator.unwrap_or(-1);
                let prefix = if spec.thousands { "#,###" } else { "#" };
                if fd < 0 {
                    let q = "?".repeat(((-fd) as usize).min(30));
                    Ok(format!("{} {}/{}", prefix, q, q))
                } else if fd > 0 {
                    let q = "?".repeat(fd.to_string().len());
                    Ok(format!("{} {}/{}", prefix, q, fd))
                } else {
                    Err(FormatError::ZeroDenominator)
                }
            }
            "Scientific" => {
                let d = spec.places.unwrap_or(2).min(30);
                let sign = if spec.negative_exponent { '-' } else { '+' };
                Ok(format!("0{}E{}00", dec(d), sign))
            }
            "Text" => Ok("@".into()),
            _ => Ok("General".into()),
        }
    }

    fn currency_format(&self, loc: &Locale, accounting: bool, places: Option<u32>) -> String {
        let digits = places.unwrap_or(loc.frac_digits as u32).min(30) as usize;
        let num = if digits > 0 {
            format!("#,##0.{}", "0".repeat(digits))
        } else {
            "#,##0".to_string()
        };
        let sym = &loc.currency_symbol;
        let cs = if sym.is_empty() {
            "$".to_string()
        } else if sym == "$" {
            "\"$\"".to_string()
        } else {
            format!("[${}]", sym)
        };
        if accounting {
            let dash = if digits > 0 {
                format!("\"-\"{}", "?".repeat(digits))
            } else {
                "\"-\"".to_string()
            };
            return if loc.p_cs_precedes {
                format!("_({cs}* {num}_);_({cs}* ({num});_({cs}* {dash}_);_(@_)")
            } else {
                format!("_(* {num} {cs}_);_(* ({num}) {cs};_(* {dash} {cs}_);_(@_)")
            };
        }
        let sp = |by: u8| if by == 1 { " " } else { "" };
        let pos = if loc.p_cs_precedes {
            format!("{cs}{}{num}", sp(loc.p_sep_by_space))
        } else {
            format!("{num}{}{cs}", sp(loc.p_sep_by_space))
        };
        let neg_core = if loc.n_cs_precedes {
            format!("{cs}{}{num}", sp(loc.n_sep_by_space))
        } else {
            format!("{num}{}{cs}", sp(loc.n_sep_by_space))
        };
        match loc.n_sign_posn {
            0 => format!("{pos}_);({neg_core})"),
            2 => format!("{pos};{neg_core}-"),
            _ => {
                if pos == neg_core {
                    // A bare leading minus falls out of the single-section
                    // form on its own.
                    pos
                } else {
                    format!("{pos};-{neg_core}")
                }
            }
        }
    }

    /// The format string an id resolves to.
    pub fn format_code(&self, id: u32) -> &str {
        self.table.resolve(id)
    }

    /// Store a format code, returning its (possibly reused) id.
    pub fn load_format(&mut self, fmt: &str) -> u32 {
        self.table.load(fmt)
    }

    /// Bulk-load a workbook format table.
    pub fn load_table(&mut self, table: &HashMap<u32, String>) {
        self.table.load_table(table)
    }

    /// The effective id-to-code table.
    pub fn get_table(&self) -> HashMap<u32, String> {
        self.table.entries()
    }

    /// Store a format code at an explicit id.
    pub fn insert_format(&mut self, id: u32, fmt: impl Into<String>) {
        self.table.insert(id, fmt)
    }

    pub fn day_names(&self) -> &[(String, String)] {
        &self.base.days
    }

    /// Replace the day names of the engine locale, Sunday first,
    /// (abbreviated, full) pairs.
    pub fn set_day_names(&mut self, names: Vec<(String, String)>) {
        Arc::make_mut(&mut self.base).days = names;
    }

    pub fn month_names(&self) -> &[(String, String, String)] {
        &self.base.months
    }

    /// Replace the month names of the engine locale, (narrow, abbreviated,
    /// wide) triples.
    pub fn set_month_names(&mut self, names: Vec<(String, String, String)>) {
        Arc::make_mut(&mut self.base).months = names;
    }

    /// Register (or replace) a locale under its own tag.
    pub fn register_locale(&mut self, locale: Locale) {
        let key = locale::normalize_tag(&locale.tag);
        self.locales.insert(key, Arc::new(locale));
    }

    /// Register a digit-shaping system for a `[$-xxyyzzzz]` numeral id.
    pub fn register_numerals(&mut self, id: u8, numerals: Numerals) {
        self.numerals.insert(id, numerals);
    }

    pub(crate) fn numerals_lookup(&self, id: u8) -> Option<Numerals> {
        self.numerals
            .get(&id)
            .cloned()
            .or_else(|| locale::builtin_numerals(id))
    }

    fn locale_by_tag(&self, tag: &str) -> Option<Arc<Locale>> {
        let key = locale::normalize_tag(tag);
        if let Some(l) = self.locales.get(&key) {
            return Some(l.clone());
        }
        if let Some(l) = self.cache.get(&key) {
            return Some(l);
        }
        let l = Arc::new(locale::builtin(&key)?);
        self.cache.put(key, l.clone());
        Some(l)
    }

    fn locale_by_lcid(&self, lcid: u32) -> Option<Arc<Locale>> {
        locale::tag_for_lcid(lcid).and_then(|t| self.locale_by_tag(t))
    }

    fn resolve_ref(&self, fref: &FormatRef<'_>) -> String {
        match fref {
            FormatRef::Id(id) => {
                if *id == 14 {
                    if let Some(nf) = &self.opts.date_nf {
                        return nf.clone();
                    }
                }
                self.table.resolve(*id).to_string()
            }
            FormatRef::Code(s) => {
                if *s == "m/d/yy" || *s == "m/d/yyyy" {
                    if let Some(nf) = &self.opts.date_nf {
                        return nf.clone();
                    }
                }
                if CATEGORY_TITLES.contains(s) {
                    if let Ok(f) = self.get_format(s, &CategorySpec::default()) {
                        return f;
                    }
                }
                s.to_string()
            }
        }
    }

    fn begin(&self, ropts: &RenderOptions) -> Result<Render<'_>, FormatError> {
        let base = match &ropts.locale {
            Some(tag) => match self.locale_by_tag(tag) {
                Some(l) => l,
                None => {
                    let err = FormatError::UnknownLocale(tag.clone());
                    match self.opts.errors {
                        ErrorPolicy::Raise => return Err(err),
                        ErrorPolicy::Warn => {
                            tracing::warn!(error = %err, "using the engine locale instead");
                            self.base.clone()
                        }
                        _ => self.base.clone(),
                    }
                }
            },
            None => self.base.clone(),
        };
        let mut fmtl = (*base).clone();
        if let Some(d) = &self.opts.decimal_separator {
            fmtl.decimal_point = d.clone();
        }
        if let Some(t) = &self.opts.thousands_separator {
            fmtl.thousands_sep = t.clone();
        }
        if let Some(d) = &ropts.decimal_separator {
            fmtl.decimal_point = d.clone();
        }
        if let Some(t) = &ropts.thousands_separator {
            fmtl.thousands_sep = t.clone();
        }
        Ok(Render {
            eng: self,
            fmtl,
            tmpl: base,
            width: ropts.width.or(self.opts.default_width),
            align: ropts.align,
            policy: self.opts.errors,
            pound: false,
            dbnum: None,
            numerals: None,
        })
    }

    #[cfg(feature = "chrono")]
    fn serial_of(&self, value: &Value) -> Option<f64> {
        use chrono::{Datelike, Timelike};
        fn day_fraction(t: &chrono::NaiveTime) -> f64 {
            (t.num_seconds_from_midnight() as f64 + t.nanosecond() as f64 / 1e9) / 86_400.0
        }
        match value {
            Value::DateTime(dt) => {
                let d = dt.date();
                Some(crate::date_serial::encode_serial(
                    d.year(),
                    d.month(),
                    d.day(),
                    day_fraction(&dt.time()),
                    self.opts.date_system,
                ))
            }
            Value::Date(d) => Some(crate::date_serial::encode_serial(
                d.year(),
                d.month(),
                d.day(),
                0.0,
                self.opts.date_system,
            )),
            Value::Time(t) => Some(day_fraction(t)),
            Value::Duration(d) => Some(d.num_milliseconds() as f64 / 86_400_000.0),
            _ => None,
        }
    }
}

/// Tags a resolved output piece. Placeholder pieces (`Num`, `Den`, `Slash`,
/// `FracMark`) stay live until redistribution rewrites them to `Lit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Lit,
    Text,
    Space,
    Num,
    Den,
    Slash,
    /// Marks where the integer part of a mixed fraction ends.
    FracMark,
    Gen,
    Year,
    Mon,
    Day,
    /// An hour run before the meridiem pass decides 12h vs 24h.
    HrRaw,
    Hr12,
    Hr24,
    Min,
    Sec,
    Era,
    Bud,
    EraG,
    Abs,
    Meridiem,
    Fill,
}

#[derive(Debug, Clone)]
struct Piece {
    tag: Tag,
    text: String,
}

impl Piece {
    fn new(tag: Tag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

fn is_date_tag(t: Tag) -> bool {
    matches!(
        t,
        Tag::Year
            | Tag::Mon
            | Tag::Day
            | Tag::HrRaw
            | Tag::Hr12
            | Tag::Hr24
            | Tag::Min
            | Tag::Sec
            | Tag::Era
            | Tag::Bud
            | Tag::EraG
            | Tag::Abs
    )
}

/// Per-call rendering state.
pub(crate) struct Render<'e> {
    eng: &'e Formatter,
    /// Locale for numeric separators, possibly overridden per call.
    fmtl: Locale,
    /// Locale for names and templates, switched by `[$-lcid]` tags.
    tmpl: Arc<Locale>,
    width: Option<usize>,
    align: Option<Align>,
    policy: ErrorPolicy,
    pound: bool,
    dbnum: Option<u8>,
    numerals: Option<u8>,
}

impl<'e> Render<'e> {
    /// Route a recoverable error through the engine policy.
    pub(crate) fn soft(&mut self, err: FormatError) -> Result<(), FormatError> {
        match self.policy {
            ErrorPolicy::Raise => Err(err),
            ErrorPolicy::Warn => {
                tracing::warn!(error = %err, "recovered while formatting");
                Ok(())
            }
            ErrorPolicy::Ignore => Ok(()),
            ErrorPolicy::Pounds => {
                self.pound = true;
                Ok(())
            }
        }
    }

    /// Evaluate one section against a value.
    fn eval_fmt(
        &mut self,
        fmt: &str,
        value: &Value,
        flen: usize,
    ) -> Result<String, FormatError> {
        let (toks, errs) = tokenize(fmt);
        for e in errs {
            self.soft(e)?;
        }
        let mut queue: std::collections::VecDeque<RawToken> = toks.into();

        let mut v = value.as_number().unwrap_or(0.0);
        let is_text_val = matches!(value, Value::Text(_));
        let is_bool = matches!(value, Value::Bool(_));
        let text_of = || match value {
            Value::Text(s) => s.to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Number(n) => to_str(*n),
            _ => String::new(),
        };

        let mut pieces: Vec<Piece> = Vec::new();
        let mut hijri = false;
        let mut meridiem = false;
        let mut has_date = false;
        let mut color: Option<String> = None;
        let mut last_date = '\0';

        while let Some(tok) = queue.pop_front() {
            match tok {
                RawToken::General => pieces.push(Piece::new(Tag::Gen, "General")),
                RawToken::Literal(s) => pieces.push(Piece::new(Tag::Lit, s)),
                RawToken::Space => pieces.push(Piece::new(Tag::Space, " ")),
                RawToken::TextValue => pieces.push(Piece::new(Tag::Text, text_of())),
                RawToken::Paren(c) => pieces.push(Piece::new(Tag::Lit, c.to_string())),
                RawToken::Calendar(n) => {
                    if n == 2 {
                        hijri = true;
                    }
                }
                RawToken::DateRun(c, n) => {
                    has_date = true;
                    let run: String = std::iter::repeat(c).take(n).collect();
                    let tag = match c {
                        'y' if last_date == 'g' => Tag::Era,
                        'y' => Tag::Year,
                        'm' if last_date == 'h' => Tag::Min,
                        'm' => Tag::Mon,
                        'd' => Tag::Day,
                        'h' => Tag::HrRaw,
                        's' => Tag::Sec,
                        'e' => Tag::Era,
                        'g' => Tag::EraG,
                        _ => Tag::Bud,
                    };
                    last_date = c;
                    pieces.push(Piece::new(tag, run));
                }
                RawToken::AmPm => {
                    meridiem = true;
                    has_date = true;
                    pieces.push(Piece::new(Tag::Meridiem, "AM/PM"));
                }
                RawToken::AmPmCjk => {
                    meridiem = true;
                    has_date = true;
                    pieces.push(Piece::new(Tag::Meridiem, "上午/下午"));
                }
                RawToken::AmPmShort(s) => {
                    meridiem = true;
                    has_date = true;
                    pieces.push(Piece::new(Tag::Meridiem, s));
                }
                RawToken::AbsTime(s) => {
                    has_date = true;
                    // An `m` run after `[hh]` is minutes, same as after a
                    // plain hour run.
                    last_date = s.chars().next().unwrap_or('\0');
                    pieces.push(Piece::new(Tag::Abs, format!("[{}]", s)));
                }
                RawToken::SubSecond(n) => {
                    has_date = true;
                    pieces.push(Piece::new(Tag::Sec, format!(".{}", "0".repeat(n))));
                }
                RawToken::LocaleTag {
                    symbol,
                    lcid,
                    numerals,
                } => {
                    if let Some(id) = numerals {
                        self.numerals = Some(id);
                    }
                    match lcid {
                        // System long date / time: the rest of the code is
                        // discarded and the locale template spliced in.
                        Some(0xF800) => {
                            queue.clear();
                            let (t, errs) = tokenize(&self.tmpl.long_date_format.clone());
                            for e in errs {
                                self.soft(e)?;
                            }
                            queue.extend(t);
                        }
                        Some(0xF400) => {
                            queue.clear();
                            let (t, errs) = tokenize(&self.tmpl.time_format.clone());
                            for e in errs {
                                self.soft(e)?;
                            }
                            queue.extend(t);
                        }
                        Some(l) if l != 0 => match self.eng.locale_by_lcid(l) {
                            Some(loc) => self.tmpl = loc,
                            None => {
                                self.soft(FormatError::UnknownLocale(format!("{:04x}", l)))?
                            }
                        },
                        _ => {}
                    }
                    if let Some(sym) = symbol {
                        if !fmt_is_date(fmt) {
                            pieces.push(Piece::new(Tag::Lit, sym));
                        }
                    }
                }
                RawToken::DbNum(n) => self.dbnum = Some(n),
                RawToken::Color(name) => {
                    if self.eng.opts.color_pre.is_some() {
                        color = Some(title_case(&name));
                    }
                }
                RawToken::Condition { op, operand } => {
                    if negcond(&op, operand) {
                        v = v.abs();
                    }
                }
                RawToken::NumRun(s) => pieces.push(Piece::new(Tag::Num, s)),
                RawToken::DenRun(s) => pieces.push(Piece::new(Tag::Den, s)),
                RawToken::Slash => pieces.push(Piece::new(Tag::Slash, "/")),
                RawToken::Percent => {
                    v *= 100.0;
                    pieces.push(Piece::new(Tag::Lit, self.fmtl.percent_sign.clone()));
                }
                RawToken::Fill(c) => {
                    if self.width.is_some() {
                        pieces.push(Piece::new(Tag::Fill, c.to_string()));
                    } else if c != ' ' && c != '*' {
                        pieces.push(Piece::new(Tag::Lit, c.to_string()));
                    }
                }
            }
        }

        // Default alignment: text fills to the right (left-aligned), numbers
        // to the left (right-aligned), booleans center later.
        if self.width.is_some() {
            let has_fill = pieces.iter().any(|p| p.tag == Tag::Fill);
            if self.align != Some(Align::Center) {
                if (self.align == Some(Align::Left)
                    || (is_text_val && self.align != Some(Align::Right)))
                    && !has_fill
                {
                    pieces.push(Piece::new(Tag::Fill, " "));
                } else if !is_bool || self.align == Some(Align::Right) {
                    pieces.insert(0, Piece::new(Tag::Fill, " "));
                }
            }
        }

        // Backward pass: hour style, sub-second precision, the smallest time
        // unit present (`bt`: 1 hour, 2 minute, 3 second), elapsed-time mode
        // and the months/minutes disambiguation against the following token.
        let mut ss0 = 0usize;
        let mut bt = 0u8;
        let mut elapsed = false;
        let mut lst = '\0';
        for p in pieces.iter_mut().rev() {
            match p.tag {
                Tag::HrRaw => {
                    p.tag = if meridiem { Tag::Hr12 } else { Tag::Hr24 };
                    bt = bt.max(1);
                    lst = 'h';
                }
                Tag::Sec => {
                    if let Some(z) = p.text.strip_prefix('.') {
                        ss0 = ss0.max(z.len());
                    } else {
                        lst = 's';
                    }
                    bt = bt.max(3);
                }
                Tag::Abs => {
                    elapsed = true;
                    bt = bt.max(1);
                }
                Tag::Mon => {
                    if lst == 's' {
                        p.tag = Tag::Min;
                        bt = bt.max(2);
                        lst = 'M';
                    } else {
                        lst = 'm';
                    }
                }
                Tag::Day => lst = 'd',
                Tag::Year => lst = 'y',
                Tag::Era => lst = 'e',
                Tag::Min => {
                    bt = bt.max(2);
                    lst = 'M';
                }
                _ => {}
            }
        }

        // Decode the serial once for the whole section.
        let mut parts_opt: Option<DateParts> = None;
        if has_date {
            if !matches!(value, Value::Number(_)) {
                return Ok(pounds(self.width));
            }
            if v < 0.0 && !elapsed {
                return Ok(pounds(self.width));
            }
            let mut parts =
                match decode_serial(v, self.eng.opts.date_system, hijri, elapsed) {
                    Some(p) => p,
                    None => return Ok(pounds(self.width)),
                };
            if bt != 0 {
                // Round the residue at the section's sub-second precision.
                parts.subsec = round_half_away(parts.subsec, ss0 as i32);
                if parts.subsec.abs() >= 1.0 {
                    // The rounded fraction spills into the clock fields;
                    // rebuild the serial and decode again.
                    let total = (((parts.days * 24 + parts.hour) * 60 + parts.minute) * 60
                        + parts.second) as f64
                        + parts.subsec;
                    v = total / 86_400.0;
                    parts = match decode_serial(v, self.eng.opts.date_system, hijri, elapsed)
                    {
                        Some(p) => p,
                        None => return Ok(pounds(self.width)),
                    };
                }
            }
            parts_opt = Some(parts);
        }

        // Resolve pass.
        let mut nstr = String::new();
        let mut num_written = false;
        let mut is_number = false;
        let mut i = 0usize;
        while i < pieces.len() {
            let tag = pieces[i].tag;
            if is_date_tag(tag) || tag == Tag::Meridiem {
                let parts = match &parts_opt {
                    Some(p) => p.clone(),
                    None => {
                        i += 1;
                        continue;
                    }
                };
                if tag == Tag::Meridiem {
                    let pm = parts.hour >= 12;
                    let marker = pieces[i].text.clone();
                    pieces[i].text = match marker.as_str() {
                        "AM/PM" => {
                            if pm {
                                self.tmpl.pm.clone()
                            } else {
                                self.tmpl.am.clone()
                            }
                        }
                        "上午/下午" => {
                            if pm { "下午" } else { "上午" }.to_string()
                        }
                        short => {
                            let letter = if pm {
                                short.chars().nth(2)
                            } else {
                                short.chars().next()
                            };
                            let base = if pm {
                                self.tmpl.p.clone()
                            } else {
                                self.tmpl.a.clone()
                            };
                            if letter.map_or(false, |c| c.is_lowercase()) {
                                base.to_lowercase()
                            } else {
                                base.to_uppercase()
                            }
                        }
                    };
                } else {
                    let t = match tag {
                        Tag::Year => 'y',
                        Tag::Mon => 'm',
                        Tag::Day => 'd',
                        Tag::Hr12 => 'h',
                        Tag::Hr24 | Tag::HrRaw => 'H',
                        Tag::Min => 'M',
                        Tag::Sec => 's',
                        Tag::Era => 'e',
                        Tag::Bud => 'b',
                        Tag::EraG => 'g',
                        _ => 'Z',
                    };
                    let run = pieces[i].text.clone();
                    let run_len = run.chars().count();
                    let s = self.write_date(t, &run, &parts, ss0)?;
                    // Four-digit years read positionally even under power
                    // numbering (2008 is 二〇〇八, not 二千八).
                    let date_ctx = !(t == 'y' && run_len == 4);
                    pieces[i].text = self.replace_numbers(&s, date_ctx, false);
                }
                pieces[i].tag = Tag::Lit;
                num_written = true;
                is_number = true;
                i += 1;
                continue;
            }
            match tag {
                Tag::Gen => {
                    let myv = if v < 0.0 && flen > 1 { -v } else { v };
                    let s = match value {
                        Value::Text(s) => s.to_string(),
                        Value::Bool(true) => "TRUE".to_string(),
                        Value::Bool(false) => "FALSE".to_string(),
                        _ => self.general_num(myv, None),
                    };
                    pieces[i].text = self.replace_numbers(&s, false, true);
                    pieces[i].tag = Tag::Lit;
                    num_written = true;
                    is_number = true;
                }
                Tag::Num | Tag::Den => {
                    nstr.push_str(&pieces[i].text.clone());
                }
                Tag::Slash => {
                    if let Some(j) = (0..i).rev().find(|&j| pieces[j].tag == Tag::Num) {
                        let lv = pieces[j].text.len();
                        let cut = nstr.len() - lv;
                        nstr = format!("{}:{}", &nstr[..cut], &nstr[cut..]);
                        nstr.push('/');
                        pieces.insert(j, Piece::new(Tag::FracMark, ""));
                        i += 1;
                    } else {
                        pieces[i].tag = Tag::Lit;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        if !nstr.is_empty() {
            num_written = true;
            is_number = true;
            let ostr = if is_bool {
                if v != 0.0 { "TRUE".to_string() } else { "FALSE".to_string() }
            } else {
                let myv = if v < 0.0 && flen > 1 { -v } else { v };
                let mut o = self.write_num(&nstr, myv)?;
                // A leading literal (a currency symbol, usually) pulls the
                // sign in front of itself.
                if myv < 0.0 && pieces.first().map_or(false, |p| p.tag == Tag::Lit) {
                    let minus = self.fmtl.minus_sign.clone();
                    if let Some(rest) = o.strip_prefix(minus.as_str()) {
                        o = rest.to_string();
                        pieces[0].text = format!("{}{}", minus, pieces[0].text);
                    }
                }
                self.replace_numbers(&o, false, false)
            };
            let dpc = self.fmtl.decimal_point.chars().next().unwrap_or('.');
            redistribute(&mut pieces, &ostr, dpc);
        }

        if !num_written && v < 0.0 && flen == 1 {
            pieces.insert(0, Piece::new(Tag::Lit, self.fmtl.minus_sign.clone()));
        }

        // Width pass: pad through fill pieces or centering, then overflow.
        let body: String = pieces
            .iter()
            .filter(|p| p.tag != Tag::Fill)
            .map(|p| p.text.as_str())
            .collect();
        let mut result = match self.width {
            None => body,
            Some(w) => {
                let blen = body.chars().count();
                let has_fill = pieces.iter().any(|p| p.tag == Tag::Fill);
                let want_center = (is_bool && self.align.is_none())
                    || self.align == Some(Align::Center);
                let mut out = if want_center && !has_fill {
                    general::center(&body, w)
                } else {
                    let delta = w.saturating_sub(blen);
                    if let Some(last) = pieces.iter().rposition(|p| p.tag == Tag::Fill) {
                        let ch = pieces[last].text.chars().next().unwrap_or(' ');
                        for (idx, p) in pieces.iter_mut().enumerate() {
                            if p.tag == Tag::Fill {
                                p.text = if idx == last {
                                    fill(ch, delta)
                                } else {
                                    String::new()
                                };
                            }
                        }
                    }
                    pieces.iter().map(|p| p.text.as_str()).collect()
                };
                if is_number && out.chars().count() > w {
                    out = pounds(Some(w));
                }
                out
            }
        };

        if let (Some(name), Some(pre)) = (&color, &self.eng.opts.color_pre) {
            let rgb = color_rgb(name);
            let mut s = pre.replace("{rgb}", rgb).replace("{}", name);
            s.push_str(&result);
            if let Some(post) = &self.eng.opts.color_post {
                s.push_str(&post.replace("{rgb}", rgb).replace("{}", name));
            }
            result = s;
        }
        Ok(result)
    }
}

/// Spread a rendered digit string back across the placeholder pieces.
///
/// Three shapes: plain integers (and fractions) align from the right,
/// decimals align on the point and then flow outward, exponentials land in
/// the first placeholder piece whole.
fn redistribute(pieces: &mut Vec<Piece>, ostr: &str, dpc: char) {
    fn participant(t: Tag) -> bool {
        matches!(t, Tag::Num | Tag::Den | Tag::Slash | Tag::FracMark)
    }
    let ochars: Vec<char> = ostr.chars().collect();
    let has_exp = ochars.contains(&'E');
    let decpt = pieces
        .iter()
        .position(|p| participant(p.tag) && p.text.contains('.'));
    let dpos = ochars.iter().position(|&c| c == dpc);

    if !has_exp && decpt.is_none() {
        let mut jj: i64 = ochars.len() as i64 - 1;
        let mut lasti: Option<usize> = None;
        for i in (0..pieces.len()).rev() {
            if !participant(pieces[i].tag) {
                continue;
            }
            let plen = match pieces[i].tag {
                Tag::FracMark => 1i64,
                _ => pieces[i].text.chars().count() as i64,
            };
            if jj + 1 >= plen {
                let start = (jj + 1 - plen) as usize;
                pieces[i].text = ochars[start..(jj + 1) as usize].iter().collect();
                jj -= plen;
            } else if jj < 0 {
                pieces[i].text = String::new();
            } else {
                pieces[i].text = ochars[..(jj + 1) as usize].iter().collect();
                jj = -1;
            }
            if pieces[i].tag == Tag::FracMark && pieces[i].text == ":" {
                pieces[i].text.clear();
            }
            pieces[i].tag = Tag::Lit;
            lasti = Some(i);
        }
        if jj >= 0 {
            if let Some(li) = lasti {
                let head: String = ochars[..(jj + 1) as usize].iter().collect();
                pieces[li].text = format!("{}{}", head, pieces[li].text);
            }
        }
    } else if let (Some(decpt), Some(dpos), false) = (decpt, dpos, has_exp) {
        // The rendered text already carries the locale's separators, so the
        // integer side moves as a unit: right-aligned over the placeholder
        // pieces, with the leftmost one absorbing any overflow.
        let tchars: Vec<char> = pieces[decpt].text.chars().collect();
        let split = tchars
            .iter()
            .position(|&c| c == '.')
            .unwrap_or(tchars.len());
        let int_out = &ochars[..dpos];
        let frac_out = &ochars[dpos + 1..];

        let mut jj: i64 = int_out.len() as i64;
        let mut lasti: Option<usize> = None;
        let mut dec_int = String::new();
        for i in (0..=decpt).rev() {
            if !matches!(pieces[i].tag, Tag::Num | Tag::Den) {
                continue;
            }
            let plen = if i == decpt {
                split as i64
            } else {
                pieces[i].text.chars().count() as i64
            };
            let end = jj.max(0) as usize;
            let start = (jj - plen).max(0) as usize;
            let seg: String = int_out[start..end].iter().collect();
            jj -= plen;
            if i == decpt {
                dec_int = seg;
            } else {
                pieces[i].text = seg;
                pieces[i].tag = Tag::Lit;
            }
            lasti = Some(i);
        }
        if jj > 0 {
            let head: String = int_out[..jj as usize].iter().collect();
            match lasti {
                Some(li) if li != decpt => {
                    pieces[li].text = format!("{}{}", head, pieces[li].text);
                }
                _ => dec_int = format!("{}{}", head, dec_int),
            }
        }

        // Fraction side: left to right into the remaining placeholder slots.
        let mut kk = 0usize;
        for i in decpt..pieces.len() {
            if !matches!(pieces[i].tag, Tag::Num | Tag::Den) {
                continue;
            }
            let slots = if i == decpt {
                tchars.len().saturating_sub(split + 1)
            } else {
                pieces[i].text.chars().count()
            };
            let end = (kk + slots).min(frac_out.len());
            let seg: String = frac_out[kk..end].iter().collect();
            kk = end;
            if i == decpt {
                pieces[i].text = format!("{}{}{}", dec_int, dpc, seg);
            } else {
                pieces[i].text = seg;
            }
            pieces[i].tag = Tag::Lit;
        }
    } else {
        let mut first = true;
        for p in pieces.iter_mut() {
            if !participant(p.tag) {
                continue;
            }
            p.text = if first {
                ostr.to_string()
            } else {
                String::new()
            };
            p.tag = Tag::Lit;
            first = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(code: &str, v: f64) -> String {
        Formatter::default().format(code, v)
    }

    #[test]
    fn plain_numbers() {
        assert_eq!(fmt("0", 1.5), "2");
        assert_eq!(fmt("0.00", 1.5), "1.50");
        assert_eq!(fmt("#,##0", 1234567.0), "1,234,567");
        assert_eq!(fmt("0.0", -2.35), "-2.4");
    }

    #[test]
    fn currency_symbol_precedes_the_sign() {
        assert_eq!(fmt("\"$\"#,##0.00", 1234.5), "$1,234.50");
        assert_eq!(fmt("\"$\"#,##0.00", -1234.5), "-$1,234.50");
    }

    #[test]
    fn sign_sections_suppress_the_automatic_minus() {
        assert_eq!(fmt("0.0;(0.0)", -2.0), "(2.0)");
        assert_eq!(fmt("0;-0;\"ZERO\"", 0.0), "ZERO");
    }

    #[test]
    fn percent_scales() {
        assert_eq!(fmt("0.0%", 0.125), "12.5%");
    }

    #[test]
    fn mixed_fractions() {
        assert_eq!(fmt("# ?/?", 3.25), "3 1/4");
        assert_eq!(fmt("# ?/?", 3.0), "3    ");
        assert_eq!(fmt("0 ?/12", 0.25), "0 3/12");
    }

    #[test]
    fn dates_resolve_minutes_between_hours_and_seconds() {
        assert_eq!(fmt("yyyy-mm-dd", 43_880.0), "2020-02-19");
        assert_eq!(fmt("h:mm:ss", 0.5), "12:00:00");
        assert_eq!(fmt("mm:ss", 0.5), "00:00");
        assert_eq!(fmt("h:mm AM/PM", 0.75), "6:00 PM");
    }

    #[test]
    fn elapsed_time_crosses_day_boundaries() {
        assert_eq!(fmt("[hh]:mm:ss", 1.5), "36:00:00");
        assert_eq!(fmt("[mm]", 0.5), "720");
    }

    #[test]
    fn negative_dates_pound_out() {
        assert_eq!(fmt("yyyy-mm-dd", -1.0), "##########");
    }

    #[test]
    fn text_section_receives_text() {
        let f = Formatter::default();
        assert_eq!(f.format("0.00;\"neg\";\"zero\";\"txt: \"@", "hi"), "txt: hi");
        assert_eq!(f.format("0.00", "hi"), "hi");
    }

    #[test]
    fn general_ids_and_codes() {
        let f = Formatter::default();
        assert_eq!(f.format(0u32, 1234.0), "1234");
        assert_eq!(f.format("General", 0.5), "0.5");
        assert_eq!(f.format(14u32, 43_880.0), "2/19/2020");
    }

    #[test]
    fn locale_tag_switches_names() {
        assert_eq!(fmt("[$-407]mmmm", 43_880.0), "Februar");
    }

    #[test]
    fn long_date_template_splice() {
        assert_eq!(fmt("[$-F800]dddd, mmmm dd, yyyy", 43_880.0), "Wednesday, February 19, 2020");
    }

    #[test]
    fn colors_are_dropped_unless_configured() {
        assert_eq!(fmt("[Red]0", 5.0), "5");
        let f = Formatter::new(FormatOptions {
            color_pre: Some("<{}:{rgb}>".into()),
            color_post: Some("</>".into()),
            ..FormatOptions::default()
        });
        assert_eq!(f.format("[Red]0", 5.0), "<Red:FF0000>5</>");
    }

    #[test]
    fn get_format_categories() {
        let f = Formatter::default();
        let spec = CategorySpec::default();
        assert_eq!(f.get_format("Number", &spec).unwrap(), "0.00");
        assert_eq!(f.get_format("Percentage", &spec).unwrap(), "0.00%");
        assert_eq!(f.get_format("Text", &spec).unwrap(), "@");
        assert_eq!(
            f.get_format("Currency", &spec).unwrap(),
            "\"$\"#,##0.00_);(\"$\"#,##0.00)"
        );
        assert!(f
            .get_format("Accounting", &spec)
            .unwrap()
            .starts_with("_(\"$\"*"));
        assert!(matches!(
            f.get_format(
                "Fraction",
                &CategorySpec {
                    denominator: Some(0),
                    ..CategorySpec::default()
                }
            ),
            Err(FormatError::ZeroDenominator)
        ));
    }

    #[test]
    fn width_pads_and_pounds() {
        let f = Formatter::default();
        let w = RenderOptions::width(8);
        assert_eq!(f.format_with("0.00", 1.5, &w), "    1.50");
        assert_eq!(f.format_with("0.00", 123456789.0, &w), "########");
    }

    #[test]
    fn fill_characters_absorb_the_slack() {
        let f = Formatter::default();
        let w = RenderOptions::width(8);
        assert_eq!(f.format_with("0.0*x", 1.5, &w), "1.5xxxxx");
    }
}
