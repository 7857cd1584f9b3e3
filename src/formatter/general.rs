//! The `General` format: the display-width-aware default rendering.
//!
//! General mimics the classic spreadsheet behavior: up to 11 characters of
//! precision, switching between fixed and exponential notation based on the
//! magnitude and the available cell width, then trimming cosmetic zeros.

use crate::error::FormatError;
use crate::math::{fill, pad_sp, pounds, round_half_away, rpad_sp, to_exponential, to_precision, to_str};
use crate::options::Align;
use crate::value::Value;

use super::Render;

/// Drop a trailing run of decimal zeros (`1.500` -> `1.5`, `2.000` -> `2`).
pub(super) fn strip_decimal(o: &str) -> String {
    let p = match o.rfind('.') {
        Some(p) => p,
        None => return o.to_string(),
    };
    let tail = &o[p + 1..];
    if !tail.chars().all(|c| c.is_ascii_digit()) {
        return o.to_string();
    }
    if tail.chars().all(|c| c == '0') {
        return o[..p].to_string();
    }
    let trimmed = tail.trim_end_matches('0');
    format!("{}.{}", &o[..p], trimmed)
}

/// Trim mantissa zeros before the exponent and widen one-digit exponents.
pub(super) fn normalize_exp(o: &str) -> String {
    let e = match o.find(['E', 'e']) {
        Some(e) => e,
        None => return o.to_string(),
    };
    let mant = strip_decimal(&o[..e]);
    let mut out = format!("{}{}", mant, &o[e..]);
    let oc: Vec<char> = out.chars().collect();
    if oc.len() >= 3
        && oc[oc.len() - 1].is_ascii_digit()
        && matches!(oc[oc.len() - 2], '+' | '-')
        && matches!(oc[oc.len() - 3], 'E' | 'e')
    {
        let last = oc[oc.len() - 1];
        out.truncate(out.len() - 1);
        out.push('0');
        out.push(last);
    }
    out
}

pub(super) fn center(s: &str, w: usize) -> String {
    let ls = s.chars().count();
    if ls >= w {
        return s.to_string();
    }
    rpad_sp(&pad_sp(s, ls + (w - ls + 1) / 2), w)
}

impl<'e> Render<'e> {
    pub(super) fn align_it(&self, s: &str, default: Align) -> String {
        let w = match self.width {
            Some(w) => w,
            None => return s.to_string(),
        };
        if s.chars().count() >= w {
            return s.to_string();
        }
        match self.align.unwrap_or(default) {
            Align::Left => rpad_sp(s, w),
            Align::Right => pad_sp(s, w),
            Align::Center => center(s, w),
        }
    }

    /// General for a whole value, including width fitting and alignment.
    pub(super) fn general_value(
        &mut self,
        value: &Value,
        text_fmt: bool,
    ) -> Result<String, FormatError> {
        match value {
            Value::Text(s) => Ok(self.align_it(s, Align::Left)),
            Value::Bool(b) => {
                let s = if *b { "TRUE" } else { "FALSE" };
                if let Some(w) = self.width {
                    if w < s.len() {
                        return Ok(pounds(Some(w)));
                    }
                }
                Ok(self.align_it(s, Align::Center))
            }
            Value::Empty => Ok(fill(' ', self.width.unwrap_or(0))),
            Value::Number(v) => {
                if *v == v.trunc() && v.abs() <= 2_147_483_647.0 {
                    let s = to_str(*v);
                    if self.width.map_or(true, |w| s.chars().count() <= w) {
                        let d = if text_fmt { Align::Left } else { Align::Right };
                        return Ok(self.align_it(&s, d));
                    }
                }
                let s = self.general_num(*v, self.width);
                Ok(self.align_it(&s, Align::Right))
            }
            #[cfg(feature = "chrono")]
            _ => Err(FormatError::UnsupportedValue(value.type_name())),
        }
    }

    /// General for a bare number, localized.
    pub(super) fn general_num(&self, v: f64, width: Option<usize>) -> String {
        let mut o = self.general_num_ascii(v, width);
        if let Some(w) = width {
            if o.chars().count() > w {
                o = fill('#', w);
            }
        }
        let mut out = String::new();
        for c in o.chars() {
            match c {
                '.' => out.push_str(&self.fmtl.decimal_point),
                'E' => out.push_str(&self.fmtl.exponential),
                '-' => out.push_str(&self.fmtl.minus_sign),
                '+' => out.push_str(&self.fmtl.plus_sign),
                _ => out.push(c),
            }
        }
        out
    }

    fn general_num_ascii(&self, v: f64, width: Option<usize>) -> String {
        if v == 0.0 {
            return "0".to_string();
        }
        if !v.is_finite() {
            return to_str(v);
        }
        let sign = (v < 0.0) as usize;
        let vf = v.abs().log10().floor() as i64;
        let raw = if (-4..=-1).contains(&vf) {
            let mut p = 10 + vf;
            if let Some(w) = width {
                p = (w as i64 - sign as i64 - 1 + vf).clamp(1, 10 + vf);
            }
            let o = to_precision(v, p.max(1) as usize);
            if width.map_or(false, |w| o.chars().count() > w) {
                self.small_exp(v, width)
            } else {
                o
            }
        } else if vf.abs() <= 9 {
            self.small_exp(v, width)
        } else if vf == 10 && width.map_or(true, |w| w >= 12) {
            format!("{:.10}", v).chars().take(12).collect()
        } else {
            self.large_exp(v, width)
        };
        strip_decimal(&normalize_exp(&raw.to_ascii_uppercase()))
    }

    /// Magnitudes that usually fit in 11 characters.
    fn small_exp(&self, v: f64, width: Option<usize>) -> String {
        let sign = (v < 0.0) as usize;
        let w = 11 + sign;
        let (p, ep) = match width {
            Some(wid) if wid < w => {
                let p = (wid as i64 - 1 - sign as i64).clamp(1, 10) as usize;
                let ep_o = wid as i64 - 6 - sign as i64;
                if ep_o < 0 {
                    let av = v.abs();
                    if av < 0.5 {
                        return if v < 0.0 { "-0".into() } else { "0".into() };
                    }
                    if av < 9.5 {
                        return to_str(round_half_away(v, 0));
                    }
                    (p, 0usize)
                } else {
                    (p, ep_o as usize)
                }
            }
            _ => (10usize, 5usize),
        };
        let limit = width.map(|x| x.min(w)).unwrap_or(w);
        let o = strip_decimal(&format!("{:.12}", v));
        if o.chars().count() <= limit {
            return o;
        }
        let o = to_precision(v, p);
        if o.chars().count() <= limit {
            return o;
        }
        to_exponential(v, ep)
    }

    /// Magnitudes past ten digits.
    fn large_exp(&self, v: f64, width: Option<usize>) -> String {
        let sign = (v < 0.0) as usize;
        let w = 11 + sign;
        let o = strip_decimal(&format!("{:.11}", v));
        if o.chars().count() > w || o == "0" || o == "-0" {
            let p = width
                .map(|x| (x as i64 - 5 - sign as i64).clamp(1, 6) as usize)
                .unwrap_or(6);
            to_precision(v, p)
        } else {
            o
        }
    }
}
