//! Numeric plumbing shared by the renderers.
//!
//! Formatting semantics follow the spreadsheet lineage, which means
//! JavaScript-style arithmetic in a few places: rounding is half away from
//! zero (never banker's), and `to_precision`/`to_exponential` emulate
//! `Number.prototype.toPrecision`/`toExponential` including their choice of
//! fixed vs. exponential form and unpadded exponents.

/// Round half away from zero at the given decimal place.
pub fn round_half_away(v: f64, places: i32) -> f64 {
    let place = 10f64.powi(places);
    let adj = if v >= 0.0 { 0.5 } else { -0.5 };
    (v * place + adj).trunc() / place
}

/// Round to `p` significant digits, half away from zero.
pub(crate) fn round_to_precision(v: f64, p: usize) -> f64 {
    if v == 0.0 {
        return 0.0;
    }
    let np = v.abs().log10().floor() as i32 + 1;
    round_half_away(v, p as i32 - np)
}

/// Stringify like a dynamic language would: integral floats lose the decimal.
pub(crate) fn to_str(v: f64) -> String {
    format!("{}", v)
}

pub(crate) fn fill(c: char, n: usize) -> String {
    std::iter::repeat(c).take(n).collect()
}

pub(crate) fn pad0(t: &str, d: usize) -> String {
    if t.len() >= d {
        t.to_string()
    } else {
        format!("{}{}", fill('0', d - t.len()), t)
    }
}

pub(crate) fn pad_sp(t: &str, d: usize) -> String {
    if t.chars().count() >= d {
        t.to_string()
    } else {
        format!("{}{}", fill(' ', d - t.chars().count()), t)
    }
}

pub(crate) fn rpad_sp(t: &str, d: usize) -> String {
    if t.chars().count() >= d {
        t.to_string()
    } else {
        format!("{}{}", t, fill(' ', d - t.chars().count()))
    }
}

/// Round to an integer and zero-pad to `d` characters.
pub(crate) fn pad0r(v: f64, d: usize) -> String {
    pad0(&to_str(round_half_away(v, 0)), d)
}

pub(crate) fn pounds(width: Option<usize>) -> String {
    fill('#', width.unwrap_or(10))
}

/// Backfill for unconsumed digit placeholders: `0` prints a zero, `?` a
/// space, `#` nothing; everything else passes through.
pub(crate) fn hashq(fmt: &str) -> String {
    let mut o = String::new();
    for c in fmt.chars() {
        match c {
            '#' => {}
            '?' => o.push(' '),
            '0' => o.push('0'),
            _ => o.push(c),
        }
    }
    o
}

/// Emulates JavaScript `v.toPrecision(p)`: exactly `p` significant digits,
/// exponential form when the exponent is below -6 or at least `p`, lowercase
/// `e` with a sign and no zero padding.
pub(crate) fn to_precision(v: f64, p: usize) -> String {
    let p = p.max(1);
    if v == 0.0 {
        return if p == 1 {
            "0".to_string()
        } else {
            format!("{:.*}", p - 1, 0.0)
        };
    }
    let neg = v < 0.0;
    let av = round_to_precision(v.abs(), p);
    let s = format!("{:.*e}", p - 1, av);
    let (mant, exp) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let e: i32 = exp.parse().unwrap_or(0);
    let digits: String = mant.chars().filter(|c| *c != '.').collect();
    let body = if e < -6 || e >= p as i32 {
        let m = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits.clone()
        };
        format!("{}e{}{}", m, if e < 0 { '-' } else { '+' }, e.abs())
    } else if e >= 0 {
        let cut = e as usize + 1;
        if digits.len() > cut {
            format!("{}.{}", &digits[..cut], &digits[cut..])
        } else {
            digits.clone()
        }
    } else {
        format!("0.{}{}", "0".repeat((-e - 1) as usize), digits)
    };
    if neg {
        format!("-{}", body)
    } else {
        body
    }
}

/// Emulates JavaScript `v.toExponential(digits)`: `digits` places after the
/// decimal point, lowercase `e`, signed unpadded exponent.
pub(crate) fn to_exponential(v: f64, digits: usize) -> String {
    let s = format!("{:.*e}", digits, v);
    match s.split_once('e') {
        Some((m, ex)) if !ex.starts_with('-') => format!("{}e+{}", m, ex),
        _ => s,
    }
}

/// Best rational approximation of `x` with denominator at most `d`, by
/// continued fractions. Returns `(whole, numerator, denominator)`; the whole
/// part is zero unless `mixed` is set.
pub(crate) fn frac(x: f64, d: i64, mixed: bool) -> (i64, i64, i64) {
    let sgn: i64 = if x < 0.0 { -1 } else { 1 };
    let mut b = x * sgn as f64;
    let (mut p_2, mut p_1, mut q_2, mut q_1) = (0i64, 1i64, 1i64, 0i64);
    let (mut p, mut q) = (0i64, 0i64);
    while q_1 < d {
        let a = b.floor();
        p = a as i64 * p_1 + p_2;
        q = a as i64 * q_1 + q_2;
        if (b - a) < 0.000_000_05 {
            break;
        }
        b = 1.0 / (b - a);
        p_2 = p_1;
        p_1 = p;
        q_2 = q_1;
        q_1 = q;
    }
    if q > d {
        if q_1 > d {
            q = q_2;
            p = p_2;
        } else {
            q = q_1;
            p = p_1;
        }
    }
    if !mixed {
        return (0, sgn * p, q);
    }
    let whole = (sgn * p).div_euclid(q);
    (whole, sgn * p - whole * q, q)
}
