//! Rendering of merged digit-placeholder runs against a numeric value.
//!
//! The entry point is [`Render::write_num`]: it receives the concatenated
//! placeholder text of a section (for example `#,##0.00` or `# ?/??`, with a
//! `:` marking the integer/fraction boundary of mixed fractions) and the
//! value, and produces the digit text that the evaluator then redistributes
//! over the section's pieces.

use crate::error::FormatError;
use crate::locale::commaify;
use crate::math::{
    fill, frac, hashq, pad0, pad0r, pad_sp, round_half_away, rpad_sp, to_exponential,
    to_precision, to_str,
};

use super::Render;

fn rnd(val: f64, d: usize) -> String {
    to_str(round_half_away(val, d as i32))
}

fn is_placeholder(c: char) -> bool {
    matches!(c, '#' | '0' | '?')
}

/// `([#0?]+)/(\d+)`: a placeholder numerator over a literal denominator.
fn find_fixed_fraction(fmt: &str) -> Option<(usize, i64, usize)> {
    let chars: Vec<char> = fmt.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c != '/' {
            continue;
        }
        let ln = chars[..i]
            .iter()
            .rev()
            .take_while(|&&c| is_placeholder(c))
            .count();
        let den: String = chars[i + 1..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if ln > 0 && !den.is_empty() {
            if let Ok(d) = den.parse::<i64>() {
                return Some((ln, d, den.len()));
            }
        }
    }
    None
}

/// `^([#0?,]*)(\.([#0?]*))?$`.
fn parse_decimal(fmt: &str) -> Option<(String, bool, String)> {
    let (pre, after) = match fmt.split_once('.') {
        Some((p, a)) => (p, Some(a)),
        None => (fmt, None),
    };
    if !pre.chars().all(|c| is_placeholder(c) || c == ',') {
        return None;
    }
    match after {
        Some(a) if a.chars().all(is_placeholder) => Some((pre.to_string(), true, a.to_string())),
        Some(_) => None,
        None => Some((pre.to_string(), false, String::new())),
    }
}

/// `^([0#]+)(\\?-([0#]+))+$`: zip-code style digit groups joined by dashes.
fn is_zip(fmt: &str) -> bool {
    let cleaned = fmt.replace("\\-", "-");
    let groups: Vec<&str> = cleaned.split('-').collect();
    groups.len() >= 2
        && groups
            .iter()
            .all(|g| !g.is_empty() && g.chars().all(|c| c == '0' || c == '#'))
}

/// `^([#0?]+)( ?)/( ?)([#0?]+)$`.
fn parse_vulgar(fmt: &str) -> Option<(String, String, String, String)> {
    let (left, right) = fmt.split_once('/')?;
    let (num, sp1) = match left.strip_suffix(' ') {
        Some(n) => (n, " "),
        None => (left, ""),
    };
    let (sp2, den) = match right.strip_prefix(' ') {
        Some(d) => (" ", d),
        None => ("", right),
    };
    if num.is_empty()
        || den.is_empty()
        || !num.chars().all(is_placeholder)
        || !den.chars().all(is_placeholder)
    {
        return None;
    }
    Some((
        num.to_string(),
        sp1.to_string(),
        sp2.to_string(),
        den.to_string(),
    ))
}

/// Engineering form needs at least two mantissa placeholders before `E`.
fn parse_engineering(fmt: &str) -> Option<()> {
    let (mant, exp) = fmt.split_once('E')?;
    let (ipart, fpart) = match mant.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mant, None),
    };
    if ipart.len() < 2 || !ipart.chars().all(is_placeholder) {
        return None;
    }
    if let Some(f) = fpart {
        if !f.chars().all(is_placeholder) {
            return None;
        }
    }
    let mut e = exp.chars();
    match e.next() {
        Some('+') | Some('-') => {}
        _ => return None,
    }
    let rest: Vec<char> = e.collect();
    if rest.is_empty() || !rest.iter().all(|&c| is_placeholder(c)) {
        return None;
    }
    Some(())
}

impl<'e> Render<'e> {
    /// Render a placeholder run against a value.
    pub(super) fn write_num(&mut self, fmt: &str, val: f64) -> Result<String, FormatError> {
        if fmt.is_empty() {
            return Ok(String::new());
        }
        if let Some(ci) = fmt.find(':') {
            return self.write_num_mixed(fmt, ci, val);
        }
        self.write_num_flt(fmt, val)
    }

    /// Mixed fraction: the `:` splits the integer placeholders from the
    /// fraction placeholders; the marker survives into the output so the
    /// evaluator can split it back apart.
    fn write_num_mixed(&mut self, fmt: &str, ci: usize, val: f64) -> Result<String, FormatError> {
        let ifmt = fmt[..ci].to_string();
        let fmtr = fmt[ci + 1..].to_string();
        if ifmt.is_empty() {
            return self.write_num(&fmtr, val);
        }
        let mut int_part = val.trunc();
        let mut frac_part = (val - int_part).abs();
        let oa = self.write_num(&fmtr, frac_part)?;
        if let Some((n, d)) = oa.split_once('/') {
            let (n, d) = (n.trim(), d.trim());
            match (n.parse::<i64>(), d.parse::<i64>()) {
                // Rounding pushed the numerator up to the denominator.
                (Ok(n), Ok(d)) if n != 0 && n == d => {
                    int_part = round_half_away(val, 0);
                    frac_part = 0.0;
                }
                (Ok(0), _) => frac_part = 0.0,
                _ => {}
            }
        }
        if frac_part == 0.0 {
            let blanked: String = fmtr
                .chars()
                .map(|c| {
                    if is_placeholder(c) || c == '/' || c.is_ascii_digit() {
                        '?'
                    } else {
                        c
                    }
                })
                .collect();
            let mut ifmt = ifmt;
            if int_part == 0.0 && !ifmt.ends_with('0') {
                // A whole zero with a blanked fraction must still show "0".
                ifmt.pop();
                ifmt.push('0');
            }
            let int_str = self.write_num(&ifmt, int_part)?;
            return Ok(format!("{}:{}", int_str, hashq(&blanked)));
        }
        let int_str = self.write_num(&ifmt, int_part)?;
        Ok(format!("{}:{}", int_str, oa))
    }

    fn write_num_flt(&mut self, fmt: &str, val: f64) -> Result<String, FormatError> {
        let minus = self.fmtl.minus_sign.clone();
        let aval = val.abs();
        let sign = if val < 0.0 { minus } else { String::new() };

        // Trailing commas scale by thousands.
        if fmt.ends_with(',') {
            let k = fmt.chars().rev().take_while(|&c| c == ',').count();
            let stripped = &fmt[..fmt.len() - k];
            let base = 10i64.pow(3 * k as u32);
            let scaled = if val == val.trunc() && (val as i64) % base == 0 {
                ((val as i64) / base) as f64
            } else {
                val / base as f64
            };
            return self.write_num(stripped, scaled);
        }

        if fmt.contains('E') {
            return self.write_num_exp(fmt, val);
        }

        if fmt.chars().all(|c| c == '0') {
            return Ok(format!("{}{}", sign, pad0r(aval, fmt.len())));
        }

        if fmt.chars().all(|c| c == '#' || c == '?') {
            let mut o = pad0r(aval, 0);
            if o == "0" {
                o = String::new();
            }
            return Ok(if o.len() > fmt.len() {
                format!("{}{}", sign, o)
            } else {
                format!("{}{}{}", sign, hashq(&fmt[..fmt.len() - o.len()]), o)
            });
        }

        if let Some((ln, den, ld)) = find_fixed_fraction(fmt) {
            let rr = round_half_away(aval * den as f64, 0) as i64;
            let body = if rr == 0 {
                fill(' ', ln + 1 + ld)
            } else {
                format!(
                    "{}/{}",
                    pad_sp(&rr.to_string(), ln),
                    pad0(&den.to_string(), ld)
                )
            };
            return Ok(format!("{}{}", sign, body));
        }

        // #+ then 0+: the zeros fix the minimum width.
        if !fmt.is_empty() {
            let hashes = fmt.chars().take_while(|&c| c == '#').count();
            if hashes > 0 && fmt[hashes..].chars().all(|c| c == '0') && fmt.len() > hashes {
                return Ok(format!("{}{}", sign, pad0r(aval, fmt.len() - hashes)));
            }
        }

        if let Some((pre, point, after)) = parse_decimal(fmt) {
            return self.write_num_dec(&pre, point, &after, aval, sign);
        }

        // Leading #s in front of a firmer pattern contribute nothing.
        let hashes = fmt.chars().take_while(|&c| c == '#').count();
        if hashes > 0 && matches!(fmt[hashes..].chars().next(), Some('0') | Some('.')) {
            return self.write_num(&fmt[hashes..], val);
        }

        if is_zip(fmt) {
            let inner: String = fmt.chars().filter(|c| *c != '\\' && *c != '-').collect();
            let o = self.write_num(&inner, val)?;
            let orev: Vec<char> = o.chars().rev().collect();
            let mut ri = 0usize;
            let mut out: Vec<char> = Vec::new();
            for c in fmt.chars().filter(|c| *c != '\\').collect::<Vec<_>>().into_iter().rev() {
                match c {
                    '0' | '#' => {
                        if ri < orev.len() {
                            out.push(orev[ri]);
                            ri += 1;
                        } else if c == '0' {
                            out.push('0');
                        }
                    }
                    _ => out.push(c),
                }
            }
            out.reverse();
            return Ok(out.into_iter().collect());
        }

        if fmt.replace('\\', "") == "(###) ###-####" {
            let o = self.write_num("##########", val)?;
            let oc: Vec<char> = o.chars().collect();
            let seg = |a: usize, b: usize| -> String {
                oc[a.min(oc.len())..b.min(oc.len())].iter().collect()
            };
            return Ok(format!(
                "({}) {}-{}",
                seg(0, 3),
                seg(3, 6),
                seg(6, oc.len().max(6))
            ));
        }

        if let Some((num_fmt, sp1, sp2, den_fmt)) = parse_vulgar(fmt) {
            let ri = den_fmt.len().min(7);
            let ff = frac(aval, 10i64.pow(ri as u32) - 1, false);
            let mut oa = self.write_num(&num_fmt, ff.1 as f64)?;
            if oa.ends_with(' ') {
                oa.pop();
                oa.push('0');
            }
            let mut o = format!("{}{}{}/{}", sign, oa, sp1, sp2);
            let mut od = rpad_sp(&ff.2.to_string(), ri);
            if od.len() < den_fmt.len() {
                od.push_str(&hashq(&den_fmt[od.len()..]));
            }
            o.push_str(&od);
            return Ok(o);
        }

        self.soft(FormatError::UnsupportedFormat(fmt.to_string()))?;
        Ok(String::new())
    }

    fn write_num_dec(
        &mut self,
        pre: &str,
        point: bool,
        after: &str,
        aval: f64,
        mut sign: String,
    ) -> Result<String, FormatError> {
        let comma = pre.contains(',');
        let pre_nc: String = pre.chars().filter(|&c| c != ',').collect();
        let dp = self.fmtl.decimal_point.clone();
        let sep = self.fmtl.thousands_sep.clone();
        let grouping = self.fmtl.grouping.clone();

        let mut o = rnd(aval, after.len());
        if o == "0" {
            sign.clear();
        }
        if point {
            if !o.contains('.') {
                o.push('.');
            }
            let di = o.find('.').unwrap_or(o.len() - 1);
            let dlen = o.len() - di - 1;
            if dlen < after.len() {
                o.push_str(&hashq(&after[dlen..]));
            }
            // "#.##" has no leading zero, so "0.5" renders as ".5".
            let full: String = format!("{}.{}", pre_nc, after);
            if !full.contains("0.") && o.starts_with("0.") {
                o.remove(0);
            }
            let dpos = o.find('.').unwrap_or(0);
            if pre_nc.len() > dpos {
                o = format!("{}{}", hashq(&pre_nc[..pre_nc.len() - dpos]), o);
            }
            let dpos = o.find('.').unwrap_or(o.len());
            let ip = o[..dpos].to_string();
            let rest = o[dpos + 1..].to_string();
            o = if comma {
                format!("{}{}{}", commaify(&ip, &grouping, &sep), dp, rest)
            } else {
                format!("{}{}{}", ip, dp, rest)
            };
        } else {
            if !pre.contains('0') && o == "0" {
                o.clear();
            }
            if pre_nc.len() > o.len() {
                o = format!("{}{}", hashq(&pre_nc[..pre_nc.len() - o.len()]), o);
            }
            if comma {
                o = commaify(&o, &grouping, &sep);
            }
        }
        Ok(format!("{}{}", sign, o))
    }

    fn write_num_exp(&mut self, fmt: &str, val: f64) -> Result<String, FormatError> {
        let epos = match fmt.find('E') {
            Some(p) => p,
            None => return Ok(String::new()),
        };
        let ppos = fmt.find('.');
        let idx = (epos as i64 - ppos.map(|p| p as i64).unwrap_or(-1) - 1).max(0) as usize;

        let mut o = if parse_engineering(fmt).is_some() {
            self.engineering(fmt, val, idx, epos, ppos)
        } else {
            to_exponential(val, idx)
        };

        if fmt.ends_with("E+00") {
            // o like "1.2e+7": widen single-digit exponents.
            let oc: Vec<char> = o.chars().collect();
            if oc.len() >= 2
                && oc[oc.len() - 1].is_ascii_digit()
                && matches!(oc[oc.len() - 2], '+' | '-')
            {
                let last = oc[oc.len() - 1];
                o.truncate(o.len() - 1);
                o.push('0');
                o.push(last);
            }
        }
        if fmt.contains("E-") && o.contains("e+") {
            o = o.replace("e+", "e");
        }
        o = o.replace('e', "E");

        let exp = self.fmtl.exponential.clone();
        let plus = self.fmtl.plus_sign.clone();
        let minus = self.fmtl.minus_sign.clone();
        let dp = self.fmtl.decimal_point.clone();
        let mut out = String::new();
        for c in o.chars() {
            match c {
                'E' => out.push_str(&exp),
                '+' => out.push_str(&plus),
                '-' => out.push_str(&minus),
                '.' => out.push_str(&dp),
                _ => out.push(c),
            }
        }
        Ok(out)
    }

    /// Engineering notation: the exponent snaps to a multiple of the
    /// mantissa's integer width.
    fn engineering(
        &mut self,
        fmt: &str,
        val: f64,
        idx: usize,
        epos: usize,
        ppos: Option<usize>,
    ) -> String {
        if val == 0.0 {
            return format!("0.{}E+0", fill('0', idx.max(1)));
        }
        if val < 0.0 {
            return format!("-{}", self.engineering(fmt, -val, idx, epos, ppos));
        }
        let period = ppos.unwrap_or(epos) as i64;
        let mut ee = (val.log10().floor() as i64) % period;
        if ee < 0 {
            ee += period;
        }
        let prec = (idx as i64 + 1 + (period + ee) % period).max(1) as usize;
        let mut o = to_precision(val / 10f64.powi(ee as i32), prec);
        if !o.contains('e') {
            let fakee = val.log10().floor() as i64;
            if !o.contains('.') {
                let head = o.chars().next().unwrap_or('0');
                let tail: String = o.chars().skip(1).collect();
                let shift = fakee - o.chars().count() as i64 + ee;
                o = format!("{}.{}E+{}", head, tail, shift);
            } else {
                o = format!("{}E+{}", o, fakee - ee);
            }
            while o.starts_with("0.") {
                let oc: Vec<char> = o.chars().collect();
                let p = period as usize;
                let mid: String = oc[2.min(oc.len())..(2 + p).min(oc.len())].iter().collect();
                let rest: String = oc[(2 + p).min(oc.len())..].iter().collect();
                o = format!("{}{}.{}", oc[0], mid, rest);
                // trim zeros that drifted to the front
                let trimmed = o.trim_start_matches('0');
                o = if trimmed.starts_with('.') {
                    format!("0{}", trimmed)
                } else {
                    trimmed.to_string()
                };
            }
            o = o.replacen("+-", "-", 1);
        }
        // Shift the decimal point so the exponent lands on the grid.
        if let Some(em) = o.find(|c| c == 'e' || c == 'E') {
            let mant = &o[..em];
            let rest = &o[em + 1..];
            let (msign, mant) = match mant.strip_prefix('+') {
                Some(m) => ("", m),
                None => match mant.strip_prefix('-') {
                    Some(m) => ("-", m),
                    None => ("", mant),
                },
            };
            if let Some((ip, fp)) = mant.split_once('.') {
                let fpc: Vec<char> = fp.chars().collect();
                let cut = ((period + ee) % period) as usize;
                let lead: String = fpc[..cut.min(fpc.len())].iter().collect();
                let tail: String = fpc[(ee as usize).min(fpc.len())..].iter().collect();
                o = format!("{}{}{}.{}E{}", msign, ip, lead, tail, rest);
            }
        }
        o
    }
}
