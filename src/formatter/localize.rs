//! Digit substitution for `[DBNumN]` and `[$-xxyyzzzz]` numeral shaping.
//!
//! Two families exist. Positional systems (full-width digits, Thai numerals)
//! swap each ASCII digit for its counterpart. Power systems (Chinese and
//! Japanese numbering) interleave digits with place-value words, eating zero
//! digits along the way: `105` becomes 百五, not 一〇五. Power words only
//! appear in dates and General output; digit runs from placeholder formats
//! stay positional so column alignment survives.

use crate::locale::Numerals;

use super::Render;

impl<'e> Render<'e> {
    /// Rewrite ASCII digits in rendered output according to the numeral
    /// shaping in effect. `[DBNumN]` wins over a `[$-...]` numeral id; with
    /// neither, the text passes through untouched.
    pub(super) fn replace_numbers(&self, s: &str, is_date: bool, is_general: bool) -> String {
        let num = if let Some(d) = self.dbnum {
            self.tmpl.dbnum.get(&d).cloned()
        } else if let Some(id) = self.numerals {
            self.eng.numerals_lookup(id)
        } else {
            None
        };
        match num {
            Some(n) => replace_num(s, &n, is_date, is_general),
            None => s.to_string(),
        }
    }
}

fn digit_sub(s: &str, n: &Numerals) -> String {
    let mut out = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            out.push_str(&n.digit(c));
        } else {
            out.push(c);
        }
    }
    out
}

fn replace_num(s: &str, n: &Numerals, is_date: bool, is_general: bool) -> String {
    if s.contains('E') {
        let out = s
            .replace("E+", &n.exp_plus)
            .replace("E-", &n.exp_minus)
            .replace('E', &n.exp);
        return digit_sub(&out, n);
    }
    if n.positional() || (!is_date && !is_general) {
        return digit_sub(s, n);
    }
    // ^([+-])?(\d+)?(\.\d*)?$ by hand; anything else falls back to plain
    // digit substitution.
    let mut rest = s;
    let mut sign = "";
    if let Some(r) = rest.strip_prefix('-') {
        sign = "-";
        rest = r;
    } else if let Some(r) = rest.strip_prefix('+') {
        sign = "+";
        rest = r;
    }
    let int_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let int = &rest[..int_end];
    let frac = &rest[int_end..];
    let frac_ok = frac.is_empty()
        || (frac.starts_with('.') && frac[1..].chars().all(|c| c.is_ascii_digit()));
    if !frac_ok || (int.len() > 1 && int.starts_with('0')) {
        return digit_sub(s, n);
    }
    let mut out = String::from(sign);
    out.push_str(&replace_powers(int, n, is_date));
    out.push_str(&digit_sub(frac, n));
    out
}

/// Expand an integer into digit/power pairs, e.g. `1234` -> 千二百三十四.
/// A leading `1` yields the bare power word except in date context, where a
/// power word that embeds the digit one keeps its short form.
fn replace_powers(s: &str, n: &Numerals, is_date: bool) -> String {
    let ds: Vec<char> = s.chars().collect();
    if ds.is_empty() {
        return String::new();
    }
    if ds.len() == 1 {
        return n.digit(ds[0]);
    }
    let lo = ds.len();
    let mut out = String::new();
    if lo - 1 > n.powers.len() {
        // Too big for one power word: split into a high group scaled by the
        // largest power and a low remainder.
        let cut = lo - n.powers.len();
        let high: String = ds[..cut].iter().collect();
        out.push_str(&replace_powers(&high, n, is_date));
        if let Some(top) = n.powers.last() {
            out.push_str(top);
        }
        let low: String = ds[cut..].iter().collect();
        let low = low.trim_start_matches('0');
        if !low.is_empty() {
            out.push_str(&replace_powers(low, n, is_date));
        }
        return out;
    }
    let power = &n.powers[lo - 2];
    match ds[0] {
        '0' => {}
        '1' => {
            let one = n.digit('1');
            if is_date && !one.is_empty() && power.starts_with(&one) {
                out.push_str(&power[one.len()..]);
            } else {
                out.push_str(power);
            }
        }
        d => {
            out.push_str(&n.digit(d));
            out.push_str(power);
        }
    }
    let rest: String = ds[1..].iter().collect();
    let rest = rest.trim_start_matches('0');
    if !rest.is_empty() {
        out.push_str(&replace_powers(rest, n, is_date));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{builtin, builtin_numerals};

    fn dbnum1() -> Numerals {
        builtin("ja-JP").unwrap().dbnum.get(&1).cloned().unwrap()
    }

    #[test]
    fn positional_substitution() {
        let thai = builtin_numerals(0x13).unwrap();
        assert_eq!(replace_num("120", &thai, false, false), "๑๒๐");
        assert_eq!(replace_num("1.50", &thai, false, false), "๑.๕๐");
    }

    #[test]
    fn power_words_interleave_in_dates_and_general() {
        let n = dbnum1();
        assert_eq!(replace_num("1234", &n, false, true), "千二百三十四");
        assert_eq!(replace_num("105", &n, true, false), "百五");
        assert_eq!(replace_num("10", &n, true, false), "十");
        assert_eq!(replace_num("0", &n, false, true), "〇");
    }

    #[test]
    fn placeholder_output_stays_positional() {
        let n = dbnum1();
        assert_eq!(replace_num("1234", &n, false, false), "一二三四");
        assert_eq!(replace_num("105", &n, false, false), "一〇五");
    }

    #[test]
    fn big_numbers_split_on_largest_power() {
        let n = dbnum1();
        // 1_000_000 = 100 * 10^4
        assert_eq!(replace_num("1000000", &n, false, true), "百万");
        assert_eq!(replace_num("12000000", &n, false, true), "千二百万");
    }

    #[test]
    fn fraction_digits_stay_positional() {
        let n = dbnum1();
        assert_eq!(replace_num("12.05", &n, false, true), "十二.〇五");
    }

    #[test]
    fn leading_zero_integers_fall_back() {
        let n = dbnum1();
        assert_eq!(replace_num("05", &n, false, true), "〇五");
    }
}
