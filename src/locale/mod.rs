//! Locale definitions: separators, day and month names, currency layout,
//! calendar eras and digit-shaping systems.

use std::collections::HashMap;

mod data;

/// `CHAR_MAX` in a grouping vector terminates grouping.
pub(crate) const GROUP_STOP: u8 = 127;

/// An era of a non-Gregorian regnal calendar, as used by `g`/`gg`/`ggg`
/// date tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Era {
    /// First day of the era as (year, month, day).
    pub start: (i32, u32, u32),
    /// Single-letter form (`g`).
    pub g: String,
    /// Short form (`gg`).
    pub gg: String,
    /// Full form (`ggg`).
    pub ggg: String,
}

/// A digit-shaping system: either positional (each ASCII digit maps to a
/// native digit) or power-based (CJK style, where 1234 reads "thousand two
/// hundred thirty four").
#[derive(Debug, Clone, PartialEq)]
pub struct Numerals {
    /// Native forms of the digits 0-9.
    pub digits: Vec<String>,
    /// Native forms of 10, 100, 1000, ... Empty for positional systems.
    pub powers: Vec<String>,
    pub exp_plus: String,
    pub exp_minus: String,
    pub exp: String,
}

impl Numerals {
    pub(crate) fn positional(&self) -> bool {
        self.powers.is_empty()
    }

    pub(crate) fn digit(&self, c: char) -> String {
        c.to_digit(10)
            .and_then(|d| self.digits.get(d as usize).cloned())
            .unwrap_or_else(|| c.to_string())
    }
}

/// Everything rendering needs to know about a locale.
#[derive(Debug, Clone, PartialEq)]
pub struct Locale {
    pub tag: String,
    pub decimal_point: String,
    pub thousands_sep: String,
    /// Digit group sizes from the right; 0 repeats the previous entry,
    /// [`GROUP_STOP`] ends grouping.
    pub grouping: Vec<u8>,
    pub currency_symbol: String,
    pub plus_sign: String,
    pub minus_sign: String,
    pub percent_sign: String,
    pub time_separator: String,
    pub exponential: String,
    pub time_format: String,
    pub short_date_format: String,
    pub long_date_format: String,
    pub am: String,
    pub pm: String,
    pub a: String,
    pub p: String,
    /// Sunday first: (abbreviated, full).
    pub days: Vec<(String, String)>,
    /// (narrow, abbreviated, wide).
    pub months: Vec<(String, String, String)>,
    // Monetary layout, POSIX lconv style.
    pub frac_digits: u8,
    pub p_cs_precedes: bool,
    pub n_cs_precedes: bool,
    pub p_sep_by_space: u8,
    pub n_sep_by_space: u8,
    pub p_sign_posn: u8,
    pub n_sign_posn: u8,
    pub positive_sign: String,
    pub negative_sign: String,
    /// Eras newest first; empty for Gregorian-only locales.
    pub eras: Vec<Era>,
    /// `[DBNum1]`..`[DBNum3]` digit systems for this locale.
    pub dbnum: HashMap<u8, Numerals>,
}

impl Locale {
    /// The era in effect on a date, with the year within that era. The era's
    /// start day belongs to the era itself.
    pub(crate) fn era_for(&self, year: i32, month: u32, day: u32) -> Option<(&Era, i32)> {
        self.eras
            .iter()
            .find(|e| (year, month, day) >= e.start)
            .map(|e| (e, year - e.start.0 + 1))
    }
}

impl Default for Locale {
    fn default() -> Self {
        data::en_us()
    }
}

/// Canonicalize a tag: `en_us` and `EN-us` both become `en-US`.
pub(crate) fn normalize_tag(tag: &str) -> String {
    let tag = tag.replace('_', "-");
    match tag.split_once('-') {
        Some((lang, region)) => {
            format!("{}-{}", lang.to_ascii_lowercase(), region.to_ascii_uppercase())
        }
        None => tag.to_ascii_lowercase(),
    }
}

/// Map a Windows LCID (low 16 bits) to a known tag.
pub(crate) fn tag_for_lcid(lcid: u32) -> Option<&'static str> {
    Some(match lcid {
        0x0409 => "en-US",
        0x0809 => "en-GB",
        0x0407 => "de-DE",
        0x040C => "fr-FR",
        0x0411 => "ja-JP",
        0x0804 => "zh-CN",
        0x041E => "th-TH",
        _ => return None,
    })
}

/// Look up a built-in locale by (normalized) tag.
pub(crate) fn builtin(tag: &str) -> Option<Locale> {
    Some(match normalize_tag(tag).as_str() {
        "en-US" | "en-GB" | "en" => data::en_us(),
        "de-DE" | "de" => data::de_de(),
        "fr-FR" | "fr" => data::fr_fr(),
        "ja-JP" | "ja" => data::ja_jp(),
        "zh-CN" | "zh" => data::zh_cn(),
        "th-TH" | "th" => data::th_th(),
        _ => return None,
    })
}

/// Digit-shaping systems addressed by the high byte of a `[$-...]` tag.
pub(crate) fn builtin_numerals(id: u8) -> Option<Numerals> {
    data::numerals_for(id)
}

/// Insert group separators into a plain digit string, honoring the locale
/// grouping vector. Leading spaces (from `?` placeholders) are preserved.
pub(crate) fn commaify(s: &str, grouping: &[u8], sep: &str) -> String {
    if let Some(rest) = s.strip_prefix(' ') {
        return format!(" {}", commaify(rest, grouping, sep));
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let mut groups: Vec<String> = Vec::new();
    let mut end = chars.len();
    let mut idx = 0usize;
    let mut w = match grouping.first().copied().unwrap_or(3) {
        0 => 3,
        n => n,
    } as usize;
    loop {
        if end == 0 {
            break;
        }
        let start = end.saturating_sub(w);
        groups.push(chars[start..end].iter().collect());
        end = start;
        if end == 0 {
            break;
        }
        match grouping.get(idx + 1).copied() {
            None | Some(0) => {}
            Some(GROUP_STOP) => {
                groups.push(chars[..end].iter().collect());
                break;
            }
            Some(n) => {
                w = n as usize;
                idx += 1;
            }
        }
    }
    groups.reverse();
    groups.join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commaify_groups_of_three() {
        assert_eq!(commaify("1234567", &[3, 0], ","), "1,234,567");
        assert_eq!(commaify("123", &[3, 0], ","), "123");
        assert_eq!(commaify("1234", &[3, 0], "."), "1.234");
    }

    #[test]
    fn commaify_preserves_leading_spaces() {
        assert_eq!(commaify("  1234", &[3, 0], ","), "  1,234");
    }

    #[test]
    fn commaify_indian_grouping() {
        // 3 then 2s: 12,34,567.
        assert_eq!(commaify("1234567", &[3, 2, 0], ","), "12,34,567");
    }

    #[test]
    fn commaify_stops_at_char_max() {
        assert_eq!(commaify("1234567", &[3, GROUP_STOP], ","), "1234,567");
    }

    #[test]
    fn tags_normalize() {
        assert_eq!(normalize_tag("en_us"), "en-US");
        assert_eq!(normalize_tag("JA-jp"), "ja-JP");
        assert_eq!(normalize_tag("fr"), "fr");
    }

    #[test]
    fn lcids_resolve() {
        assert_eq!(tag_for_lcid(0x409), Some("en-US"));
        assert_eq!(tag_for_lcid(0x411), Some("ja-JP"));
        assert_eq!(tag_for_lcid(0x1234), None);
    }

    #[test]
    fn japanese_eras_pick_by_date() {
        let ja = builtin("ja-JP").unwrap();
        let (era, y) = ja.era_for(2020, 2, 19).unwrap();
        assert_eq!(era.ggg, "令和");
        assert_eq!(y, 2);
        let (era, y) = ja.era_for(1990, 1, 1).unwrap();
        assert_eq!(era.ggg, "平成");
        assert_eq!(y, 2);
    }

    #[test]
    fn era_start_day_opens_the_era() {
        let ja = builtin("ja-JP").unwrap();
        let (era, y) = ja.era_for(2019, 5, 1).unwrap();
        assert_eq!(era.ggg, "令和");
        assert_eq!(y, 1);
        let (era, _) = ja.era_for(2019, 4, 30).unwrap();
        assert_eq!(era.ggg, "平成");
    }
}
