//! Scanner for a single format section.
//!
//! The scanner is a pure classifier: it knows nothing about the value being
//! formatted, so tokens that render differently for dates and numbers (the
//! `/` mark, parentheses, `A/P` markers) are kept raw and resolved by the
//! evaluator. Recoverable problems are collected rather than aborting the
//! scan; the caller decides what to do with them.

use crate::error::FormatError;

/// One scanned token of a format section.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawToken {
    /// The literal word `General`.
    General,
    /// Verbatim output: quoted strings, escaped characters, allowed
    /// punctuation, and the space emitted for `_x`.
    Literal(String),
    /// A bare space (fractions treat these specially).
    Space,
    /// `@`, the text placeholder.
    TextValue,
    /// `B1`/`B2` calendar selector.
    Calendar(u8),
    /// A run of one date letter, lowercased: `y m d h s e g b`.
    DateRun(char, usize),
    /// `AM/PM`.
    AmPm,
    /// `A/P` in its original casing.
    AmPmShort(String),
    /// `上午/下午`.
    AmPmCjk,
    /// `[hh]`-style elapsed marker, bracket content lowercased.
    AbsTime(String),
    /// `[$sym-lcid]` currency/locale tag.
    LocaleTag {
        symbol: Option<String>,
        lcid: Option<u32>,
        numerals: Option<u8>,
    },
    /// `[DBNum1]`..`[DBNum3]`.
    DbNum(u8),
    /// `[Red]`, `[Color12]`, ...
    Color(String),
    /// `[>=100]`-style section condition.
    Condition { op: String, operand: f64 },
    /// `.0`/`.00`/`.000` after a date token; the count of zeros.
    SubSecond(usize),
    /// A run of digit placeholders: `0 # ?`, digits, `. , E + -`.
    NumRun(String),
    /// A run of plain digits, used as a fixed fraction denominator.
    DenRun(String),
    /// A `/` outside a digit run.
    Slash,
    Percent,
    /// `*c` fill marker with its pad character.
    Fill(char),
    Paren(char),
}

/// Characters allowed as bare literals without quoting or escaping.
const LITERAL_OK: &str = ",$-+/():!^&'~{}<>=€acfijklopqrtuvwxzP";

fn is_abstime(content: &str) -> bool {
    !content.is_empty()
        && content.chars().all(|c| {
            matches!(
                c,
                'H' | 'h' | 'M' | 'm' | 'S' | 's' | '\u{0E0A}' | '\u{0E19}' | '\u{0E17}'
            )
        })
}

fn is_color(content: &str) -> bool {
    const NAMES: [&str; 8] = [
        "black", "blue", "cyan", "green", "magenta", "red", "white", "yellow",
    ];
    let lower = content.to_ascii_lowercase();
    if NAMES.contains(&lower.as_str()) {
        return true;
    }
    lower
        .strip_prefix("color")
        .map(|n| matches!(n.parse::<u8>(), Ok(1..=56)))
        .unwrap_or(false)
}

fn parse_condition(content: &str) -> Option<RawToken> {
    let (op, rest) = if let Some(r) = content.strip_prefix("<>") {
        ("<>", r)
    } else if let Some(r) = content.strip_prefix("<=") {
        ("<=", r)
    } else if let Some(r) = content.strip_prefix(">=") {
        (">=", r)
    } else if let Some(r) = content.strip_prefix('<') {
        ("<", r)
    } else if let Some(r) = content.strip_prefix('>') {
        (">", r)
    } else if let Some(r) = content.strip_prefix('=') {
        ("=", r)
    } else {
        return None;
    };
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
        return None;
    }
    rest.parse::<f64>().ok().map(|operand| RawToken::Condition {
        op: op.to_string(),
        operand,
    })
}

fn parse_locale_tag(content: &str) -> RawToken {
    // content starts with '$': "[$€-407]", "[$-409]", "[$USD]"...
    let body = &content[1..];
    let (symbol, tag) = match body.split_once('-') {
        Some((s, t)) => (s, Some(t)),
        None => (body, None),
    };
    let symbol = if symbol.is_empty() {
        None
    } else {
        Some(symbol.to_string())
    };
    let lcid = tag.and_then(|t| u32::from_str_radix(t, 16).ok());
    // High byte of the LCID field selects a digit-shaping system.
    let numerals = lcid
        .map(|v| ((v >> 16) & 0xFF) as u8)
        .filter(|&n| n != 0);
    RawToken::LocaleTag {
        symbol,
        lcid: lcid.map(|v| v & 0xFFFF),
        numerals,
    }
}

fn classify_bracket(content: &str, fmt: &str, errors: &mut Vec<FormatError>) -> Option<RawToken> {
    if is_abstime(content) {
        return Some(RawToken::AbsTime(content.to_lowercase()));
    }
    if content.starts_with('$') {
        return Some(parse_locale_tag(content));
    }
    if let Some(cond) = parse_condition(content) {
        return Some(cond);
    }
    let lower = content.to_ascii_lowercase();
    if let Some(n) = lower.strip_prefix("dbnum") {
        if let Ok(n @ 1..=3) = n.parse::<u8>() {
            return Some(RawToken::DbNum(n));
        }
    }
    if is_color(content) {
        return Some(RawToken::Color(content.to_string()));
    }
    errors.push(FormatError::UnsupportedFormat(fmt.to_string()));
    None
}

/// Scan one section into tokens, collecting recoverable errors on the side.
pub(crate) fn tokenize(fmt: &str) -> (Vec<RawToken>, Vec<FormatError>) {
    let chars: Vec<char> = fmt.chars().collect();
    let mut out: Vec<RawToken> = Vec::new();
    let mut errors: Vec<FormatError> = Vec::new();
    let mut i = 0usize;
    // Only the first '.' in a section can be a decimal point.
    let mut dots = 0usize;
    let mut seen_date = false;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                let mut s = String::new();
                let mut j = i + 1;
                let mut closed = false;
                while j < chars.len() {
                    if chars[j] == '"' {
                        closed = true;
                        break;
                    }
                    s.push(chars[j]);
                    j += 1;
                }
                if !closed {
                    errors.push(FormatError::UnterminatedString(fmt.to_string()));
                }
                out.push(RawToken::Literal(s));
                i = if closed { j + 1 } else { chars.len() };
            }
            '\\' => {
                if i + 1 < chars.len() {
                    out.push(RawToken::Literal(chars[i + 1].to_string()));
                    i += 2;
                } else {
                    errors.push(FormatError::InvalidEscape(fmt.to_string()));
                    i += 1;
                }
            }
            '_' => {
                // Underscore reserves the width of the next character; a
                // plain space is the closest a string can get.
                out.push(RawToken::Literal(" ".to_string()));
                i = (i + 2).min(chars.len());
            }
            '*' => {
                if i + 1 < chars.len() {
                    out.push(RawToken::Fill(chars[i + 1]));
                    i += 2;
                } else {
                    errors.push(FormatError::InvalidEscape(fmt.to_string()));
                    i += 1;
                }
            }
            '@' => {
                out.push(RawToken::TextValue);
                i += 1;
            }
            ' ' => {
                out.push(RawToken::Space);
                i += 1;
            }
            '(' | ')' => {
                out.push(RawToken::Paren(c));
                i += 1;
            }
            '%' => {
                out.push(RawToken::Percent);
                i += 1;
            }
            '/' => {
                out.push(RawToken::Slash);
                i += 1;
            }
            '[' => {
                let mut j = i + 1;
                let mut content = String::new();
                let mut closed = false;
                while j < chars.len() {
                    if chars[j] == ']' {
                        closed = true;
                        break;
                    }
                    content.push(chars[j]);
                    j += 1;
                }
                if !closed {
                    errors.push(FormatError::UnterminatedBracket(fmt.to_string()));
                    i = chars.len();
                    continue;
                }
                if let Some(tok) = classify_bracket(&content, fmt, &mut errors) {
                    if matches!(tok, RawToken::AbsTime(_)) {
                        seen_date = true;
                    }
                    out.push(tok);
                }
                i = j + 1;
            }
            'G' | 'g'
                if chars.len() - i >= 7
                    && chars[i..i + 7]
                        .iter()
                        .collect::<String>()
                        .eq_ignore_ascii_case("General") =>
            {
                out.push(RawToken::General);
                i += 7;
            }
            'B' | 'b' if i + 1 < chars.len() && (chars[i + 1] == '1' || chars[i + 1] == '2') => {
                out.push(RawToken::Calendar(chars[i + 1] as u8 - b'0'));
                seen_date = true;
                i += 2;
            }
            'A' | 'a' | '上' => {
                let take = |n: usize| -> String {
                    chars[i..(i + n).min(chars.len())].iter().collect()
                };
                let five = take(5);
                if five.eq_ignore_ascii_case("AM/PM") {
                    out.push(RawToken::AmPm);
                    seen_date = true;
                    i += 5;
                } else if five == "上午/下午" {
                    out.push(RawToken::AmPmCjk);
                    seen_date = true;
                    i += 5;
                } else if take(3).eq_ignore_ascii_case("A/P") {
                    out.push(RawToken::AmPmShort(take(3)));
                    seen_date = true;
                    i += 3;
                } else {
                    out.push(RawToken::Literal(c.to_string()));
                    i += 1;
                }
            }
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' | 'e' | 'E' | 'g'
            | 'G' | 'b' | 'B' => {
                // A bare 'E' before any date token is literal text (the
                // scientific 'E' lives inside number runs), so words like
                // ZERO survive as a section body.
                if c == 'E' && !seen_date {
                    out.push(RawToken::Literal("E".to_string()));
                    i += 1;
                    continue;
                }
                let lc = c.to_ascii_lowercase();
                let mut n = 1;
                let mut j = i + 1;
                while j < chars.len() && chars[j].to_ascii_lowercase() == lc {
                    n += 1;
                    j += 1;
                }
                out.push(RawToken::DateRun(lc, n));
                seen_date = true;
                i = j;
            }
            '1'..='9' => {
                let mut s = String::from(c);
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_ascii_digit() {
                    s.push(chars[j]);
                    j += 1;
                }
                out.push(RawToken::DenRun(s));
                i = j;
            }
            '0' | '#' | '?' | '.' => {
                if c == '.' {
                    // A decimal point directly after date tokens begins a
                    // sub-second suffix.
                    if seen_date && i + 1 < chars.len() && chars[i + 1] == '0' {
                        let mut n = 0;
                        let mut j = i + 1;
                        while j < chars.len() && chars[j] == '0' {
                            n += 1;
                            j += 1;
                        }
                        out.push(RawToken::SubSecond(n));
                        i = j;
                        continue;
                    }
                    // Any other dot in date context separates date fields,
                    // as in `dd.mm.yyyy`.
                    if seen_date {
                        out.push(RawToken::Literal(".".to_string()));
                        i += 1;
                        continue;
                    }
                    if dots >= 1 {
                        out.push(RawToken::Literal(".".to_string()));
                        i += 1;
                        continue;
                    }
                    dots += 1;
                }
                let mut s = String::from(c);
                let mut j = i + 1;
                while j < chars.len() {
                    let d = chars[j];
                    match d {
                        '0'..='9' | '#' | '?' | ',' | 'E' | '+' | '-' => s.push(d),
                        '.' if dots == 0 => {
                            dots += 1;
                            s.push(d);
                        }
                        _ => break,
                    }
                    j += 1;
                }
                out.push(RawToken::NumRun(s));
                i = j;
            }
            _ if LITERAL_OK.contains(c) => {
                out.push(RawToken::Literal(c.to_string()));
                i += 1;
            }
            _ => {
                errors.push(FormatError::UnrecognizedCharacter {
                    ch: c,
                    fmt: fmt.to_string(),
                });
                // Reported but kept: bare words still render as text.
                out.push(RawToken::Literal(c.to_string()));
                i += 1;
            }
        }
    }
    (out, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(fmt: &str) -> Vec<RawToken> {
        let (t, e) = tokenize(fmt);
        assert!(e.is_empty(), "unexpected errors for {fmt:?}: {e:?}");
        t
    }

    #[test]
    fn date_runs_lowercase_and_count() {
        assert_eq!(
            toks("YYYY-mm-DD"),
            vec![
                RawToken::DateRun('y', 4),
                RawToken::Literal("-".into()),
                RawToken::DateRun('m', 2),
                RawToken::Literal("-".into()),
                RawToken::DateRun('d', 2),
            ]
        );
    }

    #[test]
    fn general_is_matched_case_insensitively() {
        assert_eq!(toks("general"), vec![RawToken::General]);
        assert_eq!(toks("GENERAL"), vec![RawToken::General]);
    }

    #[test]
    fn number_runs_swallow_decimals_and_exponents() {
        assert_eq!(toks("#,##0.00"), vec![RawToken::NumRun("#,##0.00".into())]);
        assert_eq!(toks("0.00E+00"), vec![RawToken::NumRun("0.00E+00".into())]);
    }

    #[test]
    fn second_decimal_point_is_a_literal() {
        assert_eq!(
            toks("0.0.0"),
            vec![
                RawToken::NumRun("0.0".into()),
                RawToken::Literal(".".into()),
                RawToken::NumRun("0".into()),
            ]
        );
    }

    #[test]
    fn subseconds_after_date_tokens() {
        assert_eq!(
            toks("ss.00"),
            vec![RawToken::DateRun('s', 2), RawToken::SubSecond(2)]
        );
        // Without date context the same text is a number run.
        assert_eq!(toks(".00"), vec![RawToken::NumRun(".00".into())]);
    }

    #[test]
    fn date_field_dots_are_literals() {
        assert_eq!(
            toks("dd.mm.yyyy"),
            vec![
                RawToken::DateRun('d', 2),
                RawToken::Literal(".".into()),
                RawToken::DateRun('m', 2),
                RawToken::Literal(".".into()),
                RawToken::DateRun('y', 4),
            ]
        );
    }

    #[test]
    fn bracket_blocks() {
        assert_eq!(toks("[hh]"), vec![RawToken::AbsTime("hh".into())]);
        assert_eq!(toks("[HH]"), vec![RawToken::AbsTime("hh".into())]);
        assert_eq!(toks("[Red]"), vec![RawToken::Color("Red".into())]);
        assert_eq!(toks("[DBNum2]"), vec![RawToken::DbNum(2)]);
        assert_eq!(
            toks("[>=100]"),
            vec![RawToken::Condition {
                op: ">=".into(),
                operand: 100.0
            }]
        );
    }

    #[test]
    fn locale_tags() {
        assert_eq!(
            toks("[$€-407]"),
            vec![RawToken::LocaleTag {
                symbol: Some("€".into()),
                lcid: Some(0x407),
                numerals: None,
            }]
        );
        assert_eq!(
            toks("[$-409]"),
            vec![RawToken::LocaleTag {
                symbol: None,
                lcid: Some(0x409),
                numerals: None,
            }]
        );
        assert_eq!(
            toks("[$-130000]"),
            vec![RawToken::LocaleTag {
                symbol: None,
                lcid: Some(0),
                numerals: Some(0x13),
            }]
        );
    }

    #[test]
    fn am_pm_markers() {
        assert_eq!(
            toks("h:mm AM/PM"),
            vec![
                RawToken::DateRun('h', 1),
                RawToken::Literal(":".into()),
                RawToken::DateRun('m', 2),
                RawToken::Space,
                RawToken::AmPm,
            ]
        );
        assert_eq!(toks("A/P"), vec![RawToken::AmPmShort("A/P".into())]);
        assert_eq!(toks("a/p"), vec![RawToken::AmPmShort("a/p".into())]);
    }

    #[test]
    fn calendar_selectors() {
        assert_eq!(
            toks("B2yyyy"),
            vec![RawToken::Calendar(2), RawToken::DateRun('y', 4)]
        );
    }

    #[test]
    fn quoted_and_escaped_literals() {
        assert_eq!(
            toks("0\"abc\""),
            vec![
                RawToken::NumRun("0".into()),
                RawToken::Literal("abc".into())
            ]
        );
        assert_eq!(
            toks("\\d0"),
            vec![
                RawToken::Literal("d".into()),
                RawToken::NumRun("0".into())
            ]
        );
        assert_eq!(
            toks("_-0"),
            vec![
                RawToken::Literal(" ".into()),
                RawToken::NumRun("0".into())
            ]
        );
    }

    #[test]
    fn fill_and_fraction_pieces() {
        assert_eq!(
            toks("* 0"),
            vec![RawToken::Fill(' '), RawToken::NumRun("0".into())]
        );
        assert_eq!(
            toks("# ?/12"),
            vec![
                RawToken::NumRun("#".into()),
                RawToken::Space,
                RawToken::NumRun("?".into()),
                RawToken::Slash,
                RawToken::DenRun("12".into()),
            ]
        );
    }

    #[test]
    fn unterminated_string_is_reported() {
        let (_, errs) = tokenize("0\"abc");
        assert_eq!(errs, vec![FormatError::UnterminatedString("0\"abc".into())]);
    }

    #[test]
    fn unknown_characters_are_reported_and_kept() {
        let (t, errs) = tokenize("0N");
        assert_eq!(
            t,
            vec![RawToken::NumRun("0".into()), RawToken::Literal("N".into())]
        );
        assert!(matches!(
            errs.as_slice(),
            [FormatError::UnrecognizedCharacter { ch: 'N', .. }]
        ));
    }

    #[test]
    fn bare_words_become_literal_runs() {
        let (t, errs) = tokenize("ZERO");
        assert_eq!(
            t,
            vec![
                RawToken::Literal("Z".into()),
                RawToken::Literal("E".into()),
                RawToken::Literal("R".into()),
                RawToken::Literal("O".into()),
            ]
        );
        assert_eq!(errs.len(), 3);
    }
}
