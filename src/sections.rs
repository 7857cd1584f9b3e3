//! Section handling: splitting a format code on `;`, deciding whether a
//! section is a date format, and choosing the section for a value.

use crate::error::FormatError;
use crate::tokenizer::{tokenize, RawToken};

/// Split a format code into its `;`-separated sections, honoring quoting
/// and escapes.
pub(crate) fn split_sections(fmt: &str) -> (Vec<String>, Vec<FormatError>) {
    let chars: Vec<char> = fmt.chars().collect();
    let mut out = Vec::new();
    let mut errors = Vec::new();
    let mut cur = String::new();
    let mut in_quote = false;
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                in_quote = !in_quote;
                cur.push(c);
            }
            '_' | '*' | '\\' if !in_quote => {
                cur.push(c);
                if i + 1 < chars.len() {
                    cur.push(chars[i + 1]);
                    i += 1;
                }
            }
            ';' if !in_quote => {
                out.push(std::mem::take(&mut cur));
            }
            _ => cur.push(c),
        }
        i += 1;
    }
    if in_quote {
        errors.push(FormatError::UnterminatedString(fmt.to_string()));
    }
    out.push(cur);
    (out, errors)
}

/// Does this section render its value as a date or time?
pub(crate) fn fmt_is_date(fmt: &str) -> bool {
    let chars: Vec<char> = fmt.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        match c {
            'G' | 'g'
                if chars.len() - i >= 7
                    && chars[i..i + 7]
                        .iter()
                        .collect::<String>()
                        .eq_ignore_ascii_case("General") =>
            {
                i += 7;
            }
            '"' => {
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    i += 1;
                }
                i += 1;
            }
            '\\' | '_' => i += 2,
            'B' | 'b' if i + 1 < chars.len() && (chars[i + 1] == '1' || chars[i + 1] == '2') => {
                return true;
            }
            'M' | 'D' | 'Y' | 'H' | 'S' | 'E' | 'm' | 'd' | 'y' | 'h' | 's' | 'e' | 'g' | 'B'
            | 'b' => return true,
            'A' | 'a' | '上' => {
                let take =
                    |n: usize| -> String { chars[i..(i + n).min(chars.len())].iter().collect() };
                let five = take(5);
                if five.eq_ignore_ascii_case("AM/PM")
                    || five == "上午/下午"
                    || take(3).eq_ignore_ascii_case("A/P")
                {
                    return true;
                }
                i += 1;
            }
            '[' => {
                let mut content = String::new();
                i += 1;
                while i < chars.len() && chars[i] != ']' {
                    content.push(chars[i]);
                    i += 1;
                }
                i += 1;
                if !content.is_empty()
                    && content.chars().all(|c| {
                        matches!(
                            c,
                            'H' | 'h'
                                | 'M'
                                | 'm'
                                | 'S'
                                | 's'
                                | '\u{0E0A}'
                                | '\u{0E19}'
                                | '\u{0E17}'
                        )
                    })
                {
                    return true;
                }
            }
            // Digit runs swallow their exponent markers so a lone 'E' in
            // "0.00E+00" is not mistaken for an era token.
            '.' | '0' | '#' | '?' => {
                i += 1;
                while i < chars.len() && matches!(chars[i], '0'..='9' | '#' | '?' | '.' | ',' | 'E' | '+' | '-' | '%')
                {
                    i += 1;
                }
            }
            '1'..='9' => {
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            '*' => i += 2,
            _ => i += 1,
        }
    }
    false
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SectionChoice {
    /// How many numeric sections the code declared; a value above 1 means
    /// the chosen section already encodes the sign.
    pub flen: usize,
    pub section: String,
}

fn first_condition(section: &str) -> Option<(String, f64)> {
    let (tokens, _) = tokenize(section);
    tokens.into_iter().find_map(|t| match t {
        RawToken::Condition { op, operand } => Some((op, operand)),
        _ => None,
    })
}

fn chkcond(v: f64, cond: &(String, f64)) -> bool {
    let (op, d) = (cond.0.as_str(), cond.1);
    match op {
        "=" => v == d,
        ">" => v > d,
        "<" => v < d,
        ">=" => v >= d,
        "<=" => v <= d,
        "<>" => v != d,
        _ => false,
    }
}

/// True when a condition can only ever match negative values; the explicit
/// sign in such a section replaces the automatic one.
pub(crate) fn negcond(op: &str, d: f64) -> bool {
    match op {
        "=" => d < 0.0,
        "<" => d <= 0.0,
        "<=" => d < 0.0,
        _ => false,
    }
}

/// Pick the section of `fmt` that formats `v`. Numbers carry their value;
/// text, booleans and blanks pass `None`.
///
/// Returns `None` when a negative value satisfies no condition section and
/// there is no fallback, which renders as a cell full of `#`.
pub(crate) fn choose_section(
    fmt: &str,
    v: Option<f64>,
    errors: &mut Vec<FormatError>,
) -> Option<SectionChoice> {
    let (mut sections, errs) = split_sections(fmt);
    errors.extend(errs);
    let mut l = sections.len();
    let lat = sections[sections.len() - 1].contains('@');
    if l < 4 && lat {
        l -= 1;
    }
    if sections.len() > 4 {
        errors.push(FormatError::TooManySections(fmt.to_string()));
        sections.truncate(4);
    }

    let v = match v {
        Some(v) => v,
        None => {
            let section = if sections.len() == 4 || lat {
                sections[sections.len() - 1].clone()
            } else {
                "@".to_string()
            };
            return Some(SectionChoice { flen: 4, section });
        }
    };

    let s = |i: usize| sections[i].clone();
    let fmt4: [String; 4] = match sections.len() {
        1 => {
            if lat {
                ["General".into(), "General".into(), "General".into(), s(0)]
            } else {
                [s(0), s(0), s(0), "@".into()]
            }
        }
        2 => {
            if lat {
                [s(0), s(0), s(0), s(1)]
            } else {
                [s(0), s(1), s(0), "@".into()]
            }
        }
        3 => {
            if lat {
                [s(0), s(1), s(0), s(2)]
            } else {
                [s(0), s(1), s(2), "@".into()]
            }
        }
        _ => [s(0), s(1), s(2), s(3)],
    };

    let ff = if v > 0.0 {
        fmt4[0].clone()
    } else if v < 0.0 {
        fmt4[1].clone()
    } else {
        fmt4[2].clone()
    };

    let m1 = first_condition(&fmt4[0]);
    let m2 = first_condition(&fmt4[1]);
    if m1.is_none() && m2.is_none() {
        return Some(SectionChoice {
            flen: l,
            section: ff,
        });
    }
    if v > 0.0 && m1.is_none() {
        return Some(SectionChoice {
            flen: l,
            section: ff,
        });
    }
    if let Some(c) = &m1 {
        if chkcond(v, c) {
            return Some(SectionChoice {
                flen: 1,
                section: fmt4[0].clone(),
            });
        }
    }
    if let Some(c) = &m2 {
        if chkcond(v, c) {
            return Some(SectionChoice {
                flen: 1,
                section: fmt4[1].clone(),
            });
        }
    }
    if m2.is_none() && v < 0.0 {
        return Some(SectionChoice {
            flen: if sections.len() >= 3 { l } else { 1 },
            section: fmt4[1].clone(),
        });
    }
    if sections.len() >= 3 {
        return Some(SectionChoice {
            flen: 1,
            section: fmt4[2].clone(),
        });
    }
    if v < 0.0 {
        return None;
    }
    let idx = if m1.is_some() && m2.is_some() { 2 } else { 1 };
    Some(SectionChoice {
        flen: l,
        section: fmt4[idx].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choose(fmt: &str, v: f64) -> Option<SectionChoice> {
        let mut errs = Vec::new();
        choose_section(fmt, Some(v), &mut errs)
    }

    #[test]
    fn splits_on_semicolons_outside_quotes() {
        let (s, e) = split_sections("0;-0;\"a;b\"");
        assert!(e.is_empty());
        assert_eq!(s, vec!["0", "-0", "\"a;b\""]);
    }

    #[test]
    fn escapes_protect_the_separator() {
        let (s, _) = split_sections("0\\;0;0");
        assert_eq!(s, vec!["0\\;0", "0"]);
    }

    #[test]
    fn date_detection() {
        assert!(fmt_is_date("yyyy-mm-dd"));
        assert!(fmt_is_date("[hh]:mm"));
        assert!(fmt_is_date("h:mm AM/PM"));
        assert!(fmt_is_date("B2yyyy"));
        assert!(!fmt_is_date("#,##0.00"));
        assert!(!fmt_is_date("0.00E+00"));
        assert!(!fmt_is_date("General"));
        assert!(!fmt_is_date("\"year\"0"));
    }

    #[test]
    fn sign_sections() {
        assert_eq!(choose("0;-0;ZERO", 5.0).unwrap().section, "0");
        assert_eq!(choose("0;-0;ZERO", -5.0).unwrap().section, "-0");
        assert_eq!(choose("0;-0;ZERO", 0.0).unwrap().section, "ZERO");
        assert_eq!(choose("0;-0;ZERO", -5.0).unwrap().flen, 3);
    }

    #[test]
    fn single_section_serves_all_signs() {
        let c = choose("0.0", -5.0).unwrap();
        assert_eq!(c.section, "0.0");
        assert_eq!(c.flen, 1);
    }

    #[test]
    fn text_gets_the_at_section() {
        let mut errs = Vec::new();
        let c = choose_section("0;-0;0;\"txt \"@", None, &mut errs).unwrap();
        assert_eq!(c.section, "\"txt \"@");
        assert_eq!(c.flen, 4);
        let c = choose_section("0;-0", None, &mut errs).unwrap();
        assert_eq!(c.section, "@");
    }

    #[test]
    fn conditions_route_values() {
        let f = "[>=100]\"big\"0;[<0]\"neg\"0;0";
        assert_eq!(choose(f, 150.0).unwrap().section, "[>=100]\"big\"0");
        assert_eq!(choose(f, -3.0).unwrap().section, "[<0]\"neg\"0");
        assert_eq!(choose(f, 50.0).unwrap().section, "0");
    }

    #[test]
    fn negative_without_matching_condition_pounds_out() {
        assert!(choose("[>=0]0;[>5]0", -1.0).is_none());
    }

    #[test]
    fn too_many_sections_is_reported() {
        let mut errs = Vec::new();
        choose_section("0;0;0;0;0", Some(1.0), &mut errs);
        assert!(errs
            .iter()
            .any(|e| matches!(e, FormatError::TooManySections(_))));
    }

    #[test]
    fn negative_only_conditions() {
        assert!(negcond("<", 0.0));
        assert!(negcond("=", -1.0));
        assert!(!negcond("<", 1.0));
        assert!(!negcond(">", -1.0));
    }
}
