//! Rendering of individual date and time tokens.

use crate::date_serial::DateParts;
use crate::error::FormatError;
use crate::math::{pad0, round_half_away, to_str};

use super::Render;

impl<'e> Render<'e> {
    /// Render one date token. `t` is the resolved token type (`'H'` for
    /// 24-hour, `'M'` for minutes and so on), `fmt` its literal text, and
    /// `ss0` the sub-second digit count in effect for the whole section.
    pub(super) fn write_date(
        &mut self,
        t: char,
        fmt: &str,
        val: &DateParts,
        ss0: usize,
    ) -> Result<String, FormatError> {
        let len = fmt.chars().count();
        match t {
            // Buddhist years are Gregorian plus 543.
            'b' | 'y' => {
                let y = if t == 'b' { val.year + 543 } else { val.year };
                Ok(if len <= 2 {
                    pad0(&y.rem_euclid(100).to_string(), 2)
                } else {
                    pad0(&y.rem_euclid(10000).to_string(), 4)
                })
            }
            'g' => {
                let n = len.min(3);
                match self.tmpl.era_for(val.year, val.month, val.day) {
                    Some((era, _)) => Ok(match n {
                        1 => era.g.clone(),
                        2 => era.gg.clone(),
                        _ => era.ggg.clone(),
                    }),
                    None => Ok(String::new()),
                }
            }
            'e' => {
                let y = match self.tmpl.era_for(val.year, val.month, val.day) {
                    Some((_, era_year)) => era_year,
                    None => val.year,
                };
                Ok(pad0(&y.to_string(), len))
            }
            'm' => match len {
                1 | 2 => Ok(pad0(&val.month.to_string(), len)),
                3 => Ok(self.month_name(val.month, 1)),
                5 => Ok(self.month_name(val.month, 0)),
                _ => Ok(self.month_name(val.month, 2)),
            },
            'd' => match len {
                1 | 2 => Ok(pad0(&val.day.to_string(), len)),
                3 => Ok(self.day_name(val.weekday, 0)),
                _ => Ok(self.day_name(val.weekday, 1)),
            },
            'h' => {
                if len > 2 {
                    self.soft(FormatError::BadHourFormat(fmt.to_string()))?;
                    return Ok(String::new());
                }
                let h = 1 + (val.hour + 11).rem_euclid(12);
                Ok(pad0(&h.to_string(), len))
            }
            'H' => {
                if len > 2 {
                    self.soft(FormatError::BadHourFormat(fmt.to_string()))?;
                    return Ok(String::new());
                }
                Ok(pad0(&val.hour.to_string(), len))
            }
            'M' => {
                if len > 2 {
                    self.soft(FormatError::BadMinuteFormat(fmt.to_string()))?;
                    return Ok(String::new());
                }
                Ok(pad0(&val.minute.to_string(), len))
            }
            's' => self.write_seconds(fmt, val, ss0),
            'Z' => self.write_elapsed(fmt, val),
            _ => {
                self.soft(FormatError::UnsupportedFormat(fmt.to_string()))?;
                Ok(String::new())
            }
        }
    }

    fn month_name(&self, month: u32, which: usize) -> String {
        let idx = (month.max(1) as usize - 1).min(11);
        let m = &self.tmpl.months[idx];
        match which {
            0 => m.0.clone(),
            1 => m.1.clone(),
            _ => m.2.clone(),
        }
    }

    fn day_name(&self, weekday: u32, which: usize) -> String {
        let d = &self.tmpl.days[(weekday as usize).min(6)];
        if which == 0 {
            d.0.clone()
        } else {
            d.1.clone()
        }
    }

    /// Seconds, either a plain `s`/`ss` run or a `.0`+ sub-second suffix.
    /// Rounding is shared: the same `ss0` rounds every seconds token in the
    /// section so `ss.0` never disagrees with itself.
    fn write_seconds(
        &mut self,
        fmt: &str,
        val: &DateParts,
        ss0: usize,
    ) -> Result<String, FormatError> {
        let len = fmt.chars().count();
        let is_run = fmt.chars().all(|c| c == 's');
        let zeros = match fmt.strip_prefix('.') {
            Some(z) if !z.is_empty() && z.chars().all(|c| c == '0') => Some(z.len()),
            _ => None,
        };
        let valid = (is_run && len <= 2) || matches!(zeros, Some(1..=3));
        if !valid {
            self.soft(FormatError::BadSecondFormat(fmt.to_string()))?;
            return Ok(String::new());
        }
        if val.subsec == 0.0 && is_run {
            return Ok(pad0(&val.second.to_string(), len));
        }
        let ss0 = ss0.min(3);
        let tt = 10i64.pow(ss0 as u32);
        let mut ss = round_half_away(tt as f64 * (val.second as f64 + val.subsec), 0) as i64;
        if ss >= 60 * tt {
            ss = 0;
        }
        if fmt == "s" {
            return Ok(if ss == 0 {
                "0".to_string()
            } else {
                to_str(ss as f64 / tt as f64)
            });
        }
        let o = pad0(&ss.to_string(), 2 + ss0);
        if is_run {
            return Ok(o[..2.min(o.len())].to_string());
        }
        let z = zeros.unwrap_or(0);
        Ok(format!(".{}", &o[2.min(o.len())..(2 + z).min(o.len())]))
    }

    /// `[h]`, `[mm]`, `[s]`... elapsed time since serial zero.
    fn write_elapsed(&mut self, fmt: &str, val: &DateParts) -> Result<String, FormatError> {
        let inner: String = fmt
            .trim_start_matches('[')
            .trim_end_matches(']')
            .chars()
            .map(|c| match c {
                '\u{0E0A}' => 'h',
                '\u{0E19}' => 'm',
                '\u{0E17}' => 's',
                other => other,
            })
            .collect();
        let hours = val.days * 24 + val.hour;
        let v = match inner.as_str() {
            "h" | "hh" => hours,
            "m" | "mm" => hours * 60 + val.minute,
            "s" | "ss" => (hours * 60 + val.minute) * 60 + val.second,
            _ => {
                self.soft(FormatError::BadAbsTimeFormat(fmt.to_string()))?;
                return Ok(String::new());
            }
        };
        let outl = if inner.chars().count() == 1 { 1 } else { 2 };
        Ok(pad0(&v.to_string(), outl))
    }
}
