//! Engine and per-call options: error policies, widths, locales and
//! separator overrides.

use cellfmt::{
    Align, ErrorPolicy, FormatError, FormatOptions, Formatter, RenderOptions,
};

#[test]
fn warn_policy_keeps_bad_characters_as_text() {
    let f = Formatter::default();
    assert_eq!(f.format("0N", 5.0), "5N");
}

#[test]
fn raise_policy_surfaces_scan_errors() {
    let f = Formatter::new(FormatOptions {
        errors: ErrorPolicy::Raise,
        ..FormatOptions::default()
    });
    assert!(matches!(
        f.try_format("0N", 5.0),
        Err(FormatError::UnrecognizedCharacter { ch: 'N', .. })
    ));
    // The infallible entry point turns the error into a poured-out cell.
    assert_eq!(f.format("0N", 5.0), "##########");
}

#[test]
fn pounds_policy_pours_out_the_cell() {
    let f = Formatter::new(FormatOptions {
        errors: ErrorPolicy::Pounds,
        ..FormatOptions::default()
    });
    assert_eq!(f.format("0N", 5.0), "##########");
}

#[test]
fn ignore_policy_stays_silent() {
    let f = Formatter::new(FormatOptions {
        errors: ErrorPolicy::Ignore,
        ..FormatOptions::default()
    });
    assert_eq!(f.format("0N", 5.0), "5N");
}

#[test]
fn default_width_applies_to_every_call() {
    let f = Formatter::new(FormatOptions {
        default_width: Some(10),
        ..FormatOptions::default()
    });
    assert_eq!(f.format("0", 1.0), "         1");
    // A per-call width wins over the engine default.
    assert_eq!(f.format_with("0", 1.0, &RenderOptions::width(4)), "   1");
}

#[test]
fn text_fills_left_under_a_width() {
    let f = Formatter::default();
    assert_eq!(f.format_with("@", "hi", &RenderOptions::width(6)), "hi    ");
    let opts = RenderOptions {
        width: Some(6),
        align: Some(Align::Right),
        ..RenderOptions::default()
    };
    assert_eq!(f.format_with("@", "hi", &opts), "    hi");
}

#[test]
fn per_call_locale_swaps_the_separators() {
    let f = Formatter::default();
    let de = RenderOptions {
        locale: Some("de-DE".into()),
        ..RenderOptions::default()
    };
    assert_eq!(f.format_with("#,##0.00", 1234.5, &de), "1.234,50");
}

#[test]
fn separator_overrides_beat_the_locale() {
    let f = Formatter::default();
    let opts = RenderOptions {
        decimal_separator: Some(",".into()),
        ..RenderOptions::default()
    };
    assert_eq!(f.format_with("0.00", 1.5, &opts), "1,50");
    let f = Formatter::new(FormatOptions {
        decimal_separator: Some(",".into()),
        thousands_separator: Some(" ".into()),
        ..FormatOptions::default()
    });
    assert_eq!(f.format("#,##0.00", 1234.5), "1 234,50");
}

#[test]
fn unknown_locales_fall_back_or_raise() {
    let f = Formatter::default();
    let odd = RenderOptions {
        locale: Some("xx-XX".into()),
        ..RenderOptions::default()
    };
    assert_eq!(f.format_with("0", 1.0, &odd), "1");
    let strict = Formatter::new(FormatOptions {
        errors: ErrorPolicy::Raise,
        ..FormatOptions::default()
    });
    assert!(matches!(
        strict.try_format_with("0", 1.0, &odd),
        Err(FormatError::UnknownLocale(_))
    ));
}

#[test]
fn date_nf_replaces_the_short_date() {
    let f = Formatter::new(FormatOptions {
        date_nf: Some("yyyy-mm-dd".into()),
        ..FormatOptions::default()
    });
    assert_eq!(f.format(14u32, 43_880.0), "2020-02-19");
    assert_eq!(f.format("m/d/yy", 43_880.0), "2020-02-19");
}

#[cfg(feature = "chrono")]
mod chrono_values {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime};

    #[test]
    fn dates_encode_to_serials() {
        let f = Formatter::default();
        let d = NaiveDate::from_ymd_opt(2020, 2, 19).unwrap();
        assert_eq!(f.format(14u32, d), "2/19/2020");
        assert_eq!(f.format("yyyy-mm-dd", d), "2020-02-19");
    }

    #[test]
    fn times_are_day_fractions() {
        let f = Formatter::default();
        let t = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert_eq!(f.format("h:mm AM/PM", t), "6:00 PM");
    }

    #[test]
    fn durations_roll_past_midnight() {
        let f = Formatter::default();
        assert_eq!(f.format("[hh]:mm", Duration::hours(36)), "36:00");
    }

    #[test]
    fn general_shows_dates_as_short_dates() {
        let f = Formatter::default();
        let d = NaiveDate::from_ymd_opt(2020, 2, 19).unwrap();
        assert_eq!(f.format("General", d), "2/19/2020");
    }
}
