//! Built-in locale tables.

use super::{Era, Locale, Numerals};
use std::collections::HashMap;

fn strs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn days(d: &[(&str, &str); 7]) -> Vec<(String, String)> {
    d.iter().map(|(a, f)| (a.to_string(), f.to_string())).collect()
}

fn months(m: &[(&str, &str, &str); 12]) -> Vec<(String, String, String)> {
    m.iter()
        .map(|(n, a, w)| (n.to_string(), a.to_string(), w.to_string()))
        .collect()
}

pub(super) fn en_us() -> Locale {
    Locale {
        tag: "en-US".into(),
        decimal_point: ".".into(),
        thousands_sep: ",".into(),
        grouping: vec![3, 0],
        currency_symbol: "$".into(),
        plus_sign: "+".into(),
        minus_sign: "-".into(),
        percent_sign: "%".into(),
        time_separator: ":".into(),
        exponential: "E".into(),
        time_format: "h:mm:ss AM/PM".into(),
        short_date_format: "m/dd/yyyy".into(),
        long_date_format: "dddd, mmmm dd, yyyy".into(),
        am: "AM".into(),
        pm: "PM".into(),
        a: "A".into(),
        p: "P".into(),
        days: days(&[
            ("Sun", "Sunday"),
            ("Mon", "Monday"),
            ("Tue", "Tuesday"),
            ("Wed", "Wednesday"),
            ("Thu", "Thursday"),
            ("Fri", "Friday"),
            ("Sat", "Saturday"),
        ]),
        months: months(&[
            ("J", "Jan", "January"),
            ("F", "Feb", "February"),
            ("M", "Mar", "March"),
            ("A", "Apr", "April"),
            ("M", "May", "May"),
            ("J", "Jun", "June"),
            ("J", "Jul", "July"),
            ("A", "Aug", "August"),
            ("S", "Sep", "September"),
            ("O", "Oct", "October"),
            ("N", "Nov", "November"),
            ("D", "Dec", "December"),
        ]),
        frac_digits: 2,
        p_cs_precedes: true,
        n_cs_precedes: true,
        p_sep_by_space: 0,
        n_sep_by_space: 0,
        p_sign_posn: 3,
        n_sign_posn: 0,
        positive_sign: "".into(),
        negative_sign: "-".into(),
        eras: Vec::new(),
        dbnum: HashMap::new(),
    }
}

pub(super) fn de_de() -> Locale {
    Locale {
        tag: "de-DE".into(),
        decimal_point: ",".into(),
        thousands_sep: ".".into(),
        currency_symbol: "€".into(),
        time_format: "hh:mm:ss".into(),
        short_date_format: "dd.mm.yyyy".into(),
        long_date_format: "dddd, d. mmmm yyyy".into(),
        days: days(&[
            ("So", "Sonntag"),
            ("Mo", "Montag"),
            ("Di", "Dienstag"),
            ("Mi", "Mittwoch"),
            ("Do", "Donnerstag"),
            ("Fr", "Freitag"),
            ("Sa", "Samstag"),
        ]),
        months: months(&[
            ("J", "Jan", "Januar"),
            ("F", "Feb", "Februar"),
            ("M", "Mär", "März"),
            ("A", "Apr", "April"),
            ("M", "Mai", "Mai"),
            ("J", "Jun", "Juni"),
            ("J", "Jul", "Juli"),
            ("A", "Aug", "August"),
            ("S", "Sep", "September"),
            ("O", "Okt", "Oktober"),
            ("N", "Nov", "November"),
            ("D", "Dez", "Dezember"),
        ]),
        p_cs_precedes: false,
        n_cs_precedes: false,
        p_sep_by_space: 1,
        n_sep_by_space: 1,
        p_sign_posn: 1,
        n_sign_posn: 1,
        ..en_us()
    }
}

pub(super) fn fr_fr() -> Locale {
    Locale {
        tag: "fr-FR".into(),
        decimal_point: ",".into(),
        thousands_sep: "\u{a0}".into(),
        currency_symbol: "€".into(),
        time_format: "hh:mm:ss".into(),
        short_date_format: "dd/mm/yyyy".into(),
        long_date_format: "dddd d mmmm yyyy".into(),
        days: days(&[
            ("dim.", "dimanche"),
            ("lun.", "lundi"),
            ("mar.", "mardi"),
            ("mer.", "mercredi"),
            ("jeu.", "jeudi"),
            ("ven.", "vendredi"),
            ("sam.", "samedi"),
        ]),
        months: months(&[
            ("j", "janv.", "janvier"),
            ("f", "févr.", "février"),
            ("m", "mars", "mars"),
            ("a", "avr.", "avril"),
            ("m", "mai", "mai"),
            ("j", "juin", "juin"),
            ("j", "juil.", "juillet"),
            ("a", "août", "août"),
            ("s", "sept.", "septembre"),
            ("o", "oct.", "octobre"),
            ("n", "nov.", "novembre"),
            ("d", "déc.", "décembre"),
        ]),
        p_cs_precedes: false,
        n_cs_precedes: false,
        p_sep_by_space: 1,
        n_sep_by_space: 1,
        p_sign_posn: 1,
        n_sign_posn: 1,
        ..en_us()
    }
}

fn cjk_positional() -> Numerals {
    Numerals {
        digits: strs(&["０", "１", "２", "３", "４", "５", "６", "７", "８", "９"]),
        powers: Vec::new(),
        exp_plus: "E+".into(),
        exp_minus: "E-".into(),
        exp: "E".into(),
    }
}

pub(super) fn ja_jp() -> Locale {
    let mut dbnum = HashMap::new();
    dbnum.insert(
        1,
        Numerals {
            digits: strs(&["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"]),
            powers: strs(&["十", "百", "千", "万"]),
            exp_plus: "E+".into(),
            exp_minus: "E-".into(),
            exp: "E".into(),
        },
    );
    dbnum.insert(
        2,
        Numerals {
            digits: strs(&["〇", "壱", "弐", "参", "四", "伍", "六", "七", "八", "九"]),
            powers: strs(&["拾", "百", "阡", "萬"]),
            exp_plus: "E+".into(),
            exp_minus: "E-".into(),
            exp: "E".into(),
        },
    );
    dbnum.insert(3, cjk_positional());
    Locale {
        tag: "ja-JP".into(),
        currency_symbol: "¥".into(),
        time_format: "h:mm:ss".into(),
        short_date_format: "yyyy/mm/dd".into(),
        long_date_format: "yyyy\"年\"m\"月\"d\"日\"".into(),
        am: "午前".into(),
        pm: "午後".into(),
        a: "午前".into(),
        p: "午後".into(),
        days: days(&[
            ("日", "日曜日"),
            ("月", "月曜日"),
            ("火", "火曜日"),
            ("水", "水曜日"),
            ("木", "木曜日"),
            ("金", "金曜日"),
            ("土", "土曜日"),
        ]),
        months: months(&[
            ("1", "1月", "1月"),
            ("2", "2月", "2月"),
            ("3", "3月", "3月"),
            ("4", "4月", "4月"),
            ("5", "5月", "5月"),
            ("6", "6月", "6月"),
            ("7", "7月", "7月"),
            ("8", "8月", "8月"),
            ("9", "9月", "9月"),
            ("10", "10月", "10月"),
            ("11", "11月", "11月"),
            ("12", "12月", "12月"),
        ]),
        frac_digits: 0,
        eras: vec![
            Era {
                start: (2019, 5, 1),
                g: "R".into(),
                gg: "令".into(),
                ggg: "令和".into(),
            },
            Era {
                start: (1989, 1, 8),
                g: "H".into(),
                gg: "平".into(),
                ggg: "平成".into(),
            },
            Era {
                start: (1926, 12, 25),
                g: "S".into(),
                gg: "昭".into(),
                ggg: "昭和".into(),
            },
            Era {
                start: (1912, 7, 30),
                g: "T".into(),
                gg: "大".into(),
                ggg: "大正".into(),
            },
            Era {
                start: (1868, 1, 25),
                g: "M".into(),
                gg: "明".into(),
                ggg: "明治".into(),
            },
        ],
        dbnum,
        ..en_us()
    }
}

pub(super) fn zh_cn() -> Locale {
    let mut dbnum = HashMap::new();
    dbnum.insert(
        1,
        Numerals {
            digits: strs(&["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"]),
            powers: strs(&["十", "百", "千", "万"]),
            exp_plus: "E+".into(),
            exp_minus: "E-".into(),
            exp: "E".into(),
        },
    );
    dbnum.insert(
        2,
        Numerals {
            digits: strs(&["零", "壹", "贰", "叁", "肆", "伍", "陆", "柒", "捌", "玖"]),
            powers: strs(&["拾", "佰", "仟", "万"]),
            exp_plus: "E+".into(),
            exp_minus: "E-".into(),
            exp: "E".into(),
        },
    );
    dbnum.insert(3, cjk_positional());
    Locale {
        tag: "zh-CN".into(),
        currency_symbol: "¥".into(),
        time_format: "h:mm:ss".into(),
        short_date_format: "yyyy/m/d".into(),
        long_date_format: "yyyy\"年\"m\"月\"d\"日\"".into(),
        am: "上午".into(),
        pm: "下午".into(),
        a: "上午".into(),
        p: "下午".into(),
        days: days(&[
            ("周日", "星期日"),
            ("周一", "星期一"),
            ("周二", "星期二"),
            ("周三", "星期三"),
            ("周四", "星期四"),
            ("周五", "星期五"),
            ("周六", "星期六"),
        ]),
        months: months(&[
            ("1", "1月", "一月"),
            ("2", "2月", "二月"),
            ("3", "3月", "三月"),
            ("4", "4月", "四月"),
            ("5", "5月", "五月"),
            ("6", "6月", "六月"),
            ("7", "7月", "七月"),
            ("8", "8月", "八月"),
            ("9", "9月", "九月"),
            ("10", "10月", "十月"),
            ("11", "11月", "十一月"),
            ("12", "12月", "十二月"),
        ]),
        dbnum,
        ..en_us()
    }
}

pub(super) fn th_th() -> Locale {
    Locale {
        tag: "th-TH".into(),
        currency_symbol: "฿".into(),
        time_format: "h:mm:ss".into(),
        short_date_format: "d/m/yyyy".into(),
        long_date_format: "d mmmm yyyy".into(),
        days: days(&[
            ("อา.", "อาทิตย์"),
            ("จ.", "จันทร์"),
            ("อ.", "อังคาร"),
            ("พ.", "พุธ"),
            ("พฤ.", "พฤหัสบดี"),
            ("ศ.", "ศุกร์"),
            ("ส.", "เสาร์"),
        ]),
        months: months(&[
            ("ม.ค.", "ม.ค.", "มกราคม"),
            ("ก.พ.", "ก.พ.", "กุมภาพันธ์"),
            ("มี.ค.", "มี.ค.", "มีนาคม"),
            ("เม.ย.", "เม.ย.", "เมษายน"),
            ("พ.ค.", "พ.ค.", "พฤษภาคม"),
            ("มิ.ย.", "มิ.ย.", "มิถุนายน"),
            ("ก.ค.", "ก.ค.", "กรกฎาคม"),
            ("ส.ค.", "ส.ค.", "สิงหาคม"),
            ("ก.ย.", "ก.ย.", "กันยายน"),
            ("ต.ค.", "ต.ค.", "ตุลาคม"),
            ("พ.ย.", "พ.ย.", "พฤศจิกายน"),
            ("ธ.ค.", "ธ.ค.", "ธันวาคม"),
        ]),
        ..en_us()
    }
}

/// Digit systems selected by the high byte of a `[$-...]` LCID field.
pub(super) fn numerals_for(id: u8) -> Option<Numerals> {
    let digits = match id {
        // Arabic-Indic.
        0x02 => &["٠", "١", "٢", "٣", "٤", "٥", "٦", "٧", "٨", "٩"],
        // Extended (Persian) Arabic-Indic.
        0x03 => &["۰", "۱", "۲", "۳", "۴", "۵", "۶", "۷", "۸", "۹"],
        // Thai.
        0x13 => &["๐", "๑", "๒", "๓", "๔", "๕", "๖", "๗", "๘", "๙"],
        _ => return None,
    };
    Some(Numerals {
        digits: strs(digits),
        powers: Vec::new(),
        exp_plus: "E+".into(),
        exp_minus: "E-".into(),
        exp: "E".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_differ_by_locale() {
        assert_eq!(en_us().decimal_point, ".");
        assert_eq!(de_de().decimal_point, ",");
        assert_eq!(de_de().thousands_sep, ".");
        assert_eq!(fr_fr().thousands_sep, "\u{a0}");
    }

    #[test]
    fn numeral_systems() {
        let th = numerals_for(0x13).unwrap();
        assert!(th.positional());
        assert_eq!(th.digit('7'), "๗");
        assert!(numerals_for(0x7F).is_none());
    }

    #[test]
    fn dbnum_tables_present() {
        assert!(ja_jp().dbnum.contains_key(&1));
        assert!(zh_cn().dbnum.contains_key(&3));
        assert!(!zh_cn().dbnum[&1].positional());
        assert!(zh_cn().dbnum[&3].positional());
    }
}
