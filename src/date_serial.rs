//! Serial date codec.
//!
//! Spreadsheet serials count days from an epoch: in the 1900 system serial 1
//! is January 1, 1900, and serial 60 is the phantom February 29, 1900 that
//! Lotus 1-2-3 invented and everyone since has preserved. The 1904 system
//! starts at January 1, 1904 with no phantom day. Fractions of a day are
//! time of day.
//!
//! Calendar conversions use days-since-1970 civil-date arithmetic rather
//! than a calendar library, because the phantom day and serial 0 ("January
//! 0, 1900") do not exist in any real calendar.

use crate::options::DateSystem;

/// Largest representable serial: December 31, 9999.
pub const MAX_SERIAL: f64 = 2_958_465.0;

/// A serial number decoded into calendar and clock fields.
///
/// `hour`, `minute` and `second` are signed so that negative elapsed-time
/// values survive the split. `weekday` is 0 for Sunday.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateParts {
    /// Whole days of the raw serial (before epoch adjustments).
    pub days: i64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    /// Sub-second remainder in `[0, 1)` days' worth of seconds.
    pub subsec: f64,
    pub weekday: u32,
}

/// Decode a serial number.
///
/// Returns `None` for serials past [`MAX_SERIAL`], and for negative serials
/// unless `abstime` is set (elapsed-time formats like `[h]:mm` accept
/// negative durations).
///
/// With `hijri` set the calendar fields approximate the Islamic calendar the
/// way legacy spreadsheets do (a fixed 581-year offset), including remapped
/// phantom-day anchors.
pub fn decode_serial(
    v: f64,
    date_system: DateSystem,
    hijri: bool,
    abstime: bool,
) -> Option<DateParts> {
    if v > MAX_SERIAL || (v < 0.0 && !abstime) {
        return None;
    }
    let mut days = v.trunc() as i64;
    let mut dt = days;
    let mut time = (86400.0 * (v - dt as f64)) as i64;
    let mut subsec = 86400.0 * (v - dt as f64) - time as f64;
    if subsec.abs() < 1e-6 {
        subsec = 0.0;
    }
    if date_system == DateSystem::Date1904 {
        dt += 1462;
    }
    // A residue within rounding distance of a whole second carries into the
    // clock fields instead of surviving as .9999....
    if subsec > 0.9999 {
        subsec = 0.0;
        time += 1;
        if time == 86400 {
            time = 0;
            dt += 1;
            days += 1;
        }
    } else if subsec < -0.9999 {
        subsec = 0.0;
        time -= 1;
        if time <= -86400 {
            time = 0;
            dt -= 1;
            days -= 1;
        }
    }

    let (mut year, month, day, weekday);
    if dt == 60 {
        // The phantom leap day.
        let (y, m, d) = if hijri { (1317, 10, 29) } else { (1900, 2, 29) };
        year = y;
        month = m;
        day = d;
        weekday = 3;
    } else if dt == 0 {
        let (y, m, d) = if hijri { (1317, 8, 29) } else { (1900, 1, 0) };
        year = y;
        month = m;
        day = d;
        weekday = 6;
    } else {
        let d2 = if dt > 60 { dt - 1 } else { dt };
        let (y, m, d) = civil_from_days(d2 - 25568);
        year = y;
        month = m;
        day = d;
        // Serial 1 is a Monday; before the phantom day the week shifts back
        // one because serial 0 occupies the Sunday slot.
        let mut dow = d2.rem_euclid(7) as u32;
        if d2 < 60 {
            dow = (dow + 6) % 7;
        }
        if hijri {
            year -= 581;
        }
        weekday = dow;
    }

    let t = time / 60;
    let second = time - t * 60;
    let minute = t - (t / 60) * 60;
    let hour = t / 60;

    Some(DateParts {
        days,
        year,
        month,
        day,
        hour,
        minute,
        second,
        subsec,
        weekday,
    })
}

/// Encode a calendar date plus day fraction as a serial number.
pub fn encode_serial(
    year: i32,
    month: u32,
    day: u32,
    day_fraction: f64,
    date_system: DateSystem,
) -> f64 {
    let mut dt = days_from_civil(year, month, day) + 25568;
    if dt >= 60 {
        dt += 1;
    }
    if date_system == DateSystem::Date1904 {
        dt -= 1462;
    }
    dt as f64 + day_fraction
}

// Howard Hinnant's civil-date algorithms, days measured from 1970-01-01.

fn civil_from_days(z: i64) -> (i32, u32, u32) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let y = if m <= 2 { y + 1 } else { y };
    (y as i32, m, d)
}

fn days_from_civil(y: i32, m: u32, d: u32) -> i64 {
    let y = y as i64 - if m <= 2 { 1 } else { 0 };
    let m = m as i64;
    let d = d as i64;
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
