//! en-us date/time formatting of epoch-millisecond values.
//!
//! Mirrors `Intl.DateTimeFormat("en-us", options)` rendered in UTC:
//! `M/D/YYYY` for the date part, `h:mm:ss AM/PM` for the time part, joined
//! by `", "`.

use super::options::{DatePart, FormatOptions};

const MS_PER_DAY: f64 = 86_400_000.0;
/// Julian Day Number of 1970-01-01.
const UNIX_EPOCH_JDN: i64 = 2_440_588;
/// Largest time value a JS `Date` can hold, in either direction.
const MAX_EPOCH_MS: f64 = 8.64e15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    year: Option<DatePart>,
    month: Option<DatePart>,
    day: Option<DatePart>,
    hour: Option<DatePart>,
    minute: Option<DatePart>,
    second: Option<DatePart>,
    hour12: bool,
}

/// Calendar components of one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Civil {
    year: i64,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl DateTimeFormat {
    pub fn new(options: &FormatOptions) -> Self {
        let mut fmt = Self {
            year: options.year,
            month: options.month,
            day: options.day,
            hour: options.hour,
            minute: options.minute,
            second: options.second,
            hour12: options.hour12.unwrap_or(true),
        };

        // With no components requested, Intl falls back to a numeric date.
        if !fmt.has_date() && !fmt.has_time() {
            fmt.year = Some(DatePart::Numeric);
            fmt.month = Some(DatePart::Numeric);
            fmt.day = Some(DatePart::Numeric);
        }
        fmt
    }

    fn has_date(&self) -> bool {
        self.year.is_some() || self.month.is_some() || self.day.is_some()
    }

    fn has_time(&self) -> bool {
        self.hour.is_some() || self.minute.is_some() || self.second.is_some()
    }

    pub fn format(&self, epoch_ms: f64) -> String {
        let Some(civil) = civil_from_epoch_ms(epoch_ms) else {
            return "Invalid Date".to_string();
        };

        let date = self.format_date(&civil);
        let time = self.format_time(&civil);
        match (date.is_empty(), time.is_empty()) {
            (false, false) => format!("{date}, {time}"),
            (true, _) => time,
            (_, true) => date,
        }
    }

    fn format_date(&self, civil: &Civil) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(part) = self.month {
            parts.push(pad(i64::from(civil.month), part));
        }
        if let Some(part) = self.day {
            parts.push(pad(i64::from(civil.day), part));
        }
        if let Some(part) = self.year {
            let year = match part {
                DatePart::Numeric => civil.year,
                DatePart::TwoDigit => civil.year.rem_euclid(100),
            };
            parts.push(pad(year, part));
        }
        parts.join("/")
    }

    fn format_time(&self, civil: &Civil) -> String {
        if !self.has_time() {
            return String::new();
        }

        let (hour, meridiem) = if self.hour12 {
            let h = match civil.hour % 12 {
                0 => 12,
                h => h,
            };
            (h, if civil.hour < 12 { " AM" } else { " PM" })
        } else {
            (civil.hour, "")
        };

        let mut out = String::new();
        if let Some(part) = self.hour {
            let part = if self.hour12 { part } else { DatePart::TwoDigit };
            out.push_str(&pad(i64::from(hour), part));
        }
        // Minutes and seconds are always two digits once combined.
        for (component, value) in [(self.minute, civil.minute), (self.second, civil.second)] {
            if component.is_some() {
                if !out.is_empty() {
                    out.push(':');
                }
                out.push_str(&pad(i64::from(value), DatePart::TwoDigit));
            }
        }
        if self.hour.is_some() {
            out.push_str(meridiem);
        }
        out
    }
}

fn pad(value: i64, part: DatePart) -> String {
    match part {
        DatePart::Numeric => value.to_string(),
        DatePart::TwoDigit => format!("{value:02}"),
    }
}

/// Split epoch milliseconds (UTC) into calendar components.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn civil_from_epoch_ms(epoch_ms: f64) -> Option<Civil> {
    if !epoch_ms.is_finite() || epoch_ms.abs() > MAX_EPOCH_MS {
        return None;
    }

    let days = (epoch_ms / MS_PER_DAY).floor();
    let ms_of_day = (epoch_ms - days * MS_PER_DAY).max(0.0);
    let seconds_of_day = (ms_of_day / 1000.0).floor() as u32;

    let (year, month, day) = jdn_to_ymd(days as i64 + UNIX_EPOCH_JDN);
    Some(Civil {
        year,
        month,
        day,
        hour: seconds_of_day / 3600,
        minute: (seconds_of_day % 3600) / 60,
        second: seconds_of_day % 60,
    })
}

/// Convert Julian Day Number to (year, month, day) in proleptic Gregorian calendar
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn jdn_to_ymd(jdn: i64) -> (i64, u32, u32) {
    // Algorithm from: https://en.wikipedia.org/wiki/Julian_day#Julian_or_Gregorian_calendar_from_Julian_day_number
    let y = 4716;
    let j = 1401;
    let m = 2;
    let n = 12;
    let r = 4;
    let p = 1461;
    let v = 3;
    let u = 5;
    let s = 153;
    let w = 2;
    let b = 274_277;
    let c = -38;

    let f = jdn + j + (((4 * jdn + b) / 146_097) * 3) / 4 + c;
    let e = r * f + v;
    let g = (e % p) / r;
    let h = u * g + w;

    let day = (h % s) / u + 1;
    let month = ((h / s + m) % n) + 1;
    let year = (e / p) - y + (n + m - month) / n;

    (year, month as u32, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2020-01-15T15:04:05Z
    const SAMPLE_MS: f64 = 1_579_100_645_000.0;

    fn stock(time: bool) -> DateTimeFormat {
        let mut options = FormatOptions {
            year: Some(DatePart::Numeric),
            month: Some(DatePart::Numeric),
            day: Some(DatePart::Numeric),
            ..FormatOptions::default()
        };
        if time {
            options.hour = Some(DatePart::Numeric);
            options.minute = Some(DatePart::Numeric);
            options.second = Some(DatePart::Numeric);
        }
        DateTimeFormat::new(&options)
    }

    #[test]
    fn test_date() {
        assert_eq!(stock(false).format(SAMPLE_MS), "1/15/2020");
        assert_eq!(stock(false).format(0.0), "1/1/1970");
    }

    #[test]
    fn test_datetime() {
        assert_eq!(stock(true).format(SAMPLE_MS), "1/15/2020, 3:04:05 PM");
        assert_eq!(stock(true).format(0.0), "1/1/1970, 12:00:00 AM");
    }

    #[test]
    fn test_before_epoch() {
        // 1969-12-31T23:00:00Z
        assert_eq!(stock(true).format(-3_600_000.0), "12/31/1969, 11:00:00 PM");
    }

    #[test]
    fn test_two_digit_parts() {
        let fmt = DateTimeFormat::new(&FormatOptions {
            year: Some(DatePart::TwoDigit),
            month: Some(DatePart::TwoDigit),
            day: Some(DatePart::TwoDigit),
            ..FormatOptions::default()
        });
        assert_eq!(fmt.format(SAMPLE_MS), "01/15/20");
    }

    #[test]
    fn test_24_hour_clock() {
        let fmt = DateTimeFormat::new(&FormatOptions {
            hour: Some(DatePart::Numeric),
            minute: Some(DatePart::Numeric),
            hour12: Some(false),
            ..FormatOptions::default()
        });
        assert_eq!(fmt.format(SAMPLE_MS), "15:04");
    }

    #[test]
    fn test_empty_options_fall_back_to_date() {
        let fmt = DateTimeFormat::new(&FormatOptions::default());
        assert_eq!(fmt.format(SAMPLE_MS), "1/15/2020");
    }

    #[test]
    fn test_invalid() {
        assert_eq!(stock(false).format(f64::NAN), "Invalid Date");
        assert_eq!(stock(true).format(f64::INFINITY), "Invalid Date");
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert_eq!(stock(true).format(1e30), "Invalid Date");
        assert_eq!(stock(true).format(-1e30), "Invalid Date");
        assert_eq!(stock(false).format(8.64e15 + 1000.0), "Invalid Date");
        // +275760-09-13T00:00:00Z, the last valid instant.
        assert_eq!(stock(false).format(8.64e15), "9/13/275760");
    }

    #[test]
    fn test_jdn_to_ymd() {
        assert_eq!(jdn_to_ymd(UNIX_EPOCH_JDN), (1970, 1, 1));
        // 2000-02-29
        assert_eq!(jdn_to_ymd(2_451_604), (2000, 2, 29));
    }
}
