//! Date-format patterns for `#DATE#` substitution.
//!
//! Patterns use the familiar letter-run syntax (`yyyy-MM-dd HH:mm:ss.SSS`).
//! A pattern is compiled once at startup so an invalid pattern is rejected
//! before any file is touched, and formatting each record is a walk over the
//! compiled segments.
//!
//! # Pattern syntax
//!
//! - ASCII letters are pattern letters; a run of one letter forms a field and
//!   the run length is the field width.
//! - Text between single quotes is copied verbatim. `''` yields one quote,
//!   inside or outside a quoted section.
//! - Every other character is copied verbatim.
//!
//! | Letter | Field | Example |
//! |---|---|---|
//! | `G` | era | `AD` |
//! | `y` | year (`yy` keeps two digits) | `2026`, `26` |
//! | `Y` | ISO week-based year | `2026` |
//! | `M`, `L` | month (`MMM` short name, `MMMM` full name) | `3`, `03`, `Mar`, `March` |
//! | `w` | ISO week of year | `10` |
//! | `W` | week of month (Monday first) | `2` |
//! | `D` | day of year | `66` |
//! | `d` | day of month | `7` |
//! | `F` | day-of-week occurrence in month | `1` |
//! | `E` | day name (`EEEE` full name) | `Sat`, `Saturday` |
//! | `u` | day number, Monday = 1 | `6` |
//! | `a` | AM/PM marker | `AM` |
//! | `H` / `k` | hour 0-23 / 1-24 | `0`, `24` |
//! | `K` / `h` | hour 0-11 / 1-12 | `0`, `12` |
//! | `m` / `s` / `S` | minute / second / millisecond | `5`, `3`, `42` |
//! | `z` | GMT offset | `GMT+01:00` |
//! | `Z` | RFC 822 offset | `+0100` |
//! | `X` | ISO 8601 offset, up to three letters | `+01`, `+0100`, `+01:00`, `Z` |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDateTime, Offset, TimeZone, Timelike};

use crate::error::DateFormatError;

/// Pattern applied when no `--dateFormat` is supplied.
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-d H:m:s.S";

const QUOTE: char = '\'';

/// A compiled date-format pattern.
///
/// # Example
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use mass_data::DatePattern;
///
/// let pattern = DatePattern::compile("yyyy-MM-dd'T'HH:mm").expect("valid pattern");
/// let at = FixedOffset::east_opt(0)
///     .expect("valid offset")
///     .with_ymd_and_hms(2026, 3, 7, 9, 5, 3)
///     .single()
///     .expect("valid timestamp");
///
/// assert_eq!(pattern.format(&at), "2026-03-07T09:05");
/// assert!(DatePattern::compile("bogus[[[").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { field: Field, width: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Era,
    Year,
    WeekYear,
    Month,
    WeekOfYear,
    WeekOfMonth,
    DayOfYear,
    DayOfMonth,
    DayOfWeekInMonth,
    DayName,
    DayNumber,
    AmPm,
    HourOfDay,
    HourOfDayFromOne,
    HourOfHalfDay,
    HourOfHalfDayFromOne,
    Minute,
    Second,
    Millisecond,
    GmtOffset,
    Rfc822Offset,
    IsoOffset,
}

impl DatePattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`DateFormatError`] if the pattern uses a letter with no
    /// date/time meaning, leaves a quote open, or repeats `X` more than three
    /// times.
    pub fn compile(pattern: &str) -> Result<Self, DateFormatError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(current) = chars.next() {
            if current == QUOTE {
                if chars.next_if_eq(&QUOTE).is_some() {
                    literal.push(QUOTE);
                } else {
                    read_quoted(&mut chars, &mut literal, pattern)?;
                }
            } else if current.is_ascii_alphabetic() {
                let mut width = 1;
                while chars.next_if_eq(&current).is_some() {
                    width += 1;
                }
                let field = field_for(current, width, pattern)?;
                flush_literal(&mut literal, &mut segments);
                segments.push(Segment::Field { field, width });
            } else {
                literal.push(current);
            }
        }
        flush_literal(&mut literal, &mut segments);

        Ok(Self {
            source: pattern.to_owned(),
            segments,
        })
    }

    /// Returns the pattern as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Formats a timestamp in its own time zone.
    #[must_use]
    pub fn format<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String {
        let offset_seconds = at.offset().fix().local_minus_utc();
        let local = at.naive_local();
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { field, width } => {
                    field.render(&local, offset_seconds, *width, &mut out);
                }
            }
        }
        out
    }
}

impl Default for DatePattern {
    fn default() -> Self {
        let field_segment = |field, width| Segment::Field { field, width };
        let literal_segment = |text: &str| Segment::Literal(text.to_owned());
        Self {
            source: DEFAULT_DATE_PATTERN.to_owned(),
            segments: vec![
                field_segment(Field::Year, 4),
                literal_segment("-"),
                field_segment(Field::Month, 2),
                literal_segment("-"),
                field_segment(Field::DayOfMonth, 1),
                literal_segment(" "),
                field_segment(Field::HourOfDay, 1),
                literal_segment(":"),
                field_segment(Field::Minute, 1),
                literal_segment(":"),
                field_segment(Field::Second, 1),
                literal_segment("."),
                field_segment(Field::Millisecond, 1),
            ],
        }
    }
}

impl FromStr for DatePattern {
    type Err = DateFormatError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Self::compile(pattern)
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn read_quoted<I>(
    chars: &mut std::iter::Peekable<I>,
    literal: &mut String,
    pattern: &str,
) -> Result<(), DateFormatError>
where
    I: Iterator<Item = char>,
{
    loop {
        match chars.next() {
            None => {
                return Err(DateFormatError::UnterminatedQuote {
                    pattern: pattern.to_owned(),
                });
            }
            Some(QUOTE) => {
                if chars.next_if_eq(&QUOTE).is_none() {
                    return Ok(());
                }
                literal.push(QUOTE);
            }
            Some(other) => literal.push(other),
        }
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn field_for(letter: char, width: usize, pattern: &str) -> Result<Field, DateFormatError> {
    let field = match letter {
        'G' => Field::Era,
        'y' => Field::Year,
        'Y' => Field::WeekYear,
        'M' | 'L' => Field::Month,
        'w' => Field::WeekOfYear,
        'W' => Field::WeekOfMonth,
        'D' => Field::DayOfYear,
        'd' => Field::DayOfMonth,
        'F' => Field::DayOfWeekInMonth,
        'E' => Field::DayName,
        'u' => Field::DayNumber,
        'a' => Field::AmPm,
        'H' => Field::HourOfDay,
        'k' => Field::HourOfDayFromOne,
        'K' => Field::HourOfHalfDay,
        'h' => Field::HourOfHalfDayFromOne,
        'm' => Field::Minute,
        's' => Field::Second,
        'S' => Field::Millisecond,
        'z' => Field::GmtOffset,
        'Z' => Field::Rfc822Offset,
        'X' => Field::IsoOffset,
        _ => {
            return Err(DateFormatError::IllegalPatternCharacter {
                character: letter,
                pattern: pattern.to_owned(),
            });
        }
    };
    if field == Field::IsoOffset && width > 3 {
        return Err(DateFormatError::InvalidFieldWidth {
            character: letter,
            width,
            pattern: pattern.to_owned(),
        });
    }
    Ok(field)
}

impl Field {
    fn render(self, at: &NaiveDateTime, offset_seconds: i32, width: usize, out: &mut String) {
        match self {
            Self::Era => out.push_str(if at.year() > 0 { "AD" } else { "BC" }),
            Self::Year => push_year(out, at.year(), width),
            Self::WeekYear => push_year(out, at.iso_week().year(), width),
            Self::Month => match width {
                1 | 2 => push_number(out, at.month(), width),
                3 => out.push_str(&at.format("%b").to_string()),
                _ => out.push_str(&at.format("%B").to_string()),
            },
            Self::WeekOfYear => push_number(out, at.iso_week().week(), width),
            Self::WeekOfMonth => push_number(out, week_of_month(at), width),
            Self::DayOfYear => push_number(out, at.ordinal(), width),
            Self::DayOfMonth => push_number(out, at.day(), width),
            Self::DayOfWeekInMonth => push_number(out, at.day0().div_euclid(7) + 1, width),
            Self::DayName => {
                let spec = if width >= 4 { "%A" } else { "%a" };
                out.push_str(&at.format(spec).to_string());
            }
            Self::DayNumber => push_number(out, at.weekday().number_from_monday(), width),
            Self::AmPm => out.push_str(if at.hour12().0 { "PM" } else { "AM" }),
            Self::HourOfDay => push_number(out, at.hour(), width),
            Self::HourOfDayFromOne => {
                let hour = if at.hour() == 0 { 24 } else { at.hour() };
                push_number(out, hour, width);
            }
            Self::HourOfHalfDay => push_number(out, at.hour().rem_euclid(12), width),
            Self::HourOfHalfDayFromOne => push_number(out, at.hour12().1, width),
            Self::Minute => push_number(out, at.minute(), width),
            Self::Second => push_number(out, at.second(), width),
            Self::Millisecond => {
                // Leap seconds carry nanoseconds past one second.
                let millis = at.nanosecond().div_euclid(1_000_000).min(999);
                push_number(out, millis, width);
            }
            Self::GmtOffset => {
                out.push_str("GMT");
                push_offset(out, offset_seconds, ":");
            }
            Self::Rfc822Offset => push_offset(out, offset_seconds, ""),
            Self::IsoOffset => push_iso_offset(out, offset_seconds, width),
        }
    }
}

/// Zero-pads to `width` characters, sign included. Any width is accepted.
fn push_number(out: &mut String, value: impl Into<i64>, width: usize) {
    let value = value.into();
    let digits = value.unsigned_abs().to_string();
    let sign_len = usize::from(value < 0);
    if value < 0 {
        out.push('-');
    }
    let padding = width.saturating_sub(digits.len() + sign_len);
    out.extend(std::iter::repeat_n('0', padding));
    out.push_str(&digits);
}

fn push_year(out: &mut String, year: i32, width: usize) {
    if width == 2 {
        push_number(out, year.rem_euclid(100), 2);
    } else {
        push_number(out, year, width);
    }
}

fn week_of_month(at: &NaiveDateTime) -> i64 {
    let weekday = i64::from(at.weekday().num_days_from_monday());
    let day0 = i64::from(at.day0());
    let first_of_month = (weekday - day0).rem_euclid(7);
    (day0 + first_of_month).div_euclid(7) + 1
}

fn split_offset(offset_seconds: i32) -> (char, u32, u32) {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let magnitude = offset_seconds.unsigned_abs();
    let hours = magnitude.div_euclid(3600);
    let minutes = magnitude.rem_euclid(3600).div_euclid(60);
    (sign, hours, minutes)
}

fn push_offset(out: &mut String, offset_seconds: i32, separator: &str) {
    let (sign, hours, minutes) = split_offset(offset_seconds);
    out.push_str(&format!("{sign}{hours:02}{separator}{minutes:02}"));
}

fn push_iso_offset(out: &mut String, offset_seconds: i32, width: usize) {
    if offset_seconds == 0 {
        out.push('Z');
        return;
    }
    match width {
        1 => {
            let (sign, hours, _) = split_offset(offset_seconds);
            out.push_str(&format!("{sign}{hours:02}"));
        }
        2 => push_offset(out, offset_seconds, ""),
        _ => push_offset(out, offset_seconds, ":"),
    }
}
