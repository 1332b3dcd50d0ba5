//! Leading date tokens, day/month order detection, and calendar resolution.
//!
//! Recognized shapes (always at the start of a line):
//!   2026-02-15   2026/02/15            year-first, unambiguous
//!   15/02/2026   02-15-26   15.02.26   numeric, order may be ambiguous
//!   15 Feb 2026  1st March   15-Feb-26 day then month name
//!   Feb 15, 2026 March 1               month name then day

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::{Captures, Regex};
use tracing::debug;

use crate::types::DateOrder;

static MONTHS: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    [
        ("jan", 1),
        ("january", 1),
        ("feb", 2),
        ("february", 2),
        ("mar", 3),
        ("march", 3),
        ("apr", 4),
        ("april", 4),
        ("may", 5),
        ("jun", 6),
        ("june", 6),
        ("jul", 7),
        ("july", 7),
        ("aug", 8),
        ("august", 8),
        ("sep", 9),
        ("sept", 9),
        ("september", 9),
        ("oct", 10),
        ("october", 10),
        ("nov", 11),
        ("november", 11),
        ("dec", 12),
        ("december", 12),
    ]
    .into_iter()
    .collect()
});

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<y>\d{4})[-/.](?P<m>\d{1,2})[-/.](?P<d>\d{1,2})").expect("iso date regex")
});

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<a>\d{1,2})[-/.](?P<b>\d{1,2})[-/.](?P<y>\d{4}|\d{2})")
        .expect("numeric date regex")
});

static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<d>\d{1,2})(?:st|nd|rd|th)?[\s.\-]*",
        r"(?P<mon>[A-Za-z]+)\.?",
        r"(?:,?[\s\-']*(?P<y>\d{4}|\d{2}))?"
    ))
    .expect("day-month date regex")
});

static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<mon>[A-Za-z]+)\.?[\s\-]*",
        r"(?P<d>\d{1,2})(?:st|nd|rd|th)?",
        r"(?:,?[\s\-']*(?P<y>\d{4}|\d{2}))?"
    ))
    .expect("month-day date regex")
});

/// A date token split into its raw components, before any order is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    YearFirst { year: i32, month: u32, day: u32 },
    /// `first` and `second` are day and month in an order that may be ambiguous
    Numeric { first: u32, second: u32, year: i32 },
    Named { day: u32, month: u32, year: Option<i32> },
}

/// A date token found at the start of a line; `len` is its byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub token: DateToken,
    pub len: usize,
}

/// Month number for an English month name or abbreviation (case-insensitive).
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Two-digit years pivot at 70: `69` is 2069, `70` is 1970.
fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    Some(match raw.len() {
        2 if year < 70 => 2000 + year,
        2 => 1900 + year,
        _ => year,
    })
}

/// A number ends cleanly when it is not followed by another digit or by a
/// decimal/grouping separator that continues into digits (`12.50`, `1,250`).
fn ends_cleanly(line: &str, end: usize) -> bool {
    let mut rest = line[end..].chars();
    match rest.next() {
        None => true,
        Some(c) if c.is_ascii_digit() => false,
        Some('.' | ',') => !rest.next().is_some_and(|c| c.is_ascii_digit()),
        Some(_) => true,
    }
}

fn num(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

fn match_year_first(line: &str) -> Option<DateMatch> {
    let caps = ISO_RE.captures(line)?;
    let whole = caps.get(0)?;
    if !ends_cleanly(line, whole.end()) {
        return None;
    }
    Some(DateMatch {
        token: DateToken::YearFirst {
            year: caps["y"].parse().ok()?,
            month: num(&caps, "m")?,
            day: num(&caps, "d")?,
        },
        len: whole.end(),
    })
}

fn match_numeric(line: &str) -> Option<DateMatch> {
    let caps = NUMERIC_RE.captures(line)?;
    let whole = caps.get(0)?;
    // A four-digit year is already bounded, so `15/02/20267-ELEVEN` is a date
    // glued to a merchant. A two-digit year followed by digits is not a date.
    if caps["y"].len() != 4 && !ends_cleanly(line, whole.end()) {
        return None;
    }
    Some(DateMatch {
        token: DateToken::Numeric {
            first: num(&caps, "a")?,
            second: num(&caps, "b")?,
            year: expand_year(&caps["y"])?,
        },
        len: whole.end(),
    })
}

/// Shared tail of the two month-name shapes: the optional year only counts
/// when it is not the front of an amount (`Feb 15 12.50`).
fn named_match(line: &str, caps: &Captures<'_>, day_end: usize) -> Option<DateMatch> {
    let day = num(caps, "d")?;
    let month = month_number(caps.name("mon")?.as_str())?;

    let whole = caps.get(0)?;
    let (year, len) = match caps.name("y") {
        Some(y) if ends_cleanly(line, y.end()) => (Some(expand_year(y.as_str())?), y.end()),
        Some(y) => {
            // Give the digits back; the token ends before the separator.
            let cut = line[..y.start()].trim_end_matches([',', ' ', '-', '\'']).len();
            (None, cut)
        }
        None => (None, whole.end()),
    };

    if line[day_end..].starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some(DateMatch {
        token: DateToken::Named { day, month, year },
        len,
    })
}

fn match_day_month(line: &str) -> Option<DateMatch> {
    let caps = DAY_MONTH_RE.captures(line)?;
    let day_end = caps.name("d")?.end();
    named_match(line, &caps, day_end)
}

fn match_month_day(line: &str) -> Option<DateMatch> {
    let caps = MONTH_DAY_RE.captures(line)?;
    let day_end = caps.name("d")?.end();
    named_match(line, &caps, day_end)
}

/// Find the date token a line starts with, if any.
pub fn match_leading_date(line: &str) -> Option<DateMatch> {
    match_year_first(line)
        .or_else(|| match_numeric(line))
        .or_else(|| match_day_month(line))
        .or_else(|| match_month_day(line))
}

impl DateToken {
    /// Resolve to a calendar date; `None` for impossible dates (Feb 30, Apr 31).
    ///
    /// `order` is only consulted when neither numeric component exceeds 12.
    pub fn resolve(self, order: DateOrder, reference_year: i32) -> Option<NaiveDate> {
        let (year, month, day) = match self {
            DateToken::YearFirst { year, month, day } => (year, month, day),
            DateToken::Numeric { first, second, year } => {
                if first > 12 {
                    (year, second, first)
                } else if second > 12 {
                    (year, first, second)
                } else {
                    match order {
                        DateOrder::MonthFirst => (year, first, second),
                        DateOrder::DayFirst | DateOrder::Unspecified => (year, second, first),
                    }
                }
            }
            DateToken::Named { day, month, year } => (year.unwrap_or(reference_year), month, day),
        };

        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        // Components must survive the round trip exactly.
        (date.year() == year && date.month() == month && date.day() == day).then_some(date)
    }
}

/// Parse a standalone date string. Year-less dates fall in `reference_year`.
pub fn parse_date_with_year(raw: &str, order: DateOrder, reference_year: i32) -> Option<NaiveDate> {
    let raw = raw.trim();
    let m = match_leading_date(raw)?;
    if m.len != raw.len() {
        return None;
    }
    m.token.resolve(order, reference_year)
}

/// Parse a standalone date string; year-less dates fall in the current year.
pub fn parse_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    parse_date_with_year(raw, order, Local::now().year())
}

/// Document-level vote on day/month order across every numeric leading date.
///
/// A first component above 12 can only be a day; a second component above 12
/// can only be a day too, which makes the first a month. Ties and silence
/// leave the order unspecified.
pub fn detect_date_order<S: AsRef<str>>(lines: &[S]) -> DateOrder {
    let mut day_first = 0usize;
    let mut month_first = 0usize;

    for line in lines {
        let Some(DateMatch {
            token: DateToken::Numeric { first, second, .. },
            ..
        }) = match_leading_date(line.as_ref())
        else {
            continue;
        };

        if first > 12 && second <= 12 {
            day_first += 1;
        } else if second > 12 && first <= 12 {
            month_first += 1;
        }
    }

    let order = if day_first > month_first {
        DateOrder::DayFirst
    } else if month_first > day_first {
        DateOrder::MonthFirst
    } else {
        DateOrder::Unspecified
    };
    debug!(day_first, month_first, ?order, "detected date order");
    order
}
