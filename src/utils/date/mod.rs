// Date utility functions
// Month arithmetic, month-grid layout and church holidays for the calendar view

use chrono::{Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Number of days in the month, leap years included.
pub fn month_length(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = shift_month(year, month, 1);
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

/// Move `delta` months forward (or backward when negative).
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Cells of a Monday-first month grid: leading `None`s pad the first week.
pub fn month_grid(year: i32, month: u32) -> Vec<Option<NaiveDate>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let padding = first.weekday().num_days_from_monday() as usize;
    let mut cells = vec![None; padding];
    cells.extend((1..=month_length(year, month)).map(|day| NaiveDate::from_ymd_opt(year, month, day)));
    cells
}

/// Today's date in the configured time zone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Holidays on a fixed day every year, as (month, day, name).
const FIXED_HOLIDAYS: [(u32, u32, &str); 7] = [
    (1, 6, "Epiphany"),
    (8, 15, "Assumption"),
    (11, 1, "All Saints"),
    (11, 2, "All Souls"),
    (12, 8, "Immaculate Conception"),
    (12, 25, "Christmas"),
    (12, 26, "St. Stephen"),
];

/// Holidays counted in days from Easter Sunday.
const EASTER_HOLIDAYS: [(i64, &str); 4] = [
    (0, "Easter"),
    (1, "Easter Monday"),
    (39, "Ascension"),
    (60, "Corpus Christi"),
];

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Catholic holidays falling in the given month, sorted by date.
pub fn catholic_holidays(year: i32, month: u32) -> Vec<(NaiveDate, &'static str)> {
    let fixed = FIXED_HOLIDAYS
        .iter()
        .filter(|(m, _, _)| *m == month)
        .filter_map(|(m, d, name)| NaiveDate::from_ymd_opt(year, *m, *d).map(|date| (date, *name)));
    let moving = easter_sunday(year).into_iter().flat_map(|easter| {
        EASTER_HOLIDAYS
            .iter()
            .map(move |(offset, name)| (easter + Duration::days(*offset), *name))
    });
    let mut holidays: Vec<_> = fixed
        .chain(moving.filter(|(date, _)| date.month() == month))
        .collect();
    holidays.sort();
    holidays
}
