//! Week-grid layout for a one-year contribution calendar.
//!
//! The grid runs from the Sunday on or before Jan 1 of the target year up to
//! (but excluding) the Sunday on or after Jan 1 of the next year. Each column
//! is one Sunday-to-Saturday week and each row one weekday, Sunday first.

use crate::config::CalendarConfig;
use crate::history::Histogram;
use chrono::{Datelike, Days, NaiveDate};

pub const MIN_YEAR: i32 = 1970;
pub const MAX_YEAR: i32 = 2100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("year {0} is out of range (1970..=2100)")]
    YearOutOfRange(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub count: u32,
    pub in_year: bool,
}

impl DayCell {
    /// Weekday index, Sunday = 0 through Saturday = 6.
    pub fn row(&self) -> u32 {
        self.date.weekday().num_days_from_sunday()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthAnchor {
    pub date: NaiveDate,
    pub column: usize,
}

impl MonthAnchor {
    pub fn label(&self) -> String {
        self.date.format("%b").to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Calendar {
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayCell>,
    /// Sunday that opens each column.
    pub weeks: Vec<NaiveDate>,
    pub months: Vec<MonthAnchor>,
}

impl Calendar {
    pub fn column_of(&self, date: NaiveDate) -> usize {
        week_column(self.start, date)
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    pub fn total(&self) -> u64 {
        self.days.iter().map(|day| day.count as u64).sum()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        if date < self.start || date >= self.end {
            return None;
        }
        let offset = (date - self.start).num_days() as usize;
        self.days.get(offset)
    }
}

pub fn validate_year(year: i32) -> Result<i32, CalendarError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(CalendarError::YearOutOfRange(year))
    }
}

fn jan_first(year: i32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CalendarError::YearOutOfRange(year))
}

/// `[Jan 1 of year, Jan 1 of year + 1)`.
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), CalendarError> {
    Ok((jan_first(year)?, jan_first(year + 1)?))
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.weekday().num_days_from_sunday() as u64)
}

fn sunday_on_or_after(date: NaiveDate) -> NaiveDate {
    let ahead = (7 - date.weekday().num_days_from_sunday()) % 7;
    date + Days::new(ahead as u64)
}

/// Grid range as `[start, end)`, both Sundays.
pub fn grid_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), CalendarError> {
    let (year_start, year_end) = year_bounds(year)?;
    Ok((week_start(year_start), sunday_on_or_after(year_end)))
}

/// Whole Sunday-to-Sunday weeks between `grid_start` and the week holding `date`.
pub fn week_column(grid_start: NaiveDate, date: NaiveDate) -> usize {
    let days = (week_start(date) - week_start(grid_start)).num_days();
    (days.max(0) / 7) as usize
}

pub fn build_calendar(year: i32, histogram: &Histogram) -> Result<Calendar, CalendarError> {
    validate_year(year)?;
    let (year_start, year_end) = year_bounds(year)?;
    let (start, end) = grid_bounds(year)?;

    let days: Vec<DayCell> = start
        .iter_days()
        .take_while(|date| *date < end)
        .map(|date| {
            let in_year = year_start <= date && date < year_end;
            let count = if in_year { histogram.count_on(date) } else { 0 };
            DayCell { date, count, in_year }
        })
        .collect();

    let weeks: Vec<NaiveDate> = start
        .iter_weeks()
        .take_while(|date| *date < end)
        .collect();

    let months = (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .filter(|date| year_start <= *date && *date < year_end)
        .map(|date| MonthAnchor {
            date,
            column: week_column(start, date),
        })
        .collect();

    tracing::debug!(year, days = days.len(), weeks = weeks.len(), "laid out calendar grid");

    Ok(Calendar {
        year,
        start,
        end,
        days,
        weeks,
        months,
    })
}

/// Band index in `0..=thresholds.len()` for a commit count.
pub fn band_for(count: u32, thresholds: &[u32]) -> usize {
    thresholds
        .iter()
        .take_while(|&&threshold| count >= threshold)
        .count()
}

pub fn color_for<'a>(count: u32, config: &'a CalendarConfig) -> &'a str {
    let band = band_for(count, &config.thresholds);
    let idx = band.min(config.palette.len().saturating_sub(1));
    config.palette.get(idx).map(String::as_str).unwrap_or("none")
}
