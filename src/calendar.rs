//! Month grid, date selection and the fixed daily time slots.

use crate::i18n::Translate;
use chrono::{Datelike, Local, Months, NaiveDate, Weekday};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Source of "today" for past-date checks.
pub trait Clock: Send + Sync + fmt::Debug {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// One bookable start time of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    /// `HH:MM`, the value written into the draft.
    pub time: &'static str,
    pub label_key: &'static str,
    pub available: bool,
}

/// The same six slots are offered every day; 12:00 and 18:00 are never free.
pub const TIME_SLOTS: [TimeSlot; 6] = [
    TimeSlot { time: "08:00", label_key: "calendar.times.8am", available: true },
    TimeSlot { time: "10:00", label_key: "calendar.times.10am", available: true },
    TimeSlot { time: "12:00", label_key: "calendar.times.12pm", available: false },
    TimeSlot { time: "14:00", label_key: "calendar.times.2pm", available: true },
    TimeSlot { time: "16:00", label_key: "calendar.times.4pm", available: true },
    TimeSlot { time: "18:00", label_key: "calendar.times.6pm", available: false },
];

const MONTH_KEYS: [&str; 12] = [
    "calendar.months.january",
    "calendar.months.february",
    "calendar.months.march",
    "calendar.months.april",
    "calendar.months.may",
    "calendar.months.june",
    "calendar.months.july",
    "calendar.months.august",
    "calendar.months.september",
    "calendar.months.october",
    "calendar.months.november",
    "calendar.months.december",
];

/// Sunday first.
const WEEKDAY_KEYS: [&str; 7] = [
    "calendar.days.sun",
    "calendar.days.mon",
    "calendar.days.tue",
    "calendar.days.wed",
    "calendar.days.thu",
    "calendar.days.fri",
    "calendar.days.sat",
];

/// Limits on month navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarPolicy {
    /// Allow paging to months before the current one. Their days are still
    /// not selectable.
    pub allow_past_months: bool,
    /// How many months past the current one may be shown; `None` is unbounded.
    pub max_months_ahead: Option<u32>,
}

/// Date and time picker state.
#[derive(Debug)]
pub struct BookingCalendar {
    clock: Arc<dyn Clock>,
    policy: CalendarPolicy,
    /// First day of the displayed month.
    month: NaiveDate,
    selected_date: Option<NaiveDate>,
    selected_time: Option<&'static str>,
}

impl BookingCalendar {
    pub fn new(clock: Arc<dyn Clock>, policy: CalendarPolicy) -> Self {
        let month = first_of_month(clock.today());
        Self {
            clock,
            policy,
            month,
            selected_date: None,
            selected_time: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// First day of the displayed month.
    pub fn displayed_month(&self) -> NaiveDate {
        self.month
    }

    /// Cells of the displayed month, Sunday first: one `None` per leading
    /// blank, then every day of the month in order.
    pub fn month_grid(&self) -> Vec<Option<NaiveDate>> {
        let leading = self.month.weekday().num_days_from_sunday() as usize;
        let days = self
            .month
            .iter_days()
            .take_while(|day| day.month() == self.month.month())
            .map(Some);

        std::iter::repeat(None).take(leading).chain(days).collect()
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == self.today()
    }

    /// Strictly before today; today itself is selectable.
    pub fn is_past(&self, date: NaiveDate) -> bool {
        date < self.today()
    }

    pub fn is_selected(&self, date: NaiveDate) -> bool {
        self.selected_date == Some(date)
    }

    pub fn selection(&self) -> (Option<NaiveDate>, Option<&'static str>) {
        (self.selected_date, self.selected_time)
    }

    pub fn time_slots(&self) -> &'static [TimeSlot] {
        &TIME_SLOTS
    }

    /// Select a day. Past days are ignored and `false` is returned.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        if self.is_past(date) {
            debug!("Ignoring past date {}", date);
            return false;
        }
        self.selected_date = Some(date);
        true
    }

    /// Select a slot by its `HH:MM` value. Unknown or unavailable slots are
    /// ignored and `false` is returned.
    pub fn select_time(&mut self, time: &str) -> bool {
        match TIME_SLOTS.iter().find(|slot| slot.time == time) {
            Some(slot) if slot.available => {
                self.selected_time = Some(slot.time);
                true
            }
            Some(_) => {
                debug!("Time slot {} is unavailable", time);
                false
            }
            None => {
                debug!("Unknown time slot {}", time);
                false
            }
        }
    }

    pub fn clear_date(&mut self) {
        self.selected_date = None;
    }

    pub fn clear_time(&mut self) {
        self.selected_time = None;
    }

    /// Show the previous month. Returns `false` when navigation is clamped.
    pub fn previous_month(&mut self) -> bool {
        let current = first_of_month(self.today());
        if !self.policy.allow_past_months && self.month <= current {
            return false;
        }
        match self.month.checked_sub_months(Months::new(1)) {
            Some(month) => {
                self.month = month;
                true
            }
            None => false,
        }
    }

    /// Show the next month. Returns `false` past `max_months_ahead`.
    pub fn next_month(&mut self) -> bool {
        if let Some(max) = self.policy.max_months_ahead {
            let current = first_of_month(self.today());
            if months_between(current, self.month) >= max as i32 {
                return false;
            }
        }
        match self.month.checked_add_months(Months::new(1)) {
            Some(month) => {
                self.month = month;
                true
            }
            None => false,
        }
    }

    /// Drop the selection and show the current month again.
    pub fn reset(&mut self) {
        self.selected_date = None;
        self.selected_time = None;
        self.month = first_of_month(self.today());
    }

    /// e.g. "October 2026", with the month name from the catalog.
    pub fn month_title(&self, translator: &dyn Translate) -> String {
        format!("{} {}", month_name(self.month, translator), self.month.year())
    }

    /// Short weekday headers, Sunday first.
    pub fn weekday_labels(&self, translator: &dyn Translate) -> Vec<String> {
        WEEKDAY_KEYS
            .iter()
            .map(|key| translator.translate(key, &[]))
            .collect()
    }

    pub fn time_label(&self, slot: &TimeSlot, translator: &dyn Translate) -> String {
        translator.translate(slot.label_key, &[])
    }
}

/// e.g. "Mon 19 October 2026".
pub fn format_date(date: NaiveDate, translator: &dyn Translate) -> String {
    format!(
        "{} {} {} {}",
        weekday_name(date.weekday(), translator),
        date.day(),
        month_name(date, translator),
        date.year()
    )
}

fn month_name(date: NaiveDate, translator: &dyn Translate) -> String {
    translator.translate(MONTH_KEYS[date.month0() as usize], &[])
}

fn weekday_name(weekday: Weekday, translator: &dyn Translate) -> String {
    translator.translate(WEEKDAY_KEYS[weekday.num_days_from_sunday() as usize], &[])
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}
