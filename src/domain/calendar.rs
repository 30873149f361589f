//! Month calendar with a per-day event index.
//!
//! The grid starts on Sunday: a month whose first day is a Wednesday gets
//! three leading blank cells before day 1.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{DashError, Result};

const MONTH_NAMES: [&str; 12] = [
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

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Unique identifier for a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Color tag for an event chip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Orange,
    Pink,
}

impl EventColor {
    pub const ALL: [EventColor; 6] = [
        EventColor::Blue,
        EventColor::Green,
        EventColor::Purple,
        EventColor::Red,
        EventColor::Orange,
        EventColor::Pink,
    ];
}

impl std::str::FromStr for EventColor {
    type Err = DashError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "purple" => Ok(Self::Purple),
            "red" => Ok(Self::Red),
            "orange" => Ok(Self::Orange),
            "pink" => Ok(Self::Pink),
            _ => Err(DashError::InvalidValue(format!(
                "Invalid color '{}'. Valid colors: blue, green, purple, red, orange, pink",
                s
            ))),
        }
    }
}

/// A calendar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub date: NaiveDate,
    /// Time of day as entered, e.g. `10:00 AM`
    pub time: String,
    #[serde(default)]
    pub color: EventColor,
}

/// Raw form input for a new event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub color: EventColor,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            time: time.into(),
            color: EventColor::default(),
        }
    }

    pub fn with_color(mut self, color: EventColor) -> Self {
        self.color = color;
        self
    }

    fn into_event(self, id: EventId) -> Result<Event> {
        let missing: Vec<&'static str> = [
            ("title", &self.title),
            ("date", &self.date),
            ("time", &self.time),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(DashError::Validation { fields: missing });
        }

        let date = super::parse_day(&self.date)?;
        Ok(Event {
            id,
            title: self.title.trim().to_string(),
            date,
            time: self.time.trim().to_string(),
            color: self.color,
        })
    }
}

/// Owns the event list for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Calendar {
    events: Vec<Event>,
}

impl Calendar {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn next_id(&self) -> Result<EventId> {
        let max = self.events.iter().map(|e| e.id.value()).max().unwrap_or(0);
        id_after(max)
    }

    /// Validates and appends a new event
    pub fn add_event(&mut self, draft: EventDraft) -> Result<EventId> {
        let id = self.next_id()?;
        let event = draft.into_event(id).map_err(|err| {
            warn!(error = %err, "event rejected");
            err
        })?;
        debug!(event = %id, title = %event.title, date = %event.date, "added event");
        self.events.push(event);
        Ok(id)
    }

    /// Appends imported events, renumbering any whose ID is already taken,
    /// including by an earlier event of the same batch
    ///
    /// Returns the number of events added. Nothing is added when the batch
    /// cannot be numbered.
    pub fn import(&mut self, events: Vec<Event>) -> Result<usize> {
        let mut taken: BTreeSet<EventId> = self.events.iter().map(|e| e.id).collect();
        let mut batch = Vec::with_capacity(events.len());

        for mut event in events {
            if taken.contains(&event.id) {
                let max = taken.iter().next_back().map_or(0, |id| id.value());
                event.id = id_after(max)?;
            }
            taken.insert(event.id);
            batch.push(event);
        }

        let count = batch.len();
        self.events.extend(batch);
        debug!(count, "imported events");
        Ok(count)
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events on a given day, in list order
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// First `limit` events in list order, as shown in the sidebar
    pub fn upcoming(&self, limit: usize) -> &[Event] {
        &self.events[..limit.min(self.events.len())]
    }

    pub fn month(&self, cursor: MonthCursor, today: NaiveDate) -> Result<MonthGrid<'_>> {
        MonthGrid::build(cursor.year, cursor.month, &self.events, today)
    }
}

fn id_after(max: u64) -> Result<EventId> {
    max.checked_add(1).map(EventId::new).ok_or_else(|| {
        DashError::InvalidValue(format!("No event ID left after {}", max))
    })
}

/// The month currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(DashError::InvalidDate(format!("month {} out of range", month)));
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn previous(&self) -> Self {
        self.first_day()
            .and_then(|d| d.checked_sub_months(Months::new(1)))
            .map(Self::containing)
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.first_day()
            .and_then(|d| d.checked_add_months(Months::new(1)))
            .map(Self::containing)
            .unwrap_or(*self)
    }

    /// Header text, e.g. `January 2024`
    pub fn title(&self) -> String {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("?");
        format!("{} {}", name, self.year)
    }
}

/// Number of days in a month, honoring leap years
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DashError::InvalidDate(format!("{}-{:02}", year, month)))?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| DashError::InvalidDate(format!("{}-{:02}", year, month)))?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// One day in the month grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
    pub is_today: bool,
}

impl<'a> DayCell<'a> {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// The first `limit` events plus how many were left out
    pub fn preview(&self, limit: usize) -> (&[&'a Event], usize) {
        let shown = limit.min(self.events.len());
        (&self.events[..shown], self.events.len() - shown)
    }
}

/// Slot in the 7-column layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridSlot<'a, 'b> {
    Blank,
    Day(&'b DayCell<'a>),
}

/// A laid-out month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid<'a> {
    pub cursor: MonthCursor,
    /// Empty cells before day 1, Sunday = 0
    pub leading_blanks: u32,
    pub days: Vec<DayCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    pub fn build(year: i32, month: u32, events: &'a [Event], today: NaiveDate) -> Result<Self> {
        let cursor = MonthCursor::new(year, month)?;
        let first = cursor
            .first_day()
            .ok_or_else(|| DashError::InvalidDate(format!("{}-{:02}", year, month)))?;
        let leading_blanks = first.weekday().num_days_from_sunday();
        let count = days_in_month(year, month)?;

        let days = first
            .iter_days()
            .take(count as usize)
            .map(|date| DayCell {
                date,
                events: events.iter().filter(|e| e.date == date).collect(),
                is_today: date == today,
            })
            .collect();

        Ok(Self {
            cursor,
            leading_blanks,
            days,
        })
    }

    /// Blank slots followed by one slot per day
    pub fn cells(&self) -> impl Iterator<Item = GridSlot<'a, '_>> + '_ {
        (0..self.leading_blanks)
            .map(|_| GridSlot::Blank)
            .chain(self.days.iter().map(GridSlot::Day))
    }

    /// Rows of seven slots; the last row may be short
    pub fn weeks(&self) -> Vec<Vec<GridSlot<'a, '_>>> {
        let slots: Vec<_> = self.cells().collect();
        slots.chunks(7).map(|week| week.to_vec()).collect()
    }

    pub fn day(&self, day: u32) -> Option<&DayCell<'a>> {
        self.days.get(day.checked_sub(1)? as usize)
    }
}
