pub mod board;
pub mod calendar;
pub mod card;
pub mod collection;
pub mod metrics;
pub mod record;
pub mod sorting;

pub use board::{Board, DragSession, Lane, LaneId};
pub use calendar::{Calendar, Event, EventColor, EventDraft, EventId, MonthCursor, MonthGrid};
pub use card::{Card, CardDraft, CardId, Priority};
pub use collection::{Directory, ViewQuery};
pub use metrics::{Inbox, Metrics, Notification};
pub use record::{AccountStatus, Record, RecordId, Role};
pub use sorting::{sort_records, SortKey, SortOrder, SortState};

use chrono::NaiveDate;

use crate::error::{DashError, Result};

/// Parses a form date in `YYYY-MM-DD` form
pub(crate) fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DashError::InvalidDate(value.to_string()))
}

/// First letter of each word in a name, used for avatars
pub(crate) fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}
