use crate::domain::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Columns of the user table that can be sorted on
///
/// `Name` and `Email` compare case-insensitively, so "alice" sorts next to
/// "Alice" rather than after every capitalized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Id,
    Name,
    Email,
    Role,
    Status,
    LastLogin,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Arrow shown next to the active column header
    pub fn indicator(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "email" => Ok(SortKey::Email),
            "role" => Ok(SortKey::Role),
            "status" => Ok(SortKey::Status),
            "last-login" | "last_login" | "lastlogin" => Ok(SortKey::LastLogin),
            _ => Err(format!(
                "Invalid sort key '{}'. Valid keys: id, name, email, role, status, last-login",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Active sort column plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in ascending order.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.order = self.order.flipped();
        } else {
            self.key = key;
            self.order = SortOrder::Ascending;
        }
    }

    /// Indicator for a column header, `None` when the column is not active
    pub fn indicator_for(&self, key: SortKey) -> Option<&'static str> {
        (self.key == key).then(|| self.order.indicator())
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortKey::Name, SortOrder::Ascending)
    }
}

/// Compares two records on a single column
pub fn compare_records(a: &Record, b: &Record, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Name => compare_text(&a.name, &b.name),
        SortKey::Email => compare_text(&a.email, &b.email),
        SortKey::Role => a.role.label().cmp(b.role.label()),
        SortKey::Status => a.status.label().cmp(b.status.label()),
        SortKey::LastLogin => a.last_login.cmp(&b.last_login),
    }
}

/// Sorts records in place on the given state
///
/// `sort_by` is stable, so records with equal keys keep their relative
/// order in both directions.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use dashdeck_core::domain::record::{AccountStatus, Record, RecordId, Role};
/// use dashdeck_core::domain::sorting::{sort_records, SortKey, SortOrder, SortState};
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let mut records = vec![
///     Record::new(RecordId::new(2), "Jane", "jane@example.com", Role::User, AccountStatus::Active, day),
///     Record::new(RecordId::new(1), "Bob", "bob@example.com", Role::Admin, AccountStatus::Active, day),
/// ];
///
/// sort_records(&mut records, SortState::new(SortKey::Name, SortOrder::Ascending));
/// assert_eq!(records[0].name, "Bob");
/// ```
pub fn sort_records<R: AsRef<Record>>(records: &mut [R], state: SortState) {
    records.sort_by(|a, b| {
        let cmp = compare_records(a.as_ref(), b.as_ref(), state.key);
        match state.order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Case-insensitive text ordering, falling back to the raw bytes so the
/// ordering stays total
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
