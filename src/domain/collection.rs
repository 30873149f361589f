//! User directory backing the tables view.
//!
//! The directory owns the record list. Searching, filtering and sorting are
//! computed on read through [`apply`] and never touch the backing list;
//! deletion is the only mutation.

use crate::domain::record::{Record, RecordId, Role};
use crate::domain::sorting::{sort_records, SortState};
use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything that shapes the visible rows of the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    /// Free-text search over name and email
    #[serde(default)]
    pub search: String,
    /// Exact role filter, `None` shows every role
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub sort: SortState,
}

impl ViewQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    /// True when a record passes both the search and the role filter
    pub fn includes(&self, record: &Record) -> bool {
        record.matches_search(&self.search) && self.role.map_or(true, |role| record.role == role)
    }
}

/// Derives the visible rows for a query
///
/// Pure function of its inputs; calling it again on its own output with the
/// same query yields the same rows.
pub fn apply<'a>(records: &'a [Record], query: &ViewQuery) -> Vec<&'a Record> {
    let mut rows: Vec<&Record> = records.iter().filter(|r| query.includes(r)).collect();
    sort_records(&mut rows, query.sort);
    rows
}

/// The record list for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    records: Vec<Record>,
}

impl Directory {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Visible rows for the query
    pub fn view(&self, query: &ViewQuery) -> Vec<&Record> {
        apply(&self.records, query)
    }

    /// `(shown, total)` for the table footer
    pub fn summary(&self, query: &ViewQuery) -> (usize, usize) {
        let shown = self.records.iter().filter(|r| query.includes(r)).count();
        (shown, self.records.len())
    }

    /// Removes a record by ID and returns it
    pub fn delete(&mut self, id: RecordId) -> Result<Record> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DashError::RecordNotFound(id.to_string()))?;
        let removed = self.records.remove(pos);
        debug!(record = %removed.id, name = %removed.name, "deleted record");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::AccountStatus;
    use crate::domain::sorting::{SortKey, SortOrder};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(id: u32, name: &str, email: &str, role: Role) -> Record {
        Record::new(
            RecordId::new(id),
            name,
            email,
            role,
            AccountStatus::Active,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
    }

    fn sample() -> Vec<Record> {
        vec![
            record(1, "John Doe", "john@example.com", Role::Admin),
            record(2, "Jane Smith", "jane@example.com", Role::User),
            record(3, "Bob Johnson", "bob@example.com", Role::Editor),
            record(4, "Alice Brown", "alice@example.com", Role::User),
        ]
    }

    fn ids(rows: &[&Record]) -> Vec<u32> {
        rows.iter().map(|r| r.id.value()).collect()
    }

    #[test]
    fn test_search_matches_name_prefix() {
        let records = vec![
            record(1, "John Doe", "john@example.com", Role::Admin),
            record(2, "Jane Smith", "jane@example.com", Role::User),
        ];
        let query = ViewQuery::default().with_search("jo");

        assert_eq!(ids(&apply(&records, &query)), vec![1]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_covers_email() {
        let records = sample();

        let rows = apply(&records, &ViewQuery::default().with_search("JOHN"));
        assert_eq!(ids(&rows), vec![3, 1]);

        let rows = apply(&records, &ViewQuery::default().with_search("alice@"));
        assert_eq!(ids(&rows), vec![4]);
    }

    #[test]
    fn test_whitespace_in_search_is_literal() {
        let records = vec![
            record(1, "John Doe", "john@example.com", Role::Admin),
            record(2, "Cher", "cher@example.com", Role::User),
        ];

        let rows = apply(&records, &ViewQuery::default().with_search(" "));
        assert_eq!(ids(&rows), vec![1]);

        let rows = apply(&records, &ViewQuery::default().with_search("jo "));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_query_returns_everything_sorted_by_name() {
        let records = sample();
        let rows = apply(&records, &ViewQuery::default());
        assert_eq!(ids(&rows), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_role_filter_is_exact() {
        let records = sample();
        let query = ViewQuery::default().with_role(Some(Role::User));
        assert_eq!(ids(&apply(&records, &query)), vec![4, 2]);
    }

    #[test]
    fn test_search_and_role_combine() {
        let records = sample();
        let query = ViewQuery::default()
            .with_search("j")
            .with_role(Some(Role::Admin));
        assert_eq!(ids(&apply(&records, &query)), vec![1]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let records = sample();
        let query = ViewQuery::default()
            .with_search("o")
            .with_sort(SortState::new(SortKey::Email, SortOrder::Descending));

        let first: Vec<Record> = apply(&records, &query).into_iter().cloned().collect();
        let second: Vec<Record> = apply(&first, &query).into_iter().cloned().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_leaves_backing_list_untouched() {
        let directory = Directory::new(sample());
        let _ = directory.view(&ViewQuery::default().with_search("bob"));
        assert_eq!(directory.len(), 4);
        assert_eq!(directory.records()[0].id, RecordId::new(1));
    }

    #[test]
    fn test_summary_counts() {
        let directory = Directory::new(sample());
        let query = ViewQuery::default().with_role(Some(Role::User));
        assert_eq!(directory.summary(&query), (2, 4));
    }

    #[test]
    fn test_delete_removes_only_that_record() {
        let mut directory = Directory::new(sample());

        let removed = directory.delete(RecordId::new(2)).unwrap();

        assert_eq!(removed.name, "Jane Smith");
        assert_eq!(directory.len(), 3);
        assert!(directory.get(RecordId::new(2)).is_none());
        assert!(directory.get(RecordId::new(3)).is_some());
    }

    #[test]
    fn test_delete_unknown_record() {
        let mut directory = Directory::new(sample());
        let err = directory.delete(RecordId::new(99)).unwrap_err();
        assert!(matches!(err, DashError::RecordNotFound(_)));
        assert_eq!(directory.len(), 4);
    }
}
