use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{DashError, Result};

/// Unique identifier for a card, derived from the creation timestamp
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Hands out card IDs from the wall clock in milliseconds
///
/// When two cards are created within the same millisecond the second ID is
/// bumped past the first, so IDs from one generator are strictly increasing.
#[derive(Debug, Default)]
pub struct CardIdGenerator {
    last: i64,
}

impl CardIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> CardId {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        CardId(self.last.to_string())
    }
}

/// Urgency shown as a badge on the card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = DashError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(DashError::InvalidValue(format!(
                "Invalid priority '{}'. Valid priorities: low, medium, high",
                s
            ))),
        }
    }
}

/// A task card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
}

impl Card {
    pub fn assignee_initials(&self) -> String {
        super::initials(&self.assignee)
    }
}

/// Raw form input for a new card
///
/// Everything is kept as entered until [`CardDraft::validate`] turns it into
/// a [`ValidCard`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub title: String,
    pub description: String,
    pub assignee: String,
    #[serde(default)]
    pub priority: Priority,
    /// `YYYY-MM-DD`
    pub due_date: String,
}

/// A draft that passed validation, waiting for an ID
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCard {
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
}

impl ValidCard {
    pub fn into_card(self, id: CardId) -> Card {
        Card {
            id,
            title: self.title,
            description: self.description,
            assignee: self.assignee,
            priority: self.priority,
            due_date: self.due_date,
        }
    }
}

impl CardDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        assignee: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            assignee: assignee.into(),
            priority: Priority::default(),
            due_date: due_date.into(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Checks required fields, reporting every missing one at once
    pub fn validate(&self) -> Result<ValidCard> {
        let missing: Vec<&'static str> = [
            ("title", &self.title),
            ("description", &self.description),
            ("assignee", &self.assignee),
            ("due date", &self.due_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(DashError::Validation { fields: missing });
        }

        let due_date = super::parse_day(&self.due_date)?;

        Ok(ValidCard {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            assignee: self.assignee.trim().to_string(),
            priority: self.priority,
            due_date,
        })
    }
}
