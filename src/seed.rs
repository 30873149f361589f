//! Built-in dataset every session starts from unless a seed file is given.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use crate::domain::{
    board::Lane,
    calendar::{Event, EventColor, EventId},
    card::{Card, CardId, Priority},
    metrics::{
        ActivityEntry, ActivityKind, CategoryShare, Metrics, MetricUnit, Notification,
        PerformanceMetric, SalesPoint, SalesSeries, StatCard, Trend,
    },
    record::{AccountStatus, Record, RecordId, Role},
};
use crate::error::{DashError, Result};

/// Starting data for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    pub records: Vec<Record>,
    pub lanes: Vec<Lane>,
    pub events: Vec<Event>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub metrics: Metrics,
}

impl Seed {
    /// The stock demo dataset
    pub fn builtin() -> Self {
        Self {
            records: records(),
            lanes: lanes(),
            events: events(),
            notifications: notifications(),
            metrics: metrics(),
        }
    }

    /// Checks the identity invariants a session relies on: record, lane,
    /// card, event and notification IDs are each unique, card IDs across
    /// all lanes together.
    pub fn validate(&self) -> Result<()> {
        ensure_unique("record", self.records.iter().map(|r| r.id))?;
        ensure_unique("lane", self.lanes.iter().map(|l| &l.id))?;
        ensure_unique(
            "card",
            self.lanes.iter().flat_map(|l| l.cards.iter().map(|c| &c.id)),
        )?;
        ensure_unique("event", self.events.iter().map(|e| e.id))?;
        ensure_unique("notification", self.notifications.iter().map(|n| n.id))?;
        Ok(())
    }
}

fn ensure_unique<T, I>(kind: &str, ids: I) -> Result<()>
where
    T: Eq + Hash + Display,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if seen.contains(&id) {
            return Err(DashError::InvalidValue(format!(
                "Duplicate {} ID '{}' in seed",
                kind, id
            )));
        }
        seen.insert(id);
    }
    Ok(())
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    // Literal dates below are all valid
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn records() -> Vec<Record> {
    use AccountStatus::{Active, Inactive};
    use Role::{Admin, Editor, User};

    [
        (1, "John Doe", "john@example.com", Admin, Active, 15),
        (2, "Jane Smith", "jane@example.com", User, Active, 14),
        (3, "Bob Johnson", "bob@example.com", Editor, Inactive, 10),
        (4, "Alice Brown", "alice@example.com", User, Active, 15),
        (5, "Charlie Wilson", "charlie@example.com", Admin, Active, 13),
        (6, "Diana Davis", "diana@example.com", Editor, Inactive, 8),
        (7, "Eve Miller", "eve@example.com", User, Active, 15),
        (8, "Frank Garcia", "frank@example.com", User, Active, 14),
    ]
    .into_iter()
    .map(|(id, name, email, role, status, login)| {
        Record::new(RecordId::new(id), name, email, role, status, day(2024, 1, login))
    })
    .collect()
}

fn card(
    id: &str,
    title: &str,
    description: &str,
    assignee: &str,
    priority: Priority,
    due: u32,
) -> Card {
    Card {
        id: CardId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        assignee: assignee.to_string(),
        priority,
        due_date: day(2024, 1, due),
    }
}

fn lanes() -> Vec<Lane> {
    vec![
        Lane::new("todo", "To Do").with_cards(vec![
            card(
                "1",
                "Design System Update",
                "Update the design system with new components",
                "John Doe",
                Priority::High,
                20,
            ),
            card(
                "2",
                "User Research",
                "Conduct user interviews for the new feature",
                "Jane Smith",
                Priority::Medium,
                25,
            ),
        ]),
        Lane::new("progress", "In Progress").with_cards(vec![
            card(
                "3",
                "API Integration",
                "Integrate with third-party payment API",
                "Bob Johnson",
                Priority::High,
                18,
            ),
            card(
                "4",
                "Mobile Optimization",
                "Optimize the app for mobile devices",
                "Alice Brown",
                Priority::Medium,
                22,
            ),
        ]),
        Lane::new("review", "Review").with_cards(vec![card(
            "5",
            "Code Review",
            "Review pull request for the new feature",
            "Charlie Wilson",
            Priority::Low,
            16,
        )]),
        Lane::new("done", "Done").with_cards(vec![
            card(
                "6",
                "Database Migration",
                "Migrate user data to new database schema",
                "Diana Davis",
                Priority::High,
                15,
            ),
            card(
                "7",
                "Documentation",
                "Update API documentation",
                "Eve Miller",
                Priority::Low,
                14,
            ),
        ]),
    ]
}

fn events() -> Vec<Event> {
    [
        (1, "Team Meeting", 15, "10:00 AM", EventColor::Blue),
        (2, "Project Review", 18, "2:00 PM", EventColor::Green),
        (3, "Client Call", 22, "11:00 AM", EventColor::Purple),
        (4, "Deadline", 25, "5:00 PM", EventColor::Red),
        (5, "Workshop", 28, "9:00 AM", EventColor::Orange),
    ]
    .into_iter()
    .map(|(id, title, d, time, color)| Event {
        id: EventId::new(id),
        title: title.to_string(),
        date: day(2024, 1, d),
        time: time.to_string(),
        color,
    })
    .collect()
}

fn notifications() -> Vec<Notification> {
    [
        (1, "New user registered", "John Doe just signed up", "2 minutes ago", true),
        (2, "Order completed", "Order #1234 has been completed", "5 minutes ago", true),
        (3, "Payment received", "Payment of $299 received", "10 minutes ago", false),
        (4, "System update", "System maintenance completed", "1 hour ago", false),
    ]
    .into_iter()
    .map(|(id, title, message, time, unread)| Notification {
        id,
        title: title.to_string(),
        message: message.to_string(),
        time: time.to_string(),
        unread,
    })
    .collect()
}

fn metrics() -> Metrics {
    let stats = [
        ("Total Users", "12,345", 12.0, Trend::Positive),
        ("Revenue", "$45,678", 8.0, Trend::Positive),
        ("Orders", "1,234", 3.0, Trend::Negative),
        ("Growth", "23%", 15.0, Trend::Positive),
    ]
    .into_iter()
    .map(|(title, value, change, trend)| StatCard {
        title: title.to_string(),
        value: value.to_string(),
        change,
        trend,
    })
    .collect();

    let activity = [
        (1, "New user registered", "2 minutes ago", ActivityKind::User),
        (2, "Order #1234 completed", "5 minutes ago", ActivityKind::Order),
        (3, "Payment received", "10 minutes ago", ActivityKind::Payment),
        (4, "New product added", "15 minutes ago", ActivityKind::Product),
        (5, "System backup completed", "30 minutes ago", ActivityKind::System),
    ]
    .into_iter()
    .map(|(id, action, time, kind)| ActivityEntry {
        id,
        action: action.to_string(),
        time: time.to_string(),
        kind,
    })
    .collect();

    let sales = SalesSeries::new(
        [
            ("Jan", 4000.0),
            ("Feb", 3000.0),
            ("Mar", 5000.0),
            ("Apr", 4500.0),
            ("May", 6000.0),
            ("Jun", 5500.0),
        ]
        .into_iter()
        .map(|(month, value)| SalesPoint {
            month: month.to_string(),
            value,
        })
        .collect(),
    );

    let categories = [
        ("Electronics", 35.0),
        ("Clothing", 25.0),
        ("Books", 20.0),
        ("Home", 15.0),
        ("Other", 5.0),
    ]
    .into_iter()
    .map(|(name, percent)| CategoryShare {
        name: name.to_string(),
        percent,
    })
    .collect();

    let performance = [
        ("Page Views", 12500.0, 11200.0, 11.6, MetricUnit::Count),
        ("Unique Visitors", 8900.0, 8100.0, 9.9, MetricUnit::Count),
        ("Bounce Rate", 32.5, 35.2, -7.7, MetricUnit::Percent),
        ("Session Duration", 245.0, 220.0, 11.4, MetricUnit::Seconds),
    ]
    .into_iter()
    .map(|(name, current, previous, change, unit)| PerformanceMetric {
        name: name.to_string(),
        current,
        previous,
        change,
        unit,
    })
    .collect();

    Metrics {
        stats,
        activity,
        sales,
        categories,
        performance,
    }
}
