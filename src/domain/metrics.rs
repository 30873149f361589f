//! Overview and analytics figures.
//!
//! These are fixed datasets in a session; the only mutable part is the
//! unread flag on notifications.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DashError, Result};

/// Direction of a stat card's change badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
}

/// Headline figure on the overview page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    /// Preformatted display value, e.g. `$45,678`
    pub value: String,
    /// Change in percent, always non-negative; direction is in `trend`
    pub change: f64,
    pub trend: Trend,
}

impl StatCard {
    /// Badge text such as `+12%` or `-3%`
    pub fn change_label(&self) -> String {
        let sign = match self.trend {
            Trend::Positive => '+',
            Trend::Negative => '-',
        };
        format!("{}{}%", sign, self.change)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    User,
    Order,
    Payment,
    Product,
    System,
}

/// Line in the recent activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: u32,
    pub action: String,
    /// Relative time as displayed, e.g. `5 minutes ago`
    pub time: String,
    pub kind: ActivityKind,
}

/// Header notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u32,
    pub title: String,
    pub message: String,
    pub time: String,
    pub unread: bool,
}

/// The notification tray
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inbox {
    notifications: Vec<Notification>,
}

impl Inbox {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self { notifications }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| n.unread).count()
    }

    pub fn mark_read(&mut self, id: u32) -> Result<()> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| DashError::NotificationNotFound(id.to_string()))?;
        notification.unread = false;
        Ok(())
    }

    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.unread = false;
        }
    }
}

/// Monthly sales bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub month: String,
    pub value: f64,
}

/// Sales series scaled against its own maximum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSeries {
    pub points: Vec<SalesPoint>,
}

impl SalesSeries {
    pub fn new(points: Vec<SalesPoint>) -> Self {
        Self { points }
    }

    pub fn max(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Value at `index` as a fraction of the maximum, 0 when the series is
    /// empty, all zero, or the index is out of range
    pub fn relative(&self, index: usize) -> f64 {
        let max = self.max();
        match self.points.get(index) {
            Some(point) if max > 0.0 => point.value / max,
            _ => 0.0,
        }
    }

    /// Relative heights for every point
    pub fn normalized(&self) -> Vec<f64> {
        (0..self.points.len()).map(|i| self.relative(i)).collect()
    }
}

/// Slice of the sales-by-category breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    /// Share in percent
    pub percent: f64,
}

/// Unit used when printing a performance figure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    #[default]
    Count,
    Percent,
    Seconds,
}

/// Current vs previous period comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub name: String,
    pub current: f64,
    pub previous: f64,
    /// Change in percent, negative for a drop
    pub change: f64,
    #[serde(default)]
    pub unit: MetricUnit,
}

impl PerformanceMetric {
    /// Share of the current period in `current + previous`, capped at 1
    pub fn ratio(&self) -> f64 {
        let total = self.current + self.previous;
        if total <= 0.0 {
            return 0.0;
        }
        (self.current / total).min(1.0)
    }

    pub fn is_improvement(&self) -> bool {
        self.change > 0.0
    }

    pub fn format_value(&self, value: f64) -> String {
        match self.unit {
            MetricUnit::Count => format!("{}", value),
            MetricUnit::Percent => format!("{}%", value),
            MetricUnit::Seconds => format!("{}s", value),
        }
    }
}

impl fmt::Display for PerformanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_improvement() { "+" } else { "" };
        write!(
            f,
            "{}: {} ({}{}%)",
            self.name,
            self.format_value(self.current),
            sign,
            self.change
        )
    }
}

/// Everything the overview and charts pages display
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub stats: Vec<StatCard>,
    pub activity: Vec<ActivityEntry>,
    pub sales: SalesSeries,
    pub categories: Vec<CategoryShare>,
    pub performance: Vec<PerformanceMetric>,
}

impl Metrics {
    /// Sum of category shares; the chart expects 100
    pub fn category_total(&self) -> f64 {
        self.categories.iter().map(|c| c.percent).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: u32, unread: bool) -> Notification {
        Notification {
            id,
            title: format!("N{}", id),
            message: String::new(),
            time: "now".to_string(),
            unread,
        }
    }

    fn metric(current: f64, previous: f64, change: f64) -> PerformanceMetric {
        PerformanceMetric {
            name: "Page Views".to_string(),
            current,
            previous,
            change,
            unit: MetricUnit::Count,
        }
    }

    #[test]
    fn test_unread_count_and_mark_read() {
        let mut inbox = Inbox::new(vec![
            notification(1, true),
            notification(2, true),
            notification(3, false),
        ]);
        assert_eq!(inbox.unread_count(), 2);

        inbox.mark_read(1).unwrap();
        assert_eq!(inbox.unread_count(), 1);

        assert!(inbox.mark_read(42).is_err());

        inbox.mark_all_read();
        assert_eq!(inbox.unread_count(), 0);
    }

    #[test]
    fn test_sales_relative_values() {
        let series = SalesSeries::new(vec![
            SalesPoint { month: "Jan".to_string(), value: 3000.0 },
            SalesPoint { month: "Feb".to_string(), value: 6000.0 },
        ]);

        assert_eq!(series.max(), 6000.0);
        assert_eq!(series.normalized(), vec![0.5, 1.0]);
        assert_eq!(series.relative(9), 0.0);
    }

    #[test]
    fn test_empty_sales_series() {
        let series = SalesSeries::default();
        assert_eq!(series.relative(0), 0.0);
        assert!(series.normalized().is_empty());
    }

    #[test]
    fn test_performance_ratio() {
        assert_eq!(metric(300.0, 100.0, 11.6).ratio(), 0.75);
        assert_eq!(metric(0.0, 0.0, 0.0).ratio(), 0.0);
        assert!(metric(1.0, 1.0, 11.6).is_improvement());
        assert!(!metric(1.0, 1.0, -7.7).is_improvement());
    }

    #[test]
    fn test_metric_display_units() {
        let mut bounce = metric(32.5, 35.2, -7.7);
        bounce.name = "Bounce Rate".to_string();
        bounce.unit = MetricUnit::Percent;
        assert_eq!(bounce.to_string(), "Bounce Rate: 32.5% (-7.7%)");

        let mut session = metric(245.0, 220.0, 11.4);
        session.unit = MetricUnit::Seconds;
        assert_eq!(session.format_value(245.0), "245s");
    }

    #[test]
    fn test_stat_card_change_label() {
        let card = StatCard {
            title: "Orders".to_string(),
            value: "1,234".to_string(),
            change: 3.0,
            trend: Trend::Negative,
        };
        assert_eq!(card.change_label(), "-3%");
    }
}
