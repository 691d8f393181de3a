use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Class,
    Pickup,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Class, EventType::Pickup, EventType::Other];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Class => "class",
            EventType::Pickup => "pickup",
            EventType::Other => "other",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownEventType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: EventType,
    pub location_id: Uuid,
    pub start_date_time: DateTime<Utc>,
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurring_rule: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: EventType,
    pub location_id: Uuid,
    pub start_date_time: DateTime<Utc>,
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurring_rule: Option<String>,
}

impl NewEvent {
    #[must_use]
    pub fn into_event(self, id: Uuid, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            event_type: self.event_type,
            location_id: self.location_id,
            start_date_time: self.start_date_time,
            end_date_time: self.end_date_time,
            recurring_rule: self.recurring_rule,
            created_at,
        }
    }
}

/// An event joined with the venue hosting it. Events have no position of
/// their own; distance is always measured to the venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventWithLocation {
    #[serde(flatten)]
    pub event: Event,
    pub location: Location,
}

/// Named start-time windows offered by the events search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    Today,
    /// Monday through Sunday of the current week.
    Week,
    /// The next 30 days.
    Upcoming,
}

impl DateWindow {
    /// Inclusive `(start, end)` bounds relative to `now`. Day boundaries are UTC.
    #[must_use]
    pub fn bounds(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let day_start = Utc
            .from_utc_datetime(&now.date_naive().and_time(chrono::NaiveTime::MIN));
        let just_before = Duration::milliseconds(1);
        match self {
            DateWindow::Today => (day_start, day_start + Duration::days(1) - just_before),
            DateWindow::Week => {
                let offset = i64::from(now.weekday().num_days_from_monday());
                let week_start = day_start - Duration::days(offset);
                (week_start, week_start + Duration::days(7) - just_before)
            }
            DateWindow::Upcoming => (now, now + Duration::days(30)),
        }
    }
}

impl FromStr for DateWindow {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DateWindow::Today),
            "week" => Ok(DateWindow::Week),
            "upcoming" => Ok(DateWindow::Upcoming),
            _ => Err(CoreError::UnknownDateWindow(s.to_string())),
        }
    }
}

/// Type and start-time constraints shared by every events query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub event_type: Option<EventType>,
    pub starts_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl EventFilter {
    #[must_use]
    pub fn new(
        event_type: Option<EventType>,
        window: Option<DateWindow>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type,
            starts_between: window.map(|w| w.bounds(now)),
        }
    }

    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if self.event_type.is_some_and(|t| t != event.event_type) {
            return false;
        }
        match self.starts_between {
            Some((start, end)) => event.start_date_time >= start && event.start_date_time <= end,
            None => true,
        }
    }
}
