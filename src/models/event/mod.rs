// Event module
// The calendar event as seen by the gesture engine. The host application
// owns the full record; the engine only reads identity, the time span and
// the flags derived from it.

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

/// Minimum event duration in minutes. Gestures never produce a shorter span.
pub const MIN_DURATION_MINUTES: i64 = 15;

/// Calendar event as consumed by the gesture engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<i64>,
    pub title: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub all_day: bool,
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Arguments
    /// * `title` - Event title (required, non-empty)
    /// * `start` - Event start time
    /// * `end` - Event end time
    ///
    /// # Returns
    /// Returns `Result<Event, String>` with validation
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Self, String> {
        let title = title.into();

        if title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if end < start {
            return Err("Event end time must not precede start time".to_string());
        }

        Ok(Self {
            id: None,
            title,
            start,
            end,
            all_day: false,
        })
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.end < self.start {
            return Err("Event end time must not precede start time".to_string());
        }

        Ok(())
    }

    /// Get the duration of the event
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Duration in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when the event spans more than one calendar day.
    /// Derived from the dates, never settable independently.
    pub fn is_multi_day(&self) -> bool {
        self.start.date_naive() != self.end.date_naive()
    }

    /// Number of calendar days touched by the event, inclusive
    pub fn day_span(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days() + 1
    }
}

/// Builder for creating events with optional fields.
/// When no end is given, the end defaults to `start + duration`
/// (and to the minimum duration when neither is given).
pub struct EventBuilder {
    title: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    duration_minutes: Option<i64>,
    all_day: bool,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            title: None,
            start: None,
            end: None,
            duration_minutes: None,
            all_day: false,
        }
    }

    /// Set the event title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the start time
    pub fn start(mut self, start: DateTime<Local>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the end time
    pub fn end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the duration in minutes, used when no explicit end is given
    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Set as all-day event
    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Build the event
    pub fn build(self) -> Result<Event, String> {
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;

        let end = match self.end {
            Some(end) => end,
            None => {
                let minutes = self
                    .duration_minutes
                    .unwrap_or(MIN_DURATION_MINUTES)
                    .max(MIN_DURATION_MINUTES);
                start + Duration::minutes(minutes)
            }
        };

        let event = Event {
            id: None,
            title,
            start,
            end,
            all_day: self.all_day,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
