// Event patch module
// Partial-change set handed to the persistence boundary. Only the fields
// a gesture can touch are representable.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::event::Event;

/// Partial update to an event. `None` fields are left untouched.
///
/// Gestures only ever reposition an event in time, so the patch carries
/// the two timestamps and nothing else; flags like all-day stay with the
/// host record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Local>>,
}

impl EventPatch {
    /// Patch carrying a new start and end
    pub fn with_times(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Merge the patch over an event, producing the optimistic view.
    /// The original is left untouched.
    pub fn apply_to(&self, event: &Event) -> Event {
        let mut merged = event.clone();
        if let Some(start) = self.start {
            merged.start = start;
        }
        if let Some(end) = self.end {
            merged.end = end;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_event() -> Event {
        Event::new(
            "Meeting",
            Local.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_patch() {
        assert!(EventPatch::default().is_empty());
        assert!(!EventPatch::with_times(sample_event().start, sample_event().end).is_empty());
    }

    #[test]
    fn test_apply_to_merges_without_mutating_original() {
        let original = sample_event();
        let new_start = Local.with_ymd_and_hms(2025, 6, 10, 11, 0, 0).unwrap();
        let new_end = Local.with_ymd_and_hms(2025, 6, 10, 12, 30, 0).unwrap();

        let patch = EventPatch::with_times(new_start, new_end);
        let merged = patch.apply_to(&original);

        assert_eq!(merged.start, new_start);
        assert_eq!(merged.end, new_end);
        assert_eq!(merged.title, original.title);
        assert_eq!(original, sample_event());
    }

    #[test]
    fn test_empty_fields_are_not_serialized() {
        let start = Local.with_ymd_and_hms(2025, 6, 10, 11, 0, 0).unwrap();
        let patch = EventPatch {
            start: Some(start),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert!(json.contains("start"));
        assert!(!json.contains("end"));
    }

    #[test]
    fn test_patch_cannot_flip_all_day() {
        // The all-day flag belongs to the host record; a time patch must
        // carry it through unchanged.
        let mut original = sample_event();
        original.all_day = true;

        let patch = EventPatch::with_times(
            Local.with_ymd_and_hms(2025, 6, 10, 11, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap(),
        );
        assert!(patch.apply_to(&original).all_day);
    }
}
