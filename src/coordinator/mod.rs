//! Optimistic mutation coordinator.
//!
//! The single choke point for persisting gesture results. An update is
//! merged over the event and surfaced immediately for rendering, then the
//! store is awaited; on failure the caller is handed the original event
//! back so speculative rendering can be rolled back. Calls are
//! independent: overlapping updates to the same event are not serialized
//! here, the caller is expected to disable the control while one is in
//! flight.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use crate::gestures::CandidateRange;
use crate::models::event::Event;
use crate::models::patch::EventPatch;

/// Canonical result of a persisted update
#[derive(Clone, Debug, PartialEq)]
pub struct StoredUpdate {
    /// Authoritative event as persisted
    pub event: Event,
    /// External calendars the change was synced to, for user feedback
    pub synced_calendars: Vec<String>,
}

/// Persistence boundary. In the host application this is typically an
/// HTTP PUT against an events endpoint; the coordinator only needs
/// success or failure plus the canonical event on success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn update_event(&self, id: i64, patch: EventPatch) -> anyhow::Result<StoredUpdate>;
}

/// Collaborator notified around an update's lifecycle. All methods have
/// no-op defaults.
pub trait MutationObserver: Send + Sync {
    /// The merged event, surfaced before any network round-trip
    fn on_optimistic(&self, _event: &Event) {}
    /// Persisted; `synced_calendars` lists external calendars updated
    fn on_success(&self, _event: &Event, _synced_calendars: &[String]) {}
    /// Persistence failed; `original` is the pre-change event to roll
    /// back to
    fn on_error(&self, _original: &Event, _message: &str) {}
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("event has no id and cannot be persisted")]
    MissingId,
    #[error("candidate time falls into a local-time gap")]
    LocalTimeGap,
    #[error("failed to update event: {0}")]
    Store(String),
}

/// A failed update retained for the retry affordance
#[derive(Clone, Debug)]
struct FailedUpdate {
    original: Event,
    patch: EventPatch,
    message: String,
}

pub struct UpdateCoordinator {
    store: Arc<dyn EventStore>,
    observer: Option<Arc<dyn MutationObserver>>,
    last_failure: Mutex<Option<FailedUpdate>>,
}

impl UpdateCoordinator {
    /// Lock the retained failure, recovering from a poisoned guard. The
    /// stored value is a plain snapshot, so a panic elsewhere never makes
    /// it unsafe to read.
    fn failure_slot(&self) -> std::sync::MutexGuard<'_, Option<FailedUpdate>> {
        self.last_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            observer: None,
            last_failure: Mutex::new(None),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn MutationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Apply `patch` to `event` optimistically and persist it.
    ///
    /// An empty patch returns the original event verbatim without
    /// touching the store.
    pub async fn update(&self, event: &Event, patch: EventPatch) -> Result<Event, UpdateError> {
        if patch.is_empty() {
            return Ok(event.clone());
        }
        let id = event.id.ok_or(UpdateError::MissingId)?;

        let optimistic = patch.apply_to(event);
        if let Some(observer) = &self.observer {
            observer.on_optimistic(&optimistic);
        }

        match self.store.update_event(id, patch.clone()).await {
            Ok(update) => {
                *self.failure_slot() = None;
                log::debug!(
                    "event {} updated, synced to {} calendar(s)",
                    id,
                    update.synced_calendars.len()
                );
                if let Some(observer) = &self.observer {
                    observer.on_success(&update.event, &update.synced_calendars);
                }
                Ok(update.event)
            }
            Err(err) => {
                let message = err.to_string();
                log::warn!("event {} update failed: {}", id, message);
                *self.failure_slot() = Some(FailedUpdate {
                    original: event.clone(),
                    patch,
                    message: message.clone(),
                });
                if let Some(observer) = &self.observer {
                    observer.on_error(event, &message);
                }
                Err(UpdateError::Store(message))
            }
        }
    }

    /// Persist a gesture's candidate range for `event`
    pub async fn commit(
        &self,
        event: &Event,
        range: &CandidateRange,
    ) -> Result<Event, UpdateError> {
        let patch = range.to_patch().ok_or(UpdateError::LocalTimeGap)?;
        self.update(event, patch).await
    }

    /// Re-issue the most recent failed update, if any
    pub async fn retry(&self) -> Option<Result<Event, UpdateError>> {
        let failed = self.failure_slot().take()?;
        Some(self.update(&failed.original, failed.patch).await)
    }

    /// Message of the most recent failed update, if any
    pub fn last_error(&self) -> Option<String> {
        self.failure_slot().as_ref().map(|f| f.message.clone())
    }

    pub fn has_pending_retry(&self) -> bool {
        self.failure_slot().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn sample_event() -> Event {
        let mut event = Event::new(
            "Meeting",
            Local.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap(),
        )
        .unwrap();
        event.id = Some(42);
        event
    }

    fn shifted_patch() -> EventPatch {
        EventPatch::with_times(
            Local.with_ymd_and_hms(2025, 6, 10, 11, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap(),
        )
    }

    /// Records every observer notification for assertions
    #[derive(Default)]
    struct RecordingObserver {
        optimistic: Mutex<Vec<Event>>,
        successes: Mutex<Vec<(Event, Vec<String>)>>,
        errors: Mutex<Vec<(Event, String)>>,
    }

    impl MutationObserver for RecordingObserver {
        fn on_optimistic(&self, event: &Event) {
            self.optimistic.lock().unwrap().push(event.clone());
        }

        fn on_success(&self, event: &Event, synced: &[String]) {
            self.successes
                .lock()
                .unwrap()
                .push((event.clone(), synced.to_vec()));
        }

        fn on_error(&self, original: &Event, message: &str) {
            self.errors
                .lock()
                .unwrap()
                .push((original.clone(), message.to_string()));
        }
    }

    #[tokio::test]
    async fn test_empty_patch_returns_original_without_store_call() {
        let mut store = MockEventStore::new();
        store.expect_update_event().times(0);

        let coordinator = UpdateCoordinator::new(Arc::new(store));
        let event = sample_event();

        let result = coordinator
            .update(&event, EventPatch::default())
            .await
            .unwrap();
        assert_eq!(result, event);
    }

    #[tokio::test]
    async fn test_missing_id_is_rejected() {
        let coordinator = UpdateCoordinator::new(Arc::new(MockEventStore::new()));
        let mut event = sample_event();
        event.id = None;

        let err = coordinator.update(&event, shifted_patch()).await.unwrap_err();
        assert!(matches!(err, UpdateError::MissingId));
    }

    #[tokio::test]
    async fn test_success_notifies_optimistic_then_success() {
        let event = sample_event();
        let patch = shifted_patch();
        let authoritative = patch.apply_to(&event);

        let mut store = MockEventStore::new();
        let stored = StoredUpdate {
            event: authoritative.clone(),
            synced_calendars: vec!["google".to_string()],
        };
        store
            .expect_update_event()
            .times(1)
            .withf(|id, _| *id == 42)
            .return_once(move |_, _| Ok(stored));

        let observer = Arc::new(RecordingObserver::default());
        let coordinator =
            UpdateCoordinator::new(Arc::new(store)).with_observer(observer.clone());

        let result = coordinator.update(&event, patch.clone()).await.unwrap();
        assert_eq!(result, authoritative);

        let optimistic = observer.optimistic.lock().unwrap();
        assert_eq!(optimistic.len(), 1);
        assert_eq!(optimistic[0], patch.apply_to(&event));

        let successes = observer.successes.lock().unwrap();
        assert_eq!(successes.len(), 1);
        assert_eq!(successes[0].1, vec!["google".to_string()]);
        assert!(!coordinator.has_pending_retry());
    }

    #[tokio::test]
    async fn test_failure_rolls_back_to_original() {
        let event = sample_event();
        let before = event.clone();

        let mut store = MockEventStore::new();
        store
            .expect_update_event()
            .times(1)
            .returning(|_, _| Err(anyhow!("server unavailable")));

        let observer = Arc::new(RecordingObserver::default());
        let coordinator =
            UpdateCoordinator::new(Arc::new(store)).with_observer(observer.clone());

        let err = coordinator.update(&event, shifted_patch()).await.unwrap_err();
        assert!(matches!(err, UpdateError::Store(_)));

        // The observer is handed the pre-change event for rollback
        let errors = observer.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, before);
        assert!(errors[0].1.contains("server unavailable"));

        assert_eq!(coordinator.last_error().unwrap(), "server unavailable");
        assert!(coordinator.has_pending_retry());
    }

    #[tokio::test]
    async fn test_retry_reissues_failed_update() {
        let event = sample_event();
        let patch = shifted_patch();
        let authoritative = patch.apply_to(&event);

        let mut store = MockEventStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_update_event()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(anyhow!("timeout")));
        let stored = StoredUpdate {
            event: authoritative.clone(),
            synced_calendars: vec![],
        };
        store
            .expect_update_event()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_, _| Ok(stored));

        let coordinator = UpdateCoordinator::new(Arc::new(store));
        assert!(coordinator.update(&event, patch).await.is_err());

        let retried = coordinator.retry().await.unwrap().unwrap();
        assert_eq!(retried, authoritative);
        assert!(!coordinator.has_pending_retry());
        assert!(coordinator.retry().await.is_none());
    }

    #[test]
    fn test_poisoned_failure_slot_still_answers() {
        let coordinator = UpdateCoordinator::new(Arc::new(MockEventStore::new()));

        // Poison the retained-failure lock by panicking while holding it
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = coordinator.last_failure.lock().unwrap();
            panic!("holder panicked");
        }));
        assert!(result.is_err());

        // Queries recover the guard instead of propagating the panic
        assert!(!coordinator.has_pending_retry());
        assert!(coordinator.last_error().is_none());
    }

    #[tokio::test]
    async fn test_commit_converts_range_to_patch() {
        let event = sample_event();

        let mut store = MockEventStore::new();
        store
            .expect_update_event()
            .times(1)
            .withf(|_, patch| patch.start.is_some() && patch.end.is_some())
            .returning(|_, patch| {
                let mut event = sample_event_for_mock();
                event.start = patch.start.unwrap();
                event.end = patch.end.unwrap();
                Ok(StoredUpdate {
                    event,
                    synced_calendars: vec![],
                })
            });

        let coordinator = UpdateCoordinator::new(Arc::new(store));
        let range = CandidateRange::new(
            chrono::NaiveDate::from_ymd_opt(2025, 6, 11)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 6, 11)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
        );

        let updated = coordinator.commit(&event, &range).await.unwrap();
        assert_eq!(updated.duration_minutes(), 90);
    }

    fn sample_event_for_mock() -> Event {
        sample_event()
    }
}
