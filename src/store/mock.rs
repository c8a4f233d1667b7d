//! Scripted in-memory store for service and state tests.
//!
//! Single-identity by construction (ids are scoped by the caller), with
//! per-operation failure injection and call counting so tests can assert
//! that guarded flows perform no store traffic.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{
    CalendarEvent, EventFields, Identity, Measurement, Profile, RecoveryGoal,
};

#[derive(Default)]
struct Inner {
    profile: Option<Profile>,
    measurements: Vec<Measurement>,
    goal: Option<RecoveryGoal>,
    events: Vec<CalendarEvent>,
    next_id: u32,
    failing_ops: HashSet<&'static str>,
    calls: HashMap<&'static str, u32>,
}

#[derive(Default)]
pub struct MockStore {
    inner: Mutex<Inner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.inner.lock().unwrap().profile = Some(profile);
        self
    }

    pub fn with_measurements(self, measurements: Vec<Measurement>) -> Self {
        self.inner.lock().unwrap().measurements = measurements;
        self
    }

    pub fn with_goal(self, goal: RecoveryGoal) -> Self {
        self.inner.lock().unwrap().goal = Some(goal);
        self
    }

    pub fn with_events(self, events: Vec<CalendarEvent>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.events = events;
            inner.events.sort_by_key(|e| e.event_date);
        }
        self
    }

    /// Make one named operation fail with a store error.
    pub fn fail_on(self, op: &'static str) -> Self {
        self.inner.lock().unwrap().failing_ops.insert(op);
        self
    }

    /// Let a previously failing operation succeed again, mid-test.
    pub fn clear_failure(&self, op: &str) {
        self.inner.lock().unwrap().failing_ops.remove(op);
    }

    pub fn call_count(&self, op: &str) -> u32 {
        *self.inner.lock().unwrap().calls.get(op).unwrap_or(&0)
    }

    pub fn stored_goal(&self) -> Option<RecoveryGoal> {
        self.inner.lock().unwrap().goal.clone()
    }

    pub fn stored_events(&self) -> Vec<CalendarEvent> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn stored_measurements(&self) -> Vec<Measurement> {
        self.inner.lock().unwrap().measurements.clone()
    }

    fn enter(&self, op: &'static str) -> Result<std::sync::MutexGuard<'_, Inner>, CoreError> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(op).or_insert(0) += 1;
        if inner.failing_ops.contains(op) {
            return Err(CoreError::Api {
                status: 500,
                message: format!("mock failure in {}", op),
            });
        }
        Ok(inner)
    }
}

#[async_trait]
impl super::RehabStore for MockStore {
    async fn fetch_profile(&self, _who: &Identity) -> Result<Option<Profile>, CoreError> {
        Ok(self.enter("fetch_profile")?.profile.clone())
    }

    async fn fetch_latest_measurement(
        &self,
        _who: &Identity,
    ) -> Result<Option<Measurement>, CoreError> {
        let inner = self.enter("fetch_latest_measurement")?;
        Ok(inner
            .measurements
            .iter()
            .max_by_key(|m| m.date)
            .cloned())
    }

    async fn fetch_goal(&self, _who: &Identity) -> Result<Option<RecoveryGoal>, CoreError> {
        Ok(self.enter("fetch_goal")?.goal.clone())
    }

    async fn fetch_events(&self, _who: &Identity) -> Result<Vec<CalendarEvent>, CoreError> {
        let inner = self.enter("fetch_events")?;
        let mut events = inner.events.clone();
        events.sort_by_key(|e| e.event_date);
        Ok(events)
    }

    async fn fetch_event(
        &self,
        _who: &Identity,
        event_id: &str,
    ) -> Result<Option<CalendarEvent>, CoreError> {
        let inner = self.enter("fetch_event")?;
        Ok(inner.events.iter().find(|e| e.id == event_id).cloned())
    }

    async fn insert_goal(&self, _who: &Identity, goal: &RecoveryGoal) -> Result<(), CoreError> {
        let mut inner = self.enter("insert_goal")?;
        // Mirrors a unique key on user_id: inserting over an existing
        // goal is a store error, not a silent replace.
        if inner.goal.is_some() {
            return Err(CoreError::Api {
                status: 409,
                message: "duplicate goal for user".to_string(),
            });
        }
        inner.goal = Some(goal.clone());
        Ok(())
    }

    async fn update_goal(&self, _who: &Identity, goal: &RecoveryGoal) -> Result<(), CoreError> {
        let mut inner = self.enter("update_goal")?;
        // PATCH over zero rows succeeds without writing anything.
        if inner.goal.is_some() {
            inner.goal = Some(goal.clone());
        }
        Ok(())
    }

    async fn insert_event(&self, _who: &Identity, fields: &EventFields) -> Result<(), CoreError> {
        let mut inner = self.enter("insert_event")?;
        inner.next_id += 1;
        let id = format!("evt-{}", inner.next_id);
        inner.events.push(CalendarEvent {
            id,
            event_name: fields.event_name.clone(),
            event_date: fields.event_date,
            description: fields.description.clone(),
        });
        Ok(())
    }

    async fn update_event(
        &self,
        _who: &Identity,
        event_id: &str,
        fields: &EventFields,
    ) -> Result<(), CoreError> {
        let mut inner = self.enter("update_event")?;
        if let Some(event) = inner.events.iter_mut().find(|e| e.id == event_id) {
            event.event_name = fields.event_name.clone();
            event.event_date = fields.event_date;
            event.description = fields.description.clone();
        }
        Ok(())
    }

    async fn delete_event(&self, _who: &Identity, event_id: &str) -> Result<(), CoreError> {
        let mut inner = self.enter("delete_event")?;
        inner.events.retain(|e| e.id != event_id);
        Ok(())
    }

    async fn insert_measurement(
        &self,
        _who: &Identity,
        measurement: &Measurement,
    ) -> Result<(), CoreError> {
        self.enter("insert_measurement")?
            .measurements
            .push(measurement.clone());
        Ok(())
    }

    async fn update_profile_name(&self, _who: &Identity, name: &str) -> Result<(), CoreError> {
        let mut inner = self.enter("update_profile_name")?;
        if let Some(profile) = inner.profile.as_mut() {
            profile.name = Some(name.to_string());
        }
        Ok(())
    }
}

/// Fixed identity for tests.
pub fn test_identity() -> Identity {
    Identity {
        user_id: uuid::Uuid::from_u128(0xA11CE),
        email: "pat@example.com".to_string(),
    }
}
