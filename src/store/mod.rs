//! Remote store boundary.
//!
//! The core is a pure consumer of a session-scoped relational store. The
//! [`RehabStore`] trait names every operation consumed, always with an
//! explicit [`Identity`] — services never read an ambient current user, so
//! they are testable without a live session.
//!
//! Modules:
//! - session: session token persistence and identity resolution
//! - postgrest: reqwest implementation against a PostgREST-style endpoint
//! - mock (test builds): scripted in-memory store

pub mod postgrest;
pub mod session;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{
    CalendarEvent, EventFields, Identity, Measurement, Profile, RecoveryGoal,
};

/// Every store operation the dashboard core performs.
///
/// Absence of an optional record is a valid result (`None` / empty list),
/// never an error. Errors are transport or query failures only.
#[async_trait]
pub trait RehabStore: Send + Sync {
    /// Profile by identity id. Absent for first-time users.
    async fn fetch_profile(&self, who: &Identity) -> Result<Option<Profile>, CoreError>;

    /// Most recent measurement by date, if any.
    async fn fetch_latest_measurement(
        &self,
        who: &Identity,
    ) -> Result<Option<Measurement>, CoreError>;

    /// The identity's recovery goal. At most one exists.
    async fn fetch_goal(&self, who: &Identity) -> Result<Option<RecoveryGoal>, CoreError>;

    /// All events for the identity, ascending by date.
    async fn fetch_events(&self, who: &Identity) -> Result<Vec<CalendarEvent>, CoreError>;

    /// One event by id, scoped to the identity. `None` when the id does
    /// not exist or belongs to someone else.
    async fn fetch_event(
        &self,
        who: &Identity,
        event_id: &str,
    ) -> Result<Option<CalendarEvent>, CoreError>;

    /// Insert the identity's first goal. The goal controller calls this
    /// only after a pre-read found none.
    async fn insert_goal(&self, who: &Identity, goal: &RecoveryGoal) -> Result<(), CoreError>;

    /// Replace the identity's existing goal in place, keyed on user id.
    async fn update_goal(&self, who: &Identity, goal: &RecoveryGoal) -> Result<(), CoreError>;

    async fn insert_event(&self, who: &Identity, fields: &EventFields) -> Result<(), CoreError>;

    /// Update by id and identity.
    async fn update_event(
        &self,
        who: &Identity,
        event_id: &str,
        fields: &EventFields,
    ) -> Result<(), CoreError>;

    /// Delete by id and identity. Permanent.
    async fn delete_event(&self, who: &Identity, event_id: &str) -> Result<(), CoreError>;

    /// Append one measurement snapshot. Measurements are never updated.
    async fn insert_measurement(
        &self,
        who: &Identity,
        measurement: &Measurement,
    ) -> Result<(), CoreError>;

    /// Update the profile row's display name.
    async fn update_profile_name(&self, who: &Identity, name: &str) -> Result<(), CoreError>;
}
