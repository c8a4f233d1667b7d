//! Calendar event controller.
//!
//! Insert, update, and delete, each followed by a re-fetch of the full
//! ordered list before the modal may close. Update and delete verify the
//! record's owning identity client-side before issuing the write — the
//! store's own row filter is kept as defense in depth but never trusted
//! alone.

use crate::error::CoreError;
use crate::store::RehabStore;
use crate::types::{CalendarEvent, EventFields, EventInput, Identity};

/// Check the form before any store traffic.
pub fn validate_event(input: &EventInput) -> Result<EventFields, CoreError> {
    let name = input.event_name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Give the event a name before saving.".to_string(),
        ));
    }
    let event_date = input
        .event_date
        .ok_or_else(|| CoreError::Validation("Pick a date for the event.".to_string()))?;

    let description = input.description.trim();
    Ok(EventFields {
        event_name: name.to_string(),
        event_date,
        description: if description.is_empty() {
            None
        } else {
            Some(description.to_string())
        },
    })
}

/// Create or update an event, then return the refreshed ordered list.
///
/// `existing_id` present selects update-by-id; absent selects insert.
pub async fn save_event(
    store: &dyn RehabStore,
    who: &Identity,
    input: &EventInput,
    existing_id: Option<&str>,
) -> Result<Vec<CalendarEvent>, CoreError> {
    let fields = validate_event(input)?;

    match existing_id {
        Some(event_id) => {
            verify_ownership(store, who, event_id).await?;
            store.update_event(who, event_id, &fields).await?;
            log::info!("event {} updated for {}", event_id, who.user_id);
        }
        None => {
            store.insert_event(who, &fields).await?;
            log::info!("event created for {}", who.user_id);
        }
    }

    store.fetch_events(who).await
}

/// Permanently delete an event, then return the refreshed ordered list.
/// No field validation — delete is reachable only from the edit modal.
pub async fn delete_event(
    store: &dyn RehabStore,
    who: &Identity,
    event_id: &str,
) -> Result<Vec<CalendarEvent>, CoreError> {
    verify_ownership(store, who, event_id).await?;
    store.delete_event(who, event_id).await?;
    log::info!("event {} deleted for {}", event_id, who.user_id);

    store.fetch_events(who).await
}

/// Refuse to touch a record the identity cannot see. An id belonging to
/// another identity is indistinguishable from a missing one.
async fn verify_ownership(
    store: &dyn RehabStore,
    who: &Identity,
    event_id: &str,
) -> Result<(), CoreError> {
    match store.fetch_event(who, event_id).await? {
        Some(_) => Ok(()),
        None => Err(CoreError::Validation(
            "That event no longer exists on this account.".to_string(),
        )),
    }
}
