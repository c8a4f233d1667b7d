//! Dashboard state — the view model plus both modal machines, and the
//! flows that connect them: guard → fetch → assemble, and modal →
//! controller → targeted refresh → partial view update.
//!
//! Identity is re-resolved through the session guard at the top of every
//! flow; no data operation runs while it is unresolved.

use std::sync::Arc;

use crate::error::CoreError;
use crate::modal::{ModalState, SubmitMode};
use crate::services::{dashboard, events, goals};
use crate::store::session::SessionGuard;
use crate::store::RehabStore;
use crate::types::{
    CalendarEvent, DashboardData, EventInput, GoalInput, Identity, RecoveryGoal,
};

pub struct DashboardState {
    store: Arc<dyn RehabStore>,
    guard: Arc<dyn SessionGuard>,
    /// The last fully assembled view, or `None` when loading failed.
    /// Never holds a partial result.
    pub view: Option<DashboardData>,
    /// Message for the dashboard error state.
    pub load_error: Option<String>,
    pub goal_modal: ModalState<GoalInput, ()>,
    pub event_modal: ModalState<EventInput, String>,
}

impl DashboardState {
    pub fn new(store: Arc<dyn RehabStore>, guard: Arc<dyn SessionGuard>) -> Self {
        DashboardState {
            store,
            guard,
            view: None,
            load_error: None,
            goal_modal: ModalState::Closed,
            event_modal: ModalState::Closed,
        }
    }

    fn resolve_identity(&self) -> Result<Identity, CoreError> {
        self.guard.resolve().map(|(identity, _session)| identity)
    }

    /// Full dashboard load. On failure the data-dependent view is cleared
    /// and the error is kept for rendering; the caller routes to sign-in
    /// when the error is an auth failure.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let who = match self.resolve_identity() {
            Ok(who) => who,
            Err(e) => {
                self.view = None;
                self.load_error = Some(e.user_message());
                return Err(e);
            }
        };

        match dashboard::load_dashboard(self.store.as_ref(), &who).await {
            Ok(data) => {
                self.view = Some(data);
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                self.view = None;
                self.load_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Swap a refreshed goal into the view. A mutation can succeed while
    /// no view is assembled (the previous load failed); rebuild the whole
    /// view then, so the saved data is not dropped.
    async fn refresh_goal_section(&mut self, refreshed: Option<RecoveryGoal>) {
        match self.view.as_mut() {
            Some(view) => view.goal = refreshed,
            // load() records its own error state on failure.
            None => {
                let _ = self.load().await;
            }
        }
    }

    /// Same discipline for the event list.
    async fn refresh_events_section(&mut self, refreshed: Vec<CalendarEvent>) {
        match self.view.as_mut() {
            Some(view) => view.events = refreshed,
            None => {
                let _ = self.load().await;
            }
        }
    }

    // ------------------------------------------------------------------
    // Goal modal
    // ------------------------------------------------------------------

    /// Open the goal modal, pre-filled from the current goal when one is
    /// set (the goal is a singleton, so edit and create share a target).
    pub fn open_goal_modal(&mut self) {
        let existing = self.view.as_ref().and_then(|v| v.goal.as_ref());
        match existing {
            Some(goal) => self.goal_modal.open_edit((), GoalInput::from(goal)),
            None => self.goal_modal.open_create(GoalInput::default()),
        }
    }

    /// Submit the goal modal. Re-entrant calls while submitting are
    /// no-ops. On success the goal section is refreshed and the modal
    /// closes; on failure it stays open with the message and the fields.
    pub async fn submit_goal(&mut self) -> Result<(), CoreError> {
        let Some((_mode, form)) = self.goal_modal.begin_submit() else {
            return Ok(());
        };

        let who = match self.resolve_identity() {
            Ok(who) => who,
            Err(e) => {
                self.goal_modal.fail(e.user_message());
                return Err(e);
            }
        };

        match goals::save_goal(self.store.as_ref(), &who, &form).await {
            Ok(refreshed) => {
                self.refresh_goal_section(refreshed).await;
                self.goal_modal.succeed();
                Ok(())
            }
            Err(e) => {
                self.goal_modal.fail(e.user_message());
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Event modal
    // ------------------------------------------------------------------

    pub fn open_event_modal(&mut self) {
        self.event_modal.open_create(EventInput::default());
    }

    pub fn open_event_modal_for(&mut self, event: &CalendarEvent) {
        self.event_modal
            .open_edit(event.id.clone(), EventInput::from(event));
    }

    /// Submit the event modal (create or update depending on how it was
    /// opened). Same guard and refresh discipline as the goal flow; the
    /// whole ordered event list is the refresh target.
    pub async fn submit_event(&mut self) -> Result<(), CoreError> {
        let Some((mode, form)) = self.event_modal.begin_submit() else {
            return Ok(());
        };
        let existing_id = match &mode {
            SubmitMode::Edit(id) => Some(id.as_str()),
            _ => None,
        };

        let who = match self.resolve_identity() {
            Ok(who) => who,
            Err(e) => {
                self.event_modal.fail(e.user_message());
                return Err(e);
            }
        };

        match events::save_event(self.store.as_ref(), &who, &form, existing_id).await {
            Ok(refreshed) => {
                self.refresh_events_section(refreshed).await;
                self.event_modal.succeed();
                Ok(())
            }
            Err(e) => {
                self.event_modal.fail(e.user_message());
                Err(e)
            }
        }
    }

    /// Delete the event being edited. Only reachable from the edit modal;
    /// skips field validation. The list must drop the id immediately
    /// after confirmation.
    pub async fn delete_event(&mut self) -> Result<(), CoreError> {
        let Some(event_id) = self.event_modal.begin_delete() else {
            return Ok(());
        };

        let who = match self.resolve_identity() {
            Ok(who) => who,
            Err(e) => {
                self.event_modal.fail(e.user_message());
                return Err(e);
            }
        };

        match events::delete_event(self.store.as_ref(), &who, &event_id).await {
            Ok(refreshed) => {
                self.refresh_events_section(refreshed).await;
                self.event_modal.succeed();
                Ok(())
            }
            Err(e) => {
                self.event_modal.fail(e.user_message());
                Err(e)
            }
        }
    }
}
