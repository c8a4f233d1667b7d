//! Modal state machine for the goal and event dialogs.
//!
//! A tagged-variant machine rather than boolean flags, so impossible
//! combinations (submitting while closed, delete from create) cannot be
//! represented. `F` is the form type, `Id` identifies the record being
//! edited (`()` for the singleton goal).

/// What a submit resolved from [`ModalState::begin_submit`] should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode<Id> {
    Create,
    Edit(Id),
    Delete(Id),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<F, Id> {
    Closed,
    OpenCreate {
        form: F,
        error: Option<String>,
    },
    OpenEdit {
        id: Id,
        form: F,
        error: Option<String>,
    },
    /// In flight. The submit control is disabled; re-entrant submits are
    /// no-ops. Keeps the form so a failure can restore it untouched.
    Submitting {
        mode: SubmitMode<Id>,
        form: F,
    },
}

impl<F, Id> Default for ModalState<F, Id> {
    fn default() -> Self {
        ModalState::Closed
    }
}

impl<F: Clone, Id: Clone> ModalState<F, Id> {
    /// Open for a new record with empty/default fields.
    pub fn open_create(&mut self, form: F) {
        *self = ModalState::OpenCreate { form, error: None };
    }

    /// Open for an existing record, pre-populating all fields from it.
    pub fn open_edit(&mut self, id: Id, form: F) {
        *self = ModalState::OpenEdit {
            id,
            form,
            error: None,
        };
    }

    /// Cancel from any open state: discards uncommitted input, no
    /// persistence side effect.
    pub fn cancel(&mut self) {
        *self = ModalState::Closed;
    }

    /// Move to `Submitting` and hand the caller what to do.
    ///
    /// Returns `None` when closed or already submitting — the idempotent
    /// submit guard: a second trigger before resolution performs nothing.
    pub fn begin_submit(&mut self) -> Option<(SubmitMode<Id>, F)> {
        let (mode, form) = match self {
            ModalState::OpenCreate { form, .. } => (SubmitMode::Create, form.clone()),
            ModalState::OpenEdit { id, form, .. } => (SubmitMode::Edit(id.clone()), form.clone()),
            ModalState::Closed | ModalState::Submitting { .. } => return None,
        };
        *self = ModalState::Submitting {
            mode: mode.clone(),
            form: form.clone(),
        };
        Some((mode, form))
    }

    /// Delete the record being edited. Only available from `OpenEdit`;
    /// bypasses field validation by construction (the form is not handed
    /// back to the caller).
    pub fn begin_delete(&mut self) -> Option<Id> {
        let (id, form) = match self {
            ModalState::OpenEdit { id, form, .. } => (id.clone(), form.clone()),
            _ => return None,
        };
        *self = ModalState::Submitting {
            mode: SubmitMode::Delete(id.clone()),
            form,
        };
        Some(id)
    }

    /// Mutation confirmed and the targeted refresh completed: close.
    pub fn succeed(&mut self) {
        *self = ModalState::Closed;
    }

    /// Mutation failed: reopen with the error displayed and the
    /// user-entered fields preserved so they can retry without re-typing.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        *self = match std::mem::take(self) {
            ModalState::Submitting { mode, form } => match mode {
                SubmitMode::Create => ModalState::OpenCreate {
                    form,
                    error: Some(message),
                },
                SubmitMode::Edit(id) | SubmitMode::Delete(id) => ModalState::OpenEdit {
                    id,
                    form,
                    error: Some(message),
                },
            },
            // A validation failure reported while already open: keep the
            // state, attach the message.
            ModalState::OpenCreate { form, .. } => ModalState::OpenCreate {
                form,
                error: Some(message),
            },
            ModalState::OpenEdit { id, form, .. } => ModalState::OpenEdit {
                id,
                form,
                error: Some(message),
            },
            ModalState::Closed => ModalState::Closed,
        };
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, ModalState::Submitting { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModalState::OpenCreate { error, .. } | ModalState::OpenEdit { error, .. } => {
                error.as_deref()
            }
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&F> {
        match self {
            ModalState::OpenCreate { form, .. }
            | ModalState::OpenEdit { form, .. }
            | ModalState::Submitting { form, .. } => Some(form),
            ModalState::Closed => None,
        }
    }
}
