//! Domain and view-model types.
//!
//! Store-facing types keep the collaborator's snake_case field names
//! (`measurements`, `recovery_goals`, `calendar_events`, `profiles`).
//! View-facing types serialize camelCase for the rendering layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics;

/// The authenticated user the core acts on behalf of.
///
/// Resolved from the session token per operation and passed explicitly into
/// every fetcher and controller call — there is no ambient current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

/// Profile row, owned 1:1 by an identity. May be absent for a first-time
/// user; the dashboard falls back to a generic display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One timestamped measurement snapshot. Immutable once written — the only
/// write path is insert, and the dashboard reads the most recent by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub date: NaiveDate,
    pub rom_flexion: f64,
    pub rom_extension: f64,
    /// Unclamped at source; clamped to [0, 100] for display only.
    pub quad_strength_ratio: f64,
    pub pain_level: u8,
    #[serde(default)]
    pub swelling_circumference_cm: Option<f64>,
    #[serde(default)]
    pub single_leg_balance_seconds: Option<f64>,
}

/// Recovery goal. At most one per identity; saving replaces the existing
/// row, keyed on `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryGoal {
    pub goal_description: String,
    pub target_date: NaiveDate,
}

/// Calendar event. Many per identity, ordered ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

/// Writable event fields (everything but the id). Produced by validation
/// from an [`EventInput`], consumed by insert and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventFields {
    pub event_name: String,
    pub event_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============================================================================
// Form inputs — unvalidated, as typed by the user
// ============================================================================

/// Goal modal form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalInput {
    pub goal_description: String,
    pub target_date: Option<NaiveDate>,
}

impl From<&RecoveryGoal> for GoalInput {
    fn from(goal: &RecoveryGoal) -> Self {
        GoalInput {
            goal_description: goal.goal_description.clone(),
            target_date: Some(goal.target_date),
        }
    }
}

/// Event modal form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventInput {
    pub event_name: String,
    pub event_date: Option<NaiveDate>,
    pub description: String,
}

impl From<&CalendarEvent> for EventInput {
    fn from(event: &CalendarEvent) -> Self {
        EventInput {
            event_name: event.event_name.clone(),
            event_date: Some(event.event_date),
            description: event.description.clone().unwrap_or_default(),
        }
    }
}

/// Manual measurement entry form.
#[derive(Debug, Clone)]
pub struct MeasurementInput {
    pub date: NaiveDate,
    pub rom_flexion: f64,
    pub rom_extension: f64,
    pub quad_strength_ratio: f64,
    pub pain_level: u8,
    pub swelling_circumference_cm: Option<f64>,
    pub single_leg_balance_seconds: Option<f64>,
}

// ============================================================================
// View model
// ============================================================================

/// Latest measurement fields as shown on the dashboard. Zeroed when the
/// identity has no measurements yet, so derived metrics compute safely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementStats {
    pub rom_flexion: f64,
    pub rom_extension: f64,
    pub quad_strength_ratio: f64,
    pub pain_level: u8,
}

impl From<&Measurement> for MeasurementStats {
    fn from(m: &Measurement) -> Self {
        MeasurementStats {
            rom_flexion: m.rom_flexion,
            rom_extension: m.rom_extension,
            quad_strength_ratio: m.quad_strength_ratio,
            pain_level: m.pain_level,
        }
    }
}

/// Derived progress-bar values. Always clamped for rendering regardless of
/// the stored value range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBars {
    /// Flexion / 120°, clamped to [0, 1].
    pub rom_fraction: f64,
    /// min(quad strength ratio, 100), floored at 0. Also the displayed
    /// percentage.
    pub strength_pct: f64,
    /// Pain level / 10, clamped to [0, 1].
    pub pain_fraction: f64,
}

impl ProgressBars {
    pub fn from_stats(stats: &MeasurementStats) -> Self {
        ProgressBars {
            rom_fraction: metrics::rom_bar_fraction(stats.rom_flexion),
            strength_pct: metrics::strength_bar_value(stats.quad_strength_ratio),
            pain_fraction: metrics::pain_bar_fraction(stats.pain_level),
        }
    }
}

/// The assembled, render-ready dashboard aggregate. Rebuilt whole on every
/// fetch cycle — never partially stale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub display_name: String,
    pub stats: MeasurementStats,
    pub bars: ProgressBars,
    pub goal: Option<RecoveryGoal>,
    pub events: Vec<CalendarEvent>,
}
