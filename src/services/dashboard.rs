//! Dashboard aggregation — fan-out fetch, fan-in assemble.
//!
//! The four record fetchers are independent and run concurrently; the
//! assembler waits for all of them. Any hard fetch failure fails the whole
//! load — partial data is never rendered, so the view is either a complete
//! consistent set or an error state.

use serde::Serialize;

use crate::error::CoreError;
use crate::store::RehabStore;
use crate::types::{
    CalendarEvent, DashboardData, Identity, Measurement, MeasurementStats, Profile,
    ProgressBars, RecoveryGoal,
};

/// Display name when no profile (or no name) exists yet.
const FALLBACK_DISPLAY_NAME: &str = "User";

/// p95 latency budget for the full dashboard load.
const DASHBOARD_LATENCY_BUDGET_MS: u128 = 300;

/// Result type for dashboard data loading.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardResult {
    Success { data: DashboardData },
    Error { message: String },
}

/// Load and assemble the dashboard for an identity.
///
/// Fan-out/fan-in: the four fetches run concurrently and the first hard
/// error aborts the join, so latency tracks the slowest single fetch.
pub async fn load_dashboard(
    store: &dyn RehabStore,
    who: &Identity,
) -> Result<DashboardData, CoreError> {
    let started = std::time::Instant::now();

    let (profile, latest, goal, events) = tokio::try_join!(
        store.fetch_profile(who),
        store.fetch_latest_measurement(who),
        store.fetch_goal(who),
        store.fetch_events(who),
    )?;

    let data = assemble(profile, latest, goal, events);
    log_latency("load_dashboard", started, DASHBOARD_LATENCY_BUDGET_MS);
    Ok(data)
}

/// Load wrapped for rendering: failures become the dashboard error state.
pub async fn load_dashboard_result(store: &dyn RehabStore, who: &Identity) -> DashboardResult {
    match load_dashboard(store, who).await {
        Ok(data) => DashboardResult::Success { data },
        Err(e) => {
            log::warn!("dashboard load failed: {}", e);
            DashboardResult::Error {
                message: e.user_message(),
            }
        }
    }
}

/// Pure assembler over the four fetch results. No network, no mutation;
/// idempotent for the same inputs.
pub fn assemble(
    profile: Option<Profile>,
    latest: Option<Measurement>,
    goal: Option<RecoveryGoal>,
    events: Vec<CalendarEvent>,
) -> DashboardData {
    let display_name = profile
        .and_then(|p| p.name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());

    let stats = latest
        .as_ref()
        .map(MeasurementStats::from)
        .unwrap_or_default();
    let bars = ProgressBars::from_stats(&stats);

    DashboardData {
        display_name,
        stats,
        bars,
        goal,
        events,
    }
}

fn log_latency(operation: &str, started: std::time::Instant, budget_ms: u128) {
    let elapsed_ms = started.elapsed().as_millis();
    if elapsed_ms > budget_ms {
        log::warn!(
            "{} exceeded latency budget: {}ms > {}ms",
            operation,
            elapsed_ms,
            budget_ms
        );
    } else {
        log::debug!("{} completed in {}ms", operation, elapsed_ms);
    }
}
