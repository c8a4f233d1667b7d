//! RehabOS dashboard core.
//!
//! Headless client logic for a personal rehabilitation tracker: resolves
//! the signed-in identity, gathers profile / latest measurement / recovery
//! goal / calendar events from the remote store, assembles them into one
//! consistent view model with derived metrics, and runs guarded goal and
//! event mutations with deterministic post-mutation refresh.
//!
//! Rendering and routing live elsewhere; this crate produces the view
//! model and owns the modal and mutation flows behind it.

pub mod config;
pub mod error;
pub mod metrics;
pub mod modal;
pub mod services;
pub mod state;
pub mod store;
pub mod types;

pub use error::CoreError;
