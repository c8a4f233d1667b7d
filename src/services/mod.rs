//! Business logic between the store boundary and the rendered view.

pub mod dashboard;
pub mod events;
pub mod exercises;
pub mod goals;
pub mod measurements;
pub mod profile;
