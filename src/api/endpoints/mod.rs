//! API endpoint handlers. Each delegates to `TriageSession`.

pub mod analyze;
pub mod health;
pub mod predict;
pub mod symptoms;
