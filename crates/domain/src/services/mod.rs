//! Domain services for Eventgate.
//!
//! Services contain business logic that operates on domain models.

pub mod admission;

pub use admission::{evaluate_validation, DATE_GATE_MESSAGE};
