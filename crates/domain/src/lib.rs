//! Domain layer for the Eventgate backend.
//!
//! This crate contains:
//! - Domain models (Event, Guest, AdmissionToken, CheckInRecord)
//! - Validation and commit outcome variants
//! - Admission business rules (date gate, outcome evaluation)

pub mod models;
pub mod services;
