//! Database entity definitions.
//!
//! Entities map database rows to Rust structs and convert into the
//! corresponding domain models.

pub mod admission_token;
pub mod checkin;
pub mod event;
pub mod guest;

pub use admission_token::{AdmissionRecordRow, AdmissionTokenEntity};
pub use checkin::CheckInEntity;
pub use event::EventEntity;
pub use guest::GuestEntity;
