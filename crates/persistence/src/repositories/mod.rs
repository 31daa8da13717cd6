//! Repository implementations for database operations.

pub mod admission_token;
pub mod checkin;
pub mod event;
pub mod guest;

pub use admission_token::{AdmissionTokenRepository, ConsumeResult, RegenerateResult};
pub use checkin::CheckInRepository;
pub use event::EventRepository;
pub use guest::GuestRepository;
