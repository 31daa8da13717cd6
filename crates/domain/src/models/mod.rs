//! Domain models for Eventgate.

pub mod admission_token;
pub mod checkin;
pub mod event;
pub mod guest;
pub mod outcome;

pub use admission_token::{AdmissionToken, TokenState};
pub use checkin::{CheckInMethod, CheckInRecord, ListCheckInsQuery, ManualCheckInRequest};
pub use event::{CreateEventRequest, Event, EventStatus, EventSummary};
pub use guest::{CreateGuestRequest, Guest, GuestDetails};
pub use outcome::{AdmissionRecord, ValidationOutcome};
