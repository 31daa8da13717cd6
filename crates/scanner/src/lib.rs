//! Operator-side check-in client.
//!
//! Wraps the admission HTTP API in a typed client and drives the per-scan
//! session state machine used by scanner UIs. Business outcomes (unknown
//! token, wrong day, already checked in) are states to render; only
//! transport faults surface as errors.

pub mod client;
pub mod error;
pub mod outcome;
pub mod session;

pub use client::{CheckinClient, UnauthorizedHandler};
pub use error::ScannerError;
pub use outcome::{AdmissionApi, CheckedInGuest, CheckinOutcome, ValidateOutcome};
pub use session::{ScanSession, ScanState};
