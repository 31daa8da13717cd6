//! HTTP route handlers.

pub mod checkin;
pub mod events;
pub mod guests;
pub mod health;
pub mod qr_codes;
