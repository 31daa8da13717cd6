//! Shared utilities for the Eventgate backend.
//!
//! This crate provides common functionality used across the other crates:
//! - Opaque admission token generation
//! - JWT access token utilities for organizer authentication

pub mod jwt;
pub mod token;
