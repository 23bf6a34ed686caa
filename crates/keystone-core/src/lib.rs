//! Keystone Core: shared types, errors, and utilities.
//!
//! This crate provides the foundational types used across all Keystone crates.
//! It has no internal Keystone dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`bad_request`]: Bad-request failures and the error-list formatter
//! - [`clock`]: Injectable time source

pub mod bad_request;
pub mod clock;
pub mod error;

// Re-export key types at crate root for convenience
pub use bad_request::{format_error_lines, BadRequest, IdentityError, ValidationFailure};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
