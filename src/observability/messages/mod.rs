// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit the same event with structured fields at its
//! designated level.
//!
//! # Organization
//!
//! * `engine` - engine slot registration and framework bring-up
//! * `channel` - channel binding and operation dispatch
//! * `module` - module init and the finish sequence
//!
//! # Usage Pattern
//!
//! ```rust
//! use accel_engine::observability::messages::StructuredLog;
//! use accel_engine::observability::messages::engine::HardwareEngineRegistered;
//!
//! HardwareEngineRegistered { engine: "ioat" }.log();
//! ```

use tracing::Span;

pub mod channel;
pub mod engine;
pub mod module;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
