// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in the accel framework. Message types follow a
//! struct-based pattern with a `Display` implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between events
//! * Provide consistent, structured logging output
//!
//! # Usage
//!
//! ```rust
//! use accel_engine::observability::messages::channel::DualcastMisaligned;
//!
//! let msg = DualcastMisaligned {
//!     channel_id: 3,
//!     dst1_addr: 0x1000,
//!     dst2_addr: 0x2010,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
