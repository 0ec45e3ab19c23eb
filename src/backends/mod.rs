// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine and module backends for the accel framework.
//!
//! # Available Backends
//!
//! ## Software Backend
//! The built-in reference module and engine:
//! - **Operations**: copy, dualcast, compare, fill, crc32c
//! - **Completion**: inline, before the submission returns
//! - **Use Case**: fallback when no hardware engine serves a channel, and
//!   the semantic reference hardware engines are checked against
//!
//! ## Stub Backend (Test-Only)
//! Testing utilities for framework development (only available in test builds):
//! - **DeferredEngine**: hardware-like engine with held completions and batching
//! - **NullChannelEngine**: hardware engine that never hands out a channel
//! - **RejectingEngine**: refuses every submission
//! - **RecordingModule / DeferredFiniModule / FailingInitModule**: lifecycle recorders
//! - **Note**: NOT available in production builds
//!
//! # Architecture
//!
//! ```text
//! Module --init--> EngineSlots --create_channel--> AccelChannel --submit_*--> Engine
//! ```

pub mod software;
#[cfg(test)]
pub mod stub;
