// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for channel binding and operation dispatch.

use crate::errors::{AccelError, Opcode};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A channel was bound to an engine.
///
/// # Log Level
/// `debug!` - One per consumer context
pub struct ChannelBound<'a> {
    pub channel_id: u64,
    pub engine: &'a str,
}

impl Display for ChannelBound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Accel channel {} bound to engine '{}'", self.channel_id, self.engine)
    }
}

impl StructuredLog for ChannelBound<'_> {
    fn log(&self) {
        tracing::debug!(channel_id = self.channel_id, engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "channel_bound",
            span_name = name,
            channel_id = self.channel_id,
            engine = self.engine,
        )
    }
}

/// The hardware engine had no sub-channel for this context.
///
/// # Log Level
/// `debug!` - Fallback to the software engine follows
pub struct HardwareChannelUnavailable<'a> {
    pub channel_id: u64,
    pub engine: &'a str,
}

impl Display for HardwareChannelUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Hardware engine '{}' returned no channel for accel channel {}, using software",
            self.engine, self.channel_id
        )
    }
}

impl StructuredLog for HardwareChannelUnavailable<'_> {
    fn log(&self) {
        tracing::debug!(channel_id = self.channel_id, engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "hw_channel_unavailable",
            span_name = name,
            channel_id = self.channel_id,
            engine = self.engine,
        )
    }
}

/// Channel released its engine sub-channel.
///
/// # Log Level
/// `trace!` - Per-context teardown
pub struct ChannelReleased<'a> {
    pub channel_id: u64,
    pub engine: &'a str,
}

impl Display for ChannelReleased<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Accel channel {} released from '{}'", self.channel_id, self.engine)
    }
}

impl StructuredLog for ChannelReleased<'_> {
    fn log(&self) {
        tracing::trace!(channel_id = self.channel_id, engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "channel_released",
            span_name = name,
            channel_id = self.channel_id,
            engine = self.engine,
        )
    }
}

/// Dualcast destinations are not 4 KiB aligned.
///
/// # Log Level
/// `error!` - Caller bug, submission refused
///
/// # Example
/// ```
/// use accel_engine::observability::messages::channel::DualcastMisaligned;
///
/// let msg = DualcastMisaligned { channel_id: 1, dst1_addr: 0x1000, dst2_addr: 0x2008 };
/// assert!(msg.to_string().contains("4K alignment"));
/// ```
pub struct DualcastMisaligned {
    pub channel_id: u64,
    pub dst1_addr: usize,
    pub dst2_addr: usize,
}

impl Display for DualcastMisaligned {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dualcast requires 4K alignment on dst addresses (dst1={:#x}, dst2={:#x})",
            self.dst1_addr, self.dst2_addr
        )
    }
}

impl StructuredLog for DualcastMisaligned {
    fn log(&self) {
        tracing::error!(
            channel_id = self.channel_id,
            dst1_addr = self.dst1_addr,
            dst2_addr = self.dst2_addr,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("dualcast_misaligned", span_name = name, channel_id = self.channel_id)
    }
}

/// Submission refused by the bound engine or by dispatch validation.
///
/// # Log Level
/// `warn!` for engine rejections, `debug!` for unsupported operations
pub struct SubmissionRejected<'a> {
    pub channel_id: u64,
    pub engine: &'a str,
    pub op: Opcode,
    pub error: &'a AccelError,
}

impl Display for SubmissionRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Accel channel {} {} submission on '{}' rejected: {}",
            self.channel_id, self.op, self.engine, self.error
        )
    }
}

impl StructuredLog for SubmissionRejected<'_> {
    fn log(&self) {
        let op = self.op.to_string();
        match self.error {
            AccelError::Unsupported { .. } => tracing::debug!(
                channel_id = self.channel_id,
                engine = self.engine,
                op = op.as_str(),
                errno = self.error.errno(),
                "{}", self
            ),
            _ => tracing::warn!(
                channel_id = self.channel_id,
                engine = self.engine,
                op = op.as_str(),
                errno = self.error.errno(),
                "{}", self
            ),
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "submission_rejected",
            span_name = name,
            channel_id = self.channel_id,
            engine = self.engine,
        )
    }
}
