// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine selection and per-context channels.
//!
//! The engine decision is made once, when a channel is created: the hardware
//! engine wins if it is registered and hands out a sub-channel, otherwise the
//! software engine serves the channel. Every operation submitted on the
//! channel then goes straight to that engine.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::engine::slots::EngineSlots;
use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::channel::{
    ChannelBound, ChannelReleased, HardwareChannelUnavailable,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{AccelEngine, Capabilities, NativeChannel};

/// A consumer context's binding to one engine and its native sub-channel.
///
/// The channel owns the sub-channel and releases it on drop. It only
/// references the engine. Channels are `Send` but not `Sync`: a channel is
/// used from one context at a time.
pub struct AccelChannel {
    id: u64,
    engine: Arc<dyn AccelEngine>,
    ch: NativeChannel,
    task_size: usize,
}

impl AccelChannel {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Capability bitmask of the bound engine.
    pub fn get_capabilities(&self) -> Capabilities {
        self.engine.capabilities()
    }

    /// Scratch bytes every task submitted here must carry.
    pub fn task_size(&self) -> usize {
        self.task_size
    }

    pub(crate) fn engine(&self) -> &Arc<dyn AccelEngine> {
        &self.engine
    }

    pub(crate) fn parts_mut(&mut self) -> (&dyn AccelEngine, &mut NativeChannel) {
        (self.engine.as_ref(), &mut self.ch)
    }
}

impl Drop for AccelChannel {
    fn drop(&mut self) {
        let ch = std::mem::replace(&mut self.ch, Box::new(()));
        self.engine.put_io_channel(ch);
        ChannelReleased {
            channel_id: self.id,
            engine: self.engine.name(),
        }
        .log();
    }
}

impl fmt::Debug for AccelChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccelChannel")
            .field("id", &self.id)
            .field("engine", &self.engine.name())
            .finish()
    }
}

/// Channel ids are unique across every framework in the process, so a batch
/// can always tell its own channel apart.
static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Creates channels against the registered engine slots.
pub struct ChannelManager {
    engines: Arc<EngineSlots>,
    prefer_hardware: bool,
    task_size: usize,
}

impl ChannelManager {
    pub fn new(engines: Arc<EngineSlots>, prefer_hardware: bool, task_size: usize) -> Self {
        Self {
            engines,
            prefer_hardware,
            task_size,
        }
    }

    pub fn create_channel(&self) -> AccelResult<AccelChannel> {
        let id = NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed);

        if self.prefer_hardware {
            if let Some(hw) = self.engines.hw() {
                match hw.get_io_channel() {
                    Some(ch) => return Ok(self.bind(id, hw, ch)),
                    None => HardwareChannelUnavailable {
                        channel_id: id,
                        engine: hw.name(),
                    }
                    .log(),
                }
            }
        }

        let sw = self.engines.sw().ok_or(AccelError::NoSoftwareEngine)?;
        let ch = sw
            .get_io_channel()
            .ok_or(AccelError::SoftwareChannelUnavailable { engine: sw.name() })?;
        Ok(self.bind(id, sw, ch))
    }

    /// Release the channel's engine sub-channel. The engine itself is untouched.
    pub fn destroy_channel(&self, channel: AccelChannel) {
        drop(channel);
    }

    fn bind(&self, id: u64, engine: Arc<dyn AccelEngine>, ch: NativeChannel) -> AccelChannel {
        ChannelBound {
            channel_id: id,
            engine: engine.name(),
        }
        .log();
        AccelChannel {
            id,
            engine,
            ch,
            task_size: self.task_size,
        }
    }
}

impl fmt::Debug for ChannelManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelManager")
            .field("engines", &self.engines)
            .field("prefer_hardware", &self.prefer_hardware)
            .field("task_size", &self.task_size)
            .finish()
    }
}
