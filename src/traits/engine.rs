// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The engine plugin contract.
//!
//! An engine is a backend's operation table. Every operation has a default
//! body that reports [`AccelError::Unsupported`], so an engine only overrides
//! what it advertises in [`AccelEngine::capabilities`].
//!
//! Submission contract shared by every operation:
//! * `Ok(())` means the operation was accepted and the engine will call
//!   `task.complete(status)` exactly once, inline or later.
//! * `Err(_)` means the submission was rejected and the engine must not
//!   complete the task.

use std::any::Any;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::engine::batch::{AccelBatch, EngineBatchState};
use crate::engine::task::EngineTask;
use crate::errors::{AccelError, AccelResult, Opcode};

/// Engine-native sub-channel handle. Owned by exactly one `AccelChannel`.
pub type NativeChannel = Box<dyn Any + Send>;

/// Capability bitmask, one bit per operation family.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u64);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    pub const COPY: Capabilities = Capabilities(1 << 0);
    pub const FILL: Capabilities = Capabilities(1 << 1);
    pub const CRC32C: Capabilities = Capabilities(1 << 2);
    pub const COMPARE: Capabilities = Capabilities(1 << 3);
    pub const BATCH: Capabilities = Capabilities(1 << 4);
    pub const DUALCAST: Capabilities = Capabilities(1 << 5);

    pub const fn from_bits(bits: u64) -> Self {
        Capabilities(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    /// Capability bit that gates `op`.
    pub const fn for_opcode(op: Opcode) -> Capabilities {
        match op {
            Opcode::Copy => Capabilities::COPY,
            Opcode::Dualcast => Capabilities::DUALCAST,
            Opcode::Compare => Capabilities::COMPARE,
            Opcode::Fill => Capabilities::FILL,
            Opcode::Crc32c => Capabilities::CRC32C,
            Opcode::BatchCreate | Opcode::BatchPrepCopy | Opcode::BatchSubmit => {
                Capabilities::BATCH
            }
        }
    }

    pub const fn supports(self, op: Opcode) -> bool {
        self.contains(Capabilities::for_opcode(op))
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Capabilities) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Capabilities, &str); 6] = [
            (Capabilities::COPY, "COPY"),
            (Capabilities::FILL, "FILL"),
            (Capabilities::CRC32C, "CRC32C"),
            (Capabilities::COMPARE, "COMPARE"),
            (Capabilities::BATCH, "BATCH"),
            (Capabilities::DUALCAST, "DUALCAST"),
        ];
        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(cap, _)| self.contains(*cap))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Capabilities({})", set.join(" | "))
    }
}

pub trait AccelEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Channel factory. `None` means the engine cannot serve this context.
    fn get_io_channel(&self) -> Option<NativeChannel>;

    /// Release a sub-channel obtained from `get_io_channel`.
    fn put_io_channel(&self, ch: NativeChannel) {
        drop(ch);
    }

    fn copy(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _dst: &mut [u8],
        _src: &[u8],
    ) -> AccelResult<()> {
        Err(AccelError::unsupported(Opcode::Copy, self.name()))
    }

    fn dualcast(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _dst1: &mut [u8],
        _dst2: &mut [u8],
        _src: &[u8],
    ) -> AccelResult<()> {
        Err(AccelError::unsupported(Opcode::Dualcast, self.name()))
    }

    /// Completion status carries the three-way comparison result.
    fn compare(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _src1: &[u8],
        _src2: &[u8],
    ) -> AccelResult<()> {
        Err(AccelError::unsupported(Opcode::Compare, self.name()))
    }

    fn fill(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _dst: &mut [u8],
        _fill: u8,
    ) -> AccelResult<()> {
        Err(AccelError::unsupported(Opcode::Fill, self.name()))
    }

    /// Writes `crc32c_update(src, !seed)` to `dst`.
    fn crc32c(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _dst: &mut u32,
        _src: &[u8],
        _seed: u32,
    ) -> AccelResult<()> {
        Err(AccelError::unsupported(Opcode::Crc32c, self.name()))
    }

    /// Maximum operations per batch, `0` when batching is unsupported.
    fn batch_get_max(&self) -> u32 {
        0
    }

    fn batch_create(&self, _ch: &mut NativeChannel) -> AccelResult<EngineBatchState> {
        Err(AccelError::unsupported(Opcode::BatchCreate, self.name()))
    }

    /// Queue a copy; its completion fires once the batch has been submitted
    /// and this element finishes.
    fn batch_prep_copy<'a>(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _batch: &mut AccelBatch<'a>,
        _dst: &'a mut [u8],
        _src: &'a [u8],
    ) -> AccelResult<()> {
        Err(AccelError::unsupported(Opcode::BatchPrepCopy, self.name()))
    }

    /// Execute every queued element. The submit task completes after all of
    /// them have.
    fn batch_submit(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _batch: AccelBatch<'_>,
    ) -> AccelResult<()> {
        Err(AccelError::unsupported(Opcode::BatchSubmit, self.name()))
    }
}
