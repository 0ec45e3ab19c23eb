// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::backends::software::compare_bytes;
use crate::engine::batch::{AccelBatch, BatchOp, EngineBatchState};
use crate::engine::finish::FiniHandle;
use crate::engine::slots::EngineSlots;
use crate::engine::task::{Completion, EngineTask};
use crate::errors::{AccelError, AccelResult, Opcode};
use crate::traits::{AccelEngine, AccelModule, Capabilities, ModuleFini, NativeChannel};
use crate::utils::crc32c_update;

/// Hardware-like engine: data moves during submission, completions are held
/// until [`DeferredEngine::poll`] runs, the way an offload engine's completion
/// poller would deliver them.
pub struct DeferredEngine {
    name: &'static str,
    batch_max: u32,
    open: AtomicUsize,
    staged: AtomicUsize,
    pending: Mutex<VecDeque<(Completion, i32)>>,
}

/// Bytes of task scratch the deferred engine uses for its descriptor.
pub const DESCRIPTOR_LEN: usize = 9;

impl DeferredEngine {
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            batch_max: 4,
            open: AtomicUsize::new(0),
            staged: AtomicUsize::new(0),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_batch_max(mut self, batch_max: u32) -> Self {
        self.batch_max = batch_max;
        self
    }

    pub fn open_channels(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Descriptors written into task scratch regions so far.
    pub fn descriptors(&self) -> usize {
        self.staged.load(Ordering::SeqCst)
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Deliver every held completion. Returns how many fired.
    pub fn poll(&self) -> usize {
        let drained: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        let count = drained.len();
        for (completion, status) in drained {
            completion.complete(status);
        }
        count
    }

    /// Write an opcode byte and the length into the task scratch region, the
    /// way a device descriptor would be built there.
    fn stage(&self, scratch: &mut [u8], op: Opcode, nbytes: usize) {
        let descriptor = &mut scratch[..DESCRIPTOR_LEN];
        descriptor[0] = op as u8;
        descriptor[1..].copy_from_slice(&(nbytes as u64).to_le_bytes());
        self.staged.fetch_add(1, Ordering::SeqCst);
    }

    fn defer(&self, completion: Completion, status: i32) {
        self.pending.lock().unwrap().push_back((completion, status));
    }
}

struct DeferredBatch;

impl AccelEngine for DeferredEngine {
    fn name(&self) -> &'static str {
        self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::COPY
            | Capabilities::FILL
            | Capabilities::CRC32C
            | Capabilities::COMPARE
            | Capabilities::DUALCAST
            | Capabilities::BATCH
    }

    fn get_io_channel(&self) -> Option<NativeChannel> {
        self.open.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(()))
    }

    fn put_io_channel(&self, _ch: NativeChannel) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }

    fn copy(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        dst: &mut [u8],
        src: &[u8],
    ) -> AccelResult<()> {
        self.stage(task.offload_ctx, Opcode::Copy, src.len());
        dst.copy_from_slice(src);
        self.defer(task.completion, 0);
        Ok(())
    }

    fn dualcast(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        dst1: &mut [u8],
        dst2: &mut [u8],
        src: &[u8],
    ) -> AccelResult<()> {
        self.stage(task.offload_ctx, Opcode::Dualcast, src.len());
        dst1.copy_from_slice(src);
        dst2.copy_from_slice(src);
        self.defer(task.completion, 0);
        Ok(())
    }

    fn compare(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        src1: &[u8],
        src2: &[u8],
    ) -> AccelResult<()> {
        self.stage(task.offload_ctx, Opcode::Compare, src1.len());
        self.defer(task.completion, compare_bytes(src1, src2));
        Ok(())
    }

    fn fill(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        dst: &mut [u8],
        fill: u8,
    ) -> AccelResult<()> {
        self.stage(task.offload_ctx, Opcode::Fill, dst.len());
        dst.fill(fill);
        self.defer(task.completion, 0);
        Ok(())
    }

    fn crc32c(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        dst: &mut u32,
        src: &[u8],
        seed: u32,
    ) -> AccelResult<()> {
        self.stage(task.offload_ctx, Opcode::Crc32c, src.len());
        *dst = crc32c_update(src, !seed);
        self.defer(task.completion, 0);
        Ok(())
    }

    fn batch_get_max(&self) -> u32 {
        self.batch_max
    }

    fn batch_create(&self, _ch: &mut NativeChannel) -> AccelResult<EngineBatchState> {
        Ok(Box::new(DeferredBatch))
    }

    fn batch_prep_copy<'a>(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        batch: &mut AccelBatch<'a>,
        dst: &'a mut [u8],
        src: &'a [u8],
    ) -> AccelResult<()> {
        if batch.state_mut::<DeferredBatch>().is_none() {
            return Err(AccelError::InvalidArgument("not a deferred batch".to_string()));
        }
        self.stage(task.offload_ctx, Opcode::BatchPrepCopy, src.len());
        batch.push(BatchOp::Copy {
            dst,
            src,
            completion: task.completion,
        });
        Ok(())
    }

    fn batch_submit(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        batch: AccelBatch<'_>,
    ) -> AccelResult<()> {
        self.stage(task.offload_ctx, Opcode::BatchSubmit, batch.len());
        let (_state, ops) = batch.into_parts();
        for op in ops {
            match op {
                BatchOp::Copy {
                    dst,
                    src,
                    completion,
                } => {
                    dst.copy_from_slice(src);
                    self.defer(completion, 0);
                }
            }
        }
        self.defer(task.completion, 0);
        Ok(())
    }
}

impl fmt::Debug for DeferredEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredEngine").field("name", &self.name).finish()
    }
}

/// Hardware engine whose channel factory never produces a channel.
pub struct NullChannelEngine;

impl AccelEngine for NullChannelEngine {
    fn name(&self) -> &'static str {
        "null_channel"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::COPY
    }

    fn get_io_channel(&self) -> Option<NativeChannel> {
        None
    }
}

/// Engine that refuses every copy and fill it is handed.
pub struct RejectingEngine;

pub const REJECT_CODE: i32 = -5;

impl AccelEngine for RejectingEngine {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::COPY | Capabilities::FILL
    }

    fn get_io_channel(&self) -> Option<NativeChannel> {
        Some(Box::new(()))
    }

    fn copy(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _dst: &mut [u8],
        _src: &[u8],
    ) -> AccelResult<()> {
        Err(AccelError::Rejected {
            engine: self.name(),
            code: REJECT_CODE,
        })
    }

    fn fill(
        &self,
        _task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        _dst: &mut [u8],
        _fill: u8,
    ) -> AccelResult<()> {
        Err(AccelError::Rejected {
            engine: self.name(),
            code: REJECT_CODE,
        })
    }
}

pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Module that records its init and (optional, inline) fini in a shared log.
pub struct RecordingModule {
    name: &'static str,
    log: EventLog,
    ctx_size: usize,
    has_fini: bool,
}

impl RecordingModule {
    pub fn new(name: &'static str, log: EventLog) -> Self {
        Self {
            name,
            log,
            ctx_size: 0,
            has_fini: false,
        }
    }

    pub fn with_ctx_size(mut self, ctx_size: usize) -> Self {
        self.ctx_size = ctx_size;
        self
    }

    pub fn with_fini(mut self) -> Self {
        self.has_fini = true;
        self
    }
}

impl AccelModule for RecordingModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn module_init(&self, _engines: &EngineSlots) -> AccelResult<()> {
        self.log.lock().unwrap().push(format!("init:{}", self.name));
        Ok(())
    }

    fn module_fini(&self) -> Option<ModuleFini> {
        if !self.has_fini {
            return None;
        }
        let log = Arc::clone(&self.log);
        let name = self.name;
        Some(Box::new(move |done: FiniHandle| {
            log.lock().unwrap().push(format!("fini:{}", name));
            done.module_finished();
        }))
    }

    fn ctx_size(&self) -> usize {
        self.ctx_size
    }
}

/// Module whose fini parks its handle until the test calls [`signal`].
///
/// [`signal`]: DeferredFiniModule::signal
pub struct DeferredFiniModule {
    name: &'static str,
    log: EventLog,
    handle: Arc<Mutex<Option<FiniHandle>>>,
}

impl DeferredFiniModule {
    pub fn new(name: &'static str, log: EventLog) -> Self {
        Self {
            name,
            log,
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Report this module finished. `false` if its fini has not run yet.
    pub fn signal(&self) -> bool {
        let handle = self.handle.lock().unwrap().take();
        match handle {
            Some(handle) => {
                handle.module_finished();
                true
            }
            None => false,
        }
    }
}

impl AccelModule for DeferredFiniModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn module_init(&self, _engines: &EngineSlots) -> AccelResult<()> {
        self.log.lock().unwrap().push(format!("init:{}", self.name));
        Ok(())
    }

    fn module_fini(&self) -> Option<ModuleFini> {
        let log = Arc::clone(&self.log);
        let slot = Arc::clone(&self.handle);
        let name = self.name;
        Some(Box::new(move |done: FiniHandle| {
            log.lock().unwrap().push(format!("fini:{}", name));
            *slot.lock().unwrap() = Some(done);
        }))
    }
}

/// Module whose init always fails.
pub struct FailingInitModule {
    name: &'static str,
}

impl FailingInitModule {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl AccelModule for FailingInitModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn module_init(&self, _engines: &EngineSlots) -> AccelResult<()> {
        Err(AccelError::InvalidArgument("device not present".to_string()))
    }
}

/// Module that registers a given engine in the hardware slot.
pub struct StubHardwareModule {
    engine: Arc<dyn AccelEngine>,
    ctx_size: usize,
}

impl StubHardwareModule {
    pub fn new(engine: Arc<dyn AccelEngine>, ctx_size: usize) -> Self {
        Self { engine, ctx_size }
    }
}

impl AccelModule for StubHardwareModule {
    fn name(&self) -> &'static str {
        "stub_hw"
    }

    fn module_init(&self, engines: &EngineSlots) -> AccelResult<()> {
        engines.register_hw(Arc::clone(&self.engine));
        Ok(())
    }

    fn module_fini(&self) -> Option<ModuleFini> {
        Some(Box::new(|done: FiniHandle| {
            done.engines().unregister_hw();
            done.module_finished();
        }))
    }

    fn ctx_size(&self) -> usize {
        self.ctx_size
    }

    fn config_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "[StubHw]")?;
        writeln!(out, "  Enable Yes")
    }

    fn write_config_json(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "method": "stub_hw_scan_accel_engine",
            "params": { "engine": self.engine.name() }
        }))
    }
}
