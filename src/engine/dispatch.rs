// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Public submission entry points.
//!
//! Every operation follows the same path: validate synchronously, check the
//! bound engine's capability bit, store the caller's callback on the task and
//! forward to the engine with the task's completion trampoline. `Ok(())` means
//! the callback will fire exactly once; any `Err` means it never will.

use crate::engine::batch::AccelBatch;
use crate::engine::channel::AccelChannel;
use crate::engine::task::{AccelTask, EngineTask};
use crate::errors::{AccelError, AccelResult, Opcode};
use crate::observability::messages::channel::{DualcastMisaligned, SubmissionRejected};
use crate::observability::messages::StructuredLog;
use crate::traits::{AccelEngine, NativeChannel};

/// Dualcast destinations must sit on this boundary.
pub const DUALCAST_ALIGNMENT: usize = 0x1000;

fn check_len(what: &str, len: usize, nbytes: usize) -> AccelResult<()> {
    if len < nbytes {
        return Err(AccelError::InvalidArgument(format!(
            "{} is {} bytes, operation needs {}",
            what, len, nbytes
        )));
    }
    Ok(())
}

fn is_aligned(buf: &[u8]) -> bool {
    (buf.as_ptr() as usize) & (DUALCAST_ALIGNMENT - 1) == 0
}

impl AccelChannel {
    fn reject(&self, op: Opcode, error: AccelError) -> AccelError {
        SubmissionRejected {
            channel_id: self.id(),
            engine: self.engine_name(),
            op,
            error: &error,
        }
        .log();
        error
    }

    fn check_supported(&self, op: Opcode) -> AccelResult<()> {
        if self.get_capabilities().supports(op) {
            Ok(())
        } else {
            Err(self.reject(op, AccelError::unsupported(op, self.engine_name())))
        }
    }

    fn submit<F>(
        &mut self,
        op: Opcode,
        task: &mut AccelTask,
        cb: impl FnOnce(i32) + Send + 'static,
        forward: F,
    ) -> AccelResult<()>
    where
        F: FnOnce(&dyn AccelEngine, EngineTask<'_>, &mut NativeChannel) -> AccelResult<()>,
    {
        self.check_supported(op)?;
        if let Err(error) = check_len("task scratch region", task.ctx_size(), self.task_size()) {
            return Err(self.reject(op, error));
        }

        let (offload_ctx, completion) = task.arm(Box::new(cb))?;
        let engine_task = EngineTask {
            offload_ctx,
            completion,
        };
        let (engine, ch) = self.parts_mut();
        let result = forward(engine, engine_task, ch);

        if let Err(error) = result {
            task.disarm();
            return Err(self.reject(op, error));
        }
        Ok(())
    }

    /// Copy `nbytes` from `src` to `dst`.
    pub fn submit_copy(
        &mut self,
        task: &mut AccelTask,
        dst: &mut [u8],
        src: &[u8],
        nbytes: usize,
        cb: impl FnOnce(i32) + Send + 'static,
    ) -> AccelResult<()> {
        check_len("dst", dst.len(), nbytes)?;
        check_len("src", src.len(), nbytes)?;

        self.submit(Opcode::Copy, task, cb, |engine, t, ch| {
            engine.copy(t, ch, &mut dst[..nbytes], &src[..nbytes])
        })
    }

    /// Copy `nbytes` from `src` to both `dst1` and `dst2`. Both destinations
    /// must be 4 KiB aligned.
    pub fn submit_dualcast(
        &mut self,
        task: &mut AccelTask,
        dst1: &mut [u8],
        dst2: &mut [u8],
        src: &[u8],
        nbytes: usize,
        cb: impl FnOnce(i32) + Send + 'static,
    ) -> AccelResult<()> {
        if !is_aligned(dst1) || !is_aligned(dst2) {
            DualcastMisaligned {
                channel_id: self.id(),
                dst1_addr: dst1.as_ptr() as usize,
                dst2_addr: dst2.as_ptr() as usize,
            }
            .log();
            return Err(AccelError::InvalidArgument(
                "dualcast requires 4K alignment on dst addresses".to_string(),
            ));
        }
        check_len("dst1", dst1.len(), nbytes)?;
        check_len("dst2", dst2.len(), nbytes)?;
        check_len("src", src.len(), nbytes)?;

        self.submit(Opcode::Dualcast, task, cb, |engine, t, ch| {
            engine.dualcast(t, ch, &mut dst1[..nbytes], &mut dst2[..nbytes], &src[..nbytes])
        })
    }

    /// Compare `nbytes` of `src1` and `src2`. The completion status is the
    /// comparison result: `0` when equal, otherwise signed like a byte-wise
    /// lexicographic comparison of `src1` against `src2`.
    pub fn submit_compare(
        &mut self,
        task: &mut AccelTask,
        src1: &[u8],
        src2: &[u8],
        nbytes: usize,
        cb: impl FnOnce(i32) + Send + 'static,
    ) -> AccelResult<()> {
        check_len("src1", src1.len(), nbytes)?;
        check_len("src2", src2.len(), nbytes)?;

        self.submit(Opcode::Compare, task, cb, |engine, t, ch| {
            engine.compare(t, ch, &src1[..nbytes], &src2[..nbytes])
        })
    }

    /// Set `nbytes` of `dst` to `fill`.
    pub fn submit_fill(
        &mut self,
        task: &mut AccelTask,
        dst: &mut [u8],
        fill: u8,
        nbytes: usize,
        cb: impl FnOnce(i32) + Send + 'static,
    ) -> AccelResult<()> {
        check_len("dst", dst.len(), nbytes)?;

        self.submit(Opcode::Fill, task, cb, |engine, t, ch| {
            engine.fill(t, ch, &mut dst[..nbytes], fill)
        })
    }

    /// CRC-32C of `nbytes` of `src`, written to `dst`. The seed is inverted
    /// before the update pass and the result is not inverted afterwards.
    pub fn submit_crc32c(
        &mut self,
        task: &mut AccelTask,
        dst: &mut u32,
        src: &[u8],
        seed: u32,
        nbytes: usize,
        cb: impl FnOnce(i32) + Send + 'static,
    ) -> AccelResult<()> {
        check_len("src", src.len(), nbytes)?;

        self.submit(Opcode::Crc32c, task, cb, |engine, t, ch| {
            engine.crc32c(t, ch, dst, &src[..nbytes], seed)
        })
    }

    /// Maximum number of operations one batch may hold; `0` if the bound
    /// engine cannot batch.
    pub fn batch_get_max(&self) -> u32 {
        if self.get_capabilities().supports(Opcode::BatchCreate) {
            self.engine().batch_get_max()
        } else {
            0
        }
    }

    pub fn batch_create<'a>(&mut self) -> AccelResult<AccelBatch<'a>> {
        self.check_supported(Opcode::BatchCreate)?;
        let id = self.id();
        let (engine, ch) = self.parts_mut();
        match engine.batch_create(ch) {
            Ok(state) => Ok(AccelBatch::new(id, state)),
            Err(error) => Err(self.reject(Opcode::BatchCreate, error)),
        }
    }

    /// Queue a copy into `batch`. Its callback fires after the batch has been
    /// submitted and this element completes.
    pub fn batch_prep_copy<'a>(
        &mut self,
        task: &mut AccelTask,
        batch: &mut AccelBatch<'a>,
        dst: &'a mut [u8],
        src: &'a [u8],
        nbytes: usize,
        cb: impl FnOnce(i32) + Send + 'static,
    ) -> AccelResult<()> {
        if batch.channel_id() != self.id() {
            return Err(self.reject(Opcode::BatchPrepCopy, AccelError::ForeignBatch));
        }
        self.check_supported(Opcode::BatchPrepCopy)?;
        let max = self.engine().batch_get_max();
        if batch.len() >= max as usize {
            return Err(self.reject(Opcode::BatchPrepCopy, AccelError::BatchFull { max }));
        }
        check_len("dst", dst.len(), nbytes)?;
        check_len("src", src.len(), nbytes)?;
        let (dst, _) = dst.split_at_mut(nbytes);
        let (src, _) = src.split_at(nbytes);

        self.submit(Opcode::BatchPrepCopy, task, cb, move |engine, t, ch| {
            engine.batch_prep_copy(t, ch, batch, dst, src)
        })
    }

    /// Execute every element queued in `batch`. The batch is consumed either
    /// way; `task`'s callback fires once all elements have completed.
    pub fn batch_submit(
        &mut self,
        task: &mut AccelTask,
        batch: AccelBatch<'_>,
        cb: impl FnOnce(i32) + Send + 'static,
    ) -> AccelResult<()> {
        if batch.channel_id() != self.id() {
            return Err(self.reject(Opcode::BatchSubmit, AccelError::ForeignBatch));
        }

        self.submit(Opcode::BatchSubmit, task, cb, move |engine, t, ch| {
            engine.batch_submit(t, ch, batch)
        })
    }
}
