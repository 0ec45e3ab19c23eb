// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Caller-owned task descriptors and the completion trampoline.
//!
//! An [`AccelTask`] carries the scratch region an engine may use while one
//! operation is in flight, plus the caller's completion callback. Engines never
//! see the callback: they receive a [`Completion`] handle that points back at
//! the task's callback slot and invoke it exactly once with the final status.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::errors::{AccelError, AccelResult};

/// Caller completion callback. The status is `0` on success, a negative
/// engine code on runtime failure, or the comparison result for `compare`.
pub type AccelCompletionCb = Box<dyn FnOnce(i32) + Send + 'static>;

#[derive(Default)]
struct CallbackSlot {
    cb: Mutex<Option<AccelCompletionCb>>,
}

impl CallbackSlot {
    fn take(&self) -> Option<AccelCompletionCb> {
        match self.cb.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

/// One in-flight operation's request descriptor.
///
/// Allocate with [`AccelTask::new`] using the framework's `task_size()` so the
/// scratch region fits whichever engine ends up running the operation.
pub struct AccelTask {
    offload_ctx: Vec<u8>,
    slot: Arc<CallbackSlot>,
}

impl AccelTask {
    pub fn new(task_size: usize) -> Self {
        Self {
            offload_ctx: vec![0; task_size],
            slot: Arc::new(CallbackSlot::default()),
        }
    }

    /// Engine scratch region size in bytes.
    pub fn ctx_size(&self) -> usize {
        self.offload_ctx.len()
    }

    /// True while a submitted operation has not yet reported completion.
    pub fn is_outstanding(&self) -> bool {
        match self.slot.cb.lock() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    /// Store the caller's callback and hand out the trampoline for it.
    pub(crate) fn arm(&mut self, cb: AccelCompletionCb) -> AccelResult<(&mut [u8], Completion)> {
        {
            let mut guard = self.slot.cb.lock().map_err(|_| AccelError::TaskBusy)?;
            if guard.is_some() {
                return Err(AccelError::TaskBusy);
            }
            *guard = Some(cb);
        }
        let completion = Completion {
            slot: Arc::clone(&self.slot),
        };
        Ok((self.offload_ctx.as_mut_slice(), completion))
    }

    /// Drop the stored callback after the engine rejected the submission.
    pub(crate) fn disarm(&self) {
        drop(self.slot.take());
    }
}

impl fmt::Debug for AccelTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccelTask")
            .field("ctx_size", &self.offload_ctx.len())
            .field("outstanding", &self.is_outstanding())
            .finish()
    }
}

/// Framework-owned completion trampoline handed to engines.
///
/// Calling [`Completion::complete`] invokes the task's stored callback with
/// the given status. It may be called inline from the submission or later
/// from the engine's own completion path.
pub struct Completion {
    slot: Arc<CallbackSlot>,
}

impl Completion {
    pub fn complete(self, status: i32) {
        if let Some(cb) = self.slot.take() {
            cb(status);
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

/// What an engine receives for one submission: the task's scratch region and
/// the trampoline to signal once the operation is done.
#[derive(Debug)]
pub struct EngineTask<'t> {
    pub offload_ctx: &'t mut [u8],
    pub completion: Completion,
}

impl<'t> EngineTask<'t> {
    pub fn complete(self, status: i32) {
        self.completion.complete(status);
    }
}
