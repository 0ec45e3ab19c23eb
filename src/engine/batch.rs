// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::fmt;

use crate::engine::task::Completion;
use crate::errors::ECANCELED;

/// Engine-private batch state returned by `AccelEngine::batch_create`.
pub type EngineBatchState = Box<dyn Any + Send>;

/// One queued, not-yet-executed batch element.
pub enum BatchOp<'a> {
    Copy {
        dst: &'a mut [u8],
        src: &'a [u8],
        completion: Completion,
    },
}

impl fmt::Debug for BatchOp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOp::Copy { src, .. } => f
                .debug_struct("Copy")
                .field("nbytes", &src.len())
                .finish_non_exhaustive(),
        }
    }
}

/// Opaque group of operations queued on one channel.
///
/// Created by `AccelChannel::batch_create`, filled with `batch_prep_*` and
/// consumed by `batch_submit`. The buffers of every queued element stay
/// borrowed until the batch is submitted or dropped. Elements still queued
/// when a batch is dropped complete with `-ECANCELED`.
pub struct AccelBatch<'a> {
    channel_id: u64,
    state: EngineBatchState,
    ops: Vec<BatchOp<'a>>,
}

impl<'a> AccelBatch<'a> {
    pub(crate) fn new(channel_id: u64, state: EngineBatchState) -> Self {
        Self {
            channel_id,
            state,
            ops: Vec::new(),
        }
    }

    pub(crate) fn channel_id(&self) -> u64 {
        self.channel_id
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Engine-private state, if it is of type `T`.
    pub fn state_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.state.downcast_mut::<T>()
    }

    /// Queue an element. Called by engines from `batch_prep_*`.
    pub fn push(&mut self, op: BatchOp<'a>) {
        self.ops.push(op);
    }

    /// Split the batch into engine state and queued elements for execution.
    pub fn into_parts(mut self) -> (EngineBatchState, Vec<BatchOp<'a>>) {
        let state = std::mem::replace(&mut self.state, Box::new(()));
        (state, std::mem::take(&mut self.ops))
    }
}

impl Drop for AccelBatch<'_> {
    fn drop(&mut self) {
        for op in self.ops.drain(..) {
            match op {
                BatchOp::Copy { completion, .. } => completion.complete(-ECANCELED),
            }
        }
    }
}

impl fmt::Debug for AccelBatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccelBatch")
            .field("channel_id", &self.channel_id)
            .field("ops", &self.ops)
            .finish()
    }
}
