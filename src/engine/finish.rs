// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ordered, possibly asynchronous module finalization.
//!
//! The sequencer is a small state machine driven by messages:
//!
//! ```text
//! Idle --Start--> Finalizing(0) --ModuleFinished(0)--> Finalizing(1) ... --> Done
//! ```
//!
//! Modules are finalized strictly one at a time in registration order. A module
//! with a fini routine is handed a [`FiniHandle`] and the sequencer waits until
//! that handle reports `module_finished`; a module without one is passed over
//! immediately. Messages posted while the sequencer is already draining its
//! queue (for example a fini routine that finishes inline) are queued rather
//! than handled recursively, so the stack stays flat however many modules are
//! registered.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::engine::registry::ModuleRegistry;
use crate::engine::slots::EngineSlots;
use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::module::{
    FinishCompleted, FinishStarted, ModuleFinalizing, StaleFinishSignal,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ModuleFini;

/// Caller callback run once every module has finished.
pub type FinishCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishState {
    Idle,
    Finalizing(usize),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequencerMsg {
    Start,
    ModuleFinished(usize),
}

enum Action {
    RunFini(usize, ModuleFini),
    Complete(FinishCallback),
}

struct SequencerInner {
    state: FinishState,
    queue: VecDeque<SequencerMsg>,
    draining: bool,
    on_done: Option<FinishCallback>,
}

pub struct FinishSequencer {
    modules: ModuleRegistry,
    engines: Arc<EngineSlots>,
    inner: Mutex<SequencerInner>,
}

impl FinishSequencer {
    pub fn new(modules: ModuleRegistry, engines: Arc<EngineSlots>) -> Arc<Self> {
        Arc::new(Self {
            modules,
            engines,
            inner: Mutex::new(SequencerInner {
                state: FinishState::Idle,
                queue: VecDeque::new(),
                draining: false,
                on_done: None,
            }),
        })
    }

    pub fn state(&self) -> FinishState {
        self.lock().state
    }

    /// Record `on_done` and start finalizing from the first module.
    pub fn start(self: &Arc<Self>, on_done: FinishCallback) -> AccelResult<()> {
        {
            let mut inner = self.lock();
            match inner.state {
                FinishState::Idle if inner.on_done.is_none() => {}
                FinishState::Done => return Err(AccelError::AlreadyFinished),
                _ => return Err(AccelError::FinishInProgress),
            }
            inner.on_done = Some(on_done);
        }
        let started = FinishStarted {
            module_count: self.modules.len(),
        };
        let span = started.span("accel_finish");
        let _guard = span.enter();
        started.log();

        self.post(SequencerMsg::Start);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, SequencerInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn post(self: &Arc<Self>, msg: SequencerMsg) {
        {
            let mut inner = self.lock();
            inner.queue.push_back(msg);
            if inner.draining {
                return;
            }
            inner.draining = true;
        }

        loop {
            let action = {
                let mut inner = self.lock();
                match inner.queue.pop_front() {
                    Some(msg) => self.handle(&mut inner, msg),
                    None => {
                        inner.draining = false;
                        return;
                    }
                }
            };

            // Module and caller code runs without the lock held so it can post.
            match action {
                Some(Action::RunFini(index, fini)) => fini(FiniHandle {
                    index,
                    sequencer: Arc::clone(self),
                }),
                Some(Action::Complete(cb)) => cb(),
                None => {}
            }
        }
    }

    fn handle(&self, inner: &mut SequencerInner, msg: SequencerMsg) -> Option<Action> {
        let next = match (inner.state, msg) {
            (FinishState::Idle, SequencerMsg::Start) => 0,
            (FinishState::Finalizing(current), SequencerMsg::ModuleFinished(index))
                if current == index =>
            {
                index + 1
            }
            (state, SequencerMsg::ModuleFinished(index)) => {
                StaleFinishSignal {
                    signaled: index,
                    current: match state {
                        FinishState::Finalizing(current) => Some(current),
                        _ => None,
                    },
                }
                .log();
                return None;
            }
            (_, SequencerMsg::Start) => return None,
        };
        self.enter(inner, next)
    }

    fn enter(&self, inner: &mut SequencerInner, index: usize) -> Option<Action> {
        let module = match self.modules.get(index) {
            Some(module) => module,
            None => {
                inner.state = FinishState::Done;
                FinishCompleted {
                    module_count: self.modules.len(),
                }
                .log();
                return inner.on_done.take().map(Action::Complete);
            }
        };

        inner.state = FinishState::Finalizing(index);
        let fini = module.module_fini();
        ModuleFinalizing {
            module: module.name(),
            index,
            has_fini: fini.is_some(),
        }
        .log();

        match fini {
            Some(fini) => Some(Action::RunFini(index, fini)),
            None => {
                inner.queue.push_back(SequencerMsg::ModuleFinished(index));
                None
            }
        }
    }
}

impl fmt::Debug for FinishSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinishSequencer")
            .field("modules", &self.modules)
            .field("state", &self.state())
            .finish()
    }
}

/// Handed to a module's fini routine; reports that module's teardown done.
pub struct FiniHandle {
    index: usize,
    sequencer: Arc<FinishSequencer>,
}

impl FiniHandle {
    /// Registration position of the module being finalized.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Engine slots, so the module can unregister the engine it provided.
    pub fn engines(&self) -> &EngineSlots {
        &self.sequencer.engines
    }

    /// Advance the sequencer past this module.
    pub fn module_finished(self) {
        self.sequencer.post(SequencerMsg::ModuleFinished(self.index));
    }
}

impl fmt::Debug for FiniHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiniHandle").field("index", &self.index).finish()
    }
}
