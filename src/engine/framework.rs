// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Framework bring-up and teardown.
//!
//! [`AccelFrameworkBuilder`] collects modules (the software module is always
//! first), then [`AccelFrameworkBuilder::initialize`] runs every module's init
//! and returns a running [`AccelFramework`]. Registration after bring-up is not
//! expressible: the builder is consumed.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::backends::software::SoftwareModule;
use crate::config::AccelConfig;
use crate::engine::channel::{AccelChannel, ChannelManager};
use crate::engine::finish::{FinishSequencer, FinishState};
use crate::engine::registry::ModuleRegistry;
use crate::engine::slots::EngineSlots;
use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::engine::FrameworkInitialized;
use crate::observability::messages::StructuredLog;
use crate::traits::AccelModule;

pub struct AccelFrameworkBuilder {
    modules: ModuleRegistry,
}

impl Default for AccelFrameworkBuilder {
    fn default() -> Self {
        let mut modules = ModuleRegistry::new();
        modules.register(Arc::new(SoftwareModule::new()));
        Self { modules }
    }
}

impl AccelFrameworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module. Modules initialize and finalize in this order.
    pub fn register(mut self, module: Arc<dyn AccelModule>) -> Self {
        self.modules.register(module);
        self
    }

    pub fn task_size(&self) -> usize {
        self.modules.task_size()
    }

    /// Initialize every module in registration order. The first failing init
    /// aborts bring-up and its error is returned.
    pub fn initialize(self, config: &AccelConfig) -> AccelResult<AccelFramework> {
        let engines = Arc::new(EngineSlots::new());
        self.modules.initialize_all(&engines)?;

        let hw = engines.hw();
        FrameworkInitialized {
            module_count: self.modules.len(),
            task_size: self.modules.task_size(),
            hardware_engine: hw.as_ref().map(|e| e.name()),
        }
        .log();

        Ok(AccelFramework {
            channels: ChannelManager::new(
                Arc::clone(&engines),
                config.prefer_hardware,
                self.modules.task_size(),
            ),
            sequencer: FinishSequencer::new(self.modules.clone(), Arc::clone(&engines)),
            modules: self.modules,
            engines,
            accepting_channels: AtomicBool::new(true),
        })
    }
}

/// A running accel framework.
pub struct AccelFramework {
    modules: ModuleRegistry,
    engines: Arc<EngineSlots>,
    channels: ChannelManager,
    sequencer: Arc<FinishSequencer>,
    accepting_channels: AtomicBool,
}

impl AccelFramework {
    pub fn builder() -> AccelFrameworkBuilder {
        AccelFrameworkBuilder::new()
    }

    /// Bytes to allocate for every task's scratch region; see
    /// [`AccelTask::new`](crate::engine::AccelTask::new).
    pub fn task_size(&self) -> usize {
        self.modules.task_size()
    }

    pub fn engines(&self) -> &EngineSlots {
        &self.engines
    }

    pub fn finish_state(&self) -> FinishState {
        self.sequencer.state()
    }

    /// Create a channel for the calling context, bound to the hardware engine
    /// when it can serve one and to the software engine otherwise.
    pub fn get_io_channel(&self) -> AccelResult<AccelChannel> {
        if !self.accepting_channels.load(Ordering::Acquire) {
            return Err(AccelError::ShuttingDown);
        }
        self.channels.create_channel()
    }

    pub fn put_io_channel(&self, channel: AccelChannel) {
        self.channels.destroy_channel(channel);
    }

    /// Stop handing out channels and finalize every module in registration
    /// order. `cb` runs once the last module has finished, possibly before
    /// this call returns.
    pub fn finish(&self, cb: impl FnOnce() + Send + 'static) -> AccelResult<()> {
        self.accepting_channels.store(false, Ordering::Release);
        self.sequencer.start(Box::new(cb))
    }

    pub async fn finish_async(&self) -> AccelResult<()> {
        let (tx, rx) = oneshot::channel();
        self.finish(move || {
            let _ = tx.send(());
        })?;
        rx.await.map_err(|_| AccelError::FinishAborted)
    }

    /// JSON-RPC style configuration for every module that contributes one,
    /// in registration order.
    pub fn write_config_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.modules
                .iter()
                .filter_map(|module| module.write_config_json())
                .collect(),
        )
    }

    /// Legacy text configuration, each module appending its section in
    /// registration order.
    pub fn config_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        for module in self.modules.iter() {
            module.config_text(out)?;
        }
        Ok(())
    }
}

impl fmt::Debug for AccelFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccelFramework")
            .field("modules", &self.modules)
            .field("engines", &self.engines)
            .field("finish_state", &self.sequencer.state())
            .finish()
    }
}
