// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::engine::finish::FiniHandle;
use crate::engine::slots::EngineSlots;
use crate::errors::AccelResult;

/// Deferred teardown routine. It must call [`FiniHandle::module_finished`]
/// once its cleanup is done, from any thread and at any later time.
pub type ModuleFini = Box<dyn FnOnce(FiniHandle) + Send + 'static>;

/// A backend's bootstrap/teardown unit.
pub trait AccelModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Bring the module up. A module that provides an engine registers it in
    /// `engines` here.
    fn module_init(&self, engines: &EngineSlots) -> AccelResult<()>;

    /// Teardown routine, if the module has one. Modules without one are
    /// skipped by the finish sequencer without waiting.
    fn module_fini(&self) -> Option<ModuleFini> {
        None
    }

    /// Largest per-task scratch region, in bytes, this module's operations need.
    fn ctx_size(&self) -> usize {
        0
    }

    fn config_text(&self, _out: &mut dyn fmt::Write) -> fmt::Result {
        Ok(())
    }

    /// Zero or one object for the framework's config array.
    fn write_config_json(&self) -> Option<serde_json::Value> {
        None
    }
}
