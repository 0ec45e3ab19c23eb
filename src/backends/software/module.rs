// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::engine::SoftwareEngine;
use crate::engine::finish::FiniHandle;
use crate::engine::slots::EngineSlots;
use crate::engine::task::AccelTask;
use crate::errors::AccelResult;
use crate::traits::{AccelModule, ModuleFini};

/// Built-in module that provides the software engine.
#[derive(Debug, Default)]
pub struct SoftwareModule {
    engine: Arc<SoftwareEngine>,
}

impl SoftwareModule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccelModule for SoftwareModule {
    fn name(&self) -> &'static str {
        "sw_accel_engine"
    }

    fn module_init(&self, engines: &EngineSlots) -> AccelResult<()> {
        engines.register_sw(self.engine.clone())
    }

    fn module_fini(&self) -> Option<ModuleFini> {
        Some(Box::new(|done: FiniHandle| {
            done.engines().unregister_sw();
            done.module_finished();
        }))
    }

    fn ctx_size(&self) -> usize {
        std::mem::size_of::<AccelTask>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_registers_software_engine() {
        let slots = EngineSlots::new();
        SoftwareModule::new().module_init(&slots).unwrap();
        assert_eq!(slots.sw().map(|e| e.name()), Some("software"));
    }

    #[test]
    fn test_second_init_fails() {
        let slots = EngineSlots::new();
        SoftwareModule::new().module_init(&slots).unwrap();
        assert!(SoftwareModule::new().module_init(&slots).is_err());
    }

    #[test]
    fn test_ctx_size_is_task_size() {
        assert_eq!(
            SoftwareModule::new().ctx_size(),
            std::mem::size_of::<AccelTask>()
        );
        assert!(SoftwareModule::new().module_fini().is_some());
    }
}
