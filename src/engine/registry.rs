// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::engine::slots::EngineSlots;
use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::module::{
    ModuleInitFailed, ModuleInitialized, ModuleRegistered,
};
use crate::observability::messages::StructuredLog;
use crate::traits::AccelModule;

/// Append-only, ordered list of registered modules.
///
/// Also tracks the largest per-task context size reported by any module. That
/// maximum only grows, and is only meaningful once every module is in.
#[derive(Default, Clone)]
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn AccelModule>>,
    max_ctx_size: usize,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: Arc<dyn AccelModule>) {
        let ctx_size = module.ctx_size();
        ModuleRegistered {
            module: module.name(),
            position: self.modules.len(),
            ctx_size,
        }
        .log();

        self.max_ctx_size = self.max_ctx_size.max(ctx_size);
        self.modules.push(module);
    }

    /// Bytes every caller must allocate for a task's scratch region.
    pub fn task_size(&self) -> usize {
        self.max_ctx_size
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn AccelModule>> {
        self.modules.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn AccelModule>> {
        self.modules.iter()
    }

    /// Run every module's init in registration order, stopping at the first
    /// failure.
    pub fn initialize_all(&self, engines: &EngineSlots) -> AccelResult<()> {
        for module in &self.modules {
            if let Err(error) = module.module_init(engines) {
                ModuleInitFailed {
                    module: module.name(),
                    error: &error,
                }
                .log();
                return Err(match error {
                    AccelError::ModuleInit { .. } => error,
                    other => AccelError::ModuleInit {
                        module: module.name(),
                        reason: other.to_string(),
                    },
                });
            }
            ModuleInitialized {
                module: module.name(),
            }
            .log();
        }
        Ok(())
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("max_ctx_size", &self.max_ctx_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{FailingInitModule, RecordingModule};
    use std::sync::Mutex;

    #[test]
    fn test_task_size_tracks_largest_module() {
        struct TestCase {
            name: &'static str,
            sizes: Vec<usize>,
            expected: usize,
        }

        let test_cases = vec![
            TestCase {
                name: "empty registry",
                sizes: vec![],
                expected: 0,
            },
            TestCase {
                name: "single module",
                sizes: vec![40],
                expected: 40,
            },
            TestCase {
                name: "largest in the middle",
                sizes: vec![16, 256, 64],
                expected: 256,
            },
            TestCase {
                name: "zero sized modules do not shrink",
                sizes: vec![128, 0, 0],
                expected: 128,
            },
        ];

        for case in test_cases {
            let log = Arc::new(Mutex::new(Vec::new()));
            let mut registry = ModuleRegistry::new();
            for (i, size) in case.sizes.iter().enumerate() {
                let name: &'static str = Box::leak(format!("m{}", i).into_boxed_str());
                registry.register(Arc::new(
                    RecordingModule::new(name, Arc::clone(&log)).with_ctx_size(*size),
                ));
            }

            assert_eq!(registry.task_size(), case.expected, "case: {}", case.name);
            assert_eq!(registry.task_size(), registry.task_size(), "case: {}", case.name);
            for size in &case.sizes {
                assert!(registry.task_size() >= *size, "case: {}", case.name);
            }
        }
    }

    #[test]
    fn test_initialize_all_runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(RecordingModule::new("a", Arc::clone(&log))));
        registry.register(Arc::new(RecordingModule::new("b", Arc::clone(&log))));
        registry.register(Arc::new(RecordingModule::new("c", Arc::clone(&log))));

        registry.initialize_all(&EngineSlots::new()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["init:a", "init:b", "init:c"]);
    }

    #[test]
    fn test_initialize_all_stops_at_first_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(RecordingModule::new("a", Arc::clone(&log))));
        registry.register(Arc::new(FailingInitModule::new("broken")));
        registry.register(Arc::new(RecordingModule::new("c", Arc::clone(&log))));

        let err = registry.initialize_all(&EngineSlots::new()).unwrap_err();

        assert!(matches!(err, AccelError::ModuleInit { module: "broken", .. }));
        assert_eq!(*log.lock().unwrap(), vec!["init:a"]);
    }
}
