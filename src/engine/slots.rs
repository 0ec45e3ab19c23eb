// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The hardware and software engine slots.
//!
//! At most one hardware engine is registered at a time; a second attempt is
//! ignored with a notice. Exactly one software engine may be registered; a
//! second registration is an error.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::engine::{
    EngineUnregistered, HardwareEngineAlreadyEnabled, HardwareEngineRegistered,
    SoftwareEngineRegistered,
};
use crate::observability::messages::StructuredLog;
use crate::traits::AccelEngine;

type Slot = RwLock<Option<Arc<dyn AccelEngine>>>;

#[derive(Default)]
pub struct EngineSlots {
    hw: Slot,
    sw: Slot,
}

fn read(slot: &Slot) -> RwLockReadGuard<'_, Option<Arc<dyn AccelEngine>>> {
    slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(slot: &Slot) -> RwLockWriteGuard<'_, Option<Arc<dyn AccelEngine>>> {
    slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EngineSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the hardware engine. Returns `false`, leaving the current
    /// engine in place, if one is already registered.
    pub fn register_hw(&self, engine: Arc<dyn AccelEngine>) -> bool {
        let mut slot = write(&self.hw);
        if let Some(existing) = slot.as_ref() {
            HardwareEngineAlreadyEnabled {
                existing: existing.name(),
                rejected: engine.name(),
            }
            .log();
            return false;
        }
        HardwareEngineRegistered {
            engine: engine.name(),
        }
        .log();
        *slot = Some(engine);
        true
    }

    pub fn register_sw(&self, engine: Arc<dyn AccelEngine>) -> AccelResult<()> {
        let mut slot = write(&self.sw);
        if slot.is_some() {
            return Err(AccelError::SoftwareEngineAlreadyRegistered);
        }
        SoftwareEngineRegistered {
            engine: engine.name(),
        }
        .log();
        *slot = Some(engine);
        Ok(())
    }

    pub fn unregister_hw(&self) -> Option<Arc<dyn AccelEngine>> {
        let engine = write(&self.hw).take();
        if let Some(engine) = engine.as_ref() {
            EngineUnregistered {
                engine: engine.name(),
                slot: "hardware",
            }
            .log();
        }
        engine
    }

    pub fn unregister_sw(&self) -> Option<Arc<dyn AccelEngine>> {
        let engine = write(&self.sw).take();
        if let Some(engine) = engine.as_ref() {
            EngineUnregistered {
                engine: engine.name(),
                slot: "software",
            }
            .log();
        }
        engine
    }

    pub fn hw(&self) -> Option<Arc<dyn AccelEngine>> {
        read(&self.hw).clone()
    }

    pub fn sw(&self) -> Option<Arc<dyn AccelEngine>> {
        read(&self.sw).clone()
    }
}

impl fmt::Debug for EngineSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSlots")
            .field("hw", &self.hw().map(|e| e.name()))
            .field("sw", &self.sw().map(|e| e.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::software::SoftwareEngine;
    use crate::backends::stub::DeferredEngine;

    #[test]
    fn test_second_hardware_engine_is_ignored() {
        let slots = EngineSlots::new();
        let first: Arc<dyn AccelEngine> = Arc::new(DeferredEngine::named("first"));
        let second: Arc<dyn AccelEngine> = Arc::new(DeferredEngine::named("second"));

        assert!(slots.register_hw(first));
        assert!(!slots.register_hw(second));
        assert_eq!(slots.hw().map(|e| e.name()), Some("first"));
    }

    #[test]
    fn test_second_software_engine_is_an_error() {
        let slots = EngineSlots::new();
        slots.register_sw(Arc::new(SoftwareEngine::new())).unwrap();

        let err = slots.register_sw(Arc::new(SoftwareEngine::new())).unwrap_err();
        assert_eq!(err, AccelError::SoftwareEngineAlreadyRegistered);
    }

    #[test]
    fn test_unregister_frees_the_slot() {
        let slots = EngineSlots::new();
        slots.register_sw(Arc::new(SoftwareEngine::new())).unwrap();
        assert!(slots.unregister_sw().is_some());
        assert!(slots.sw().is_none());
        assert!(slots.register_sw(Arc::new(SoftwareEngine::new())).is_ok());

        assert!(slots.unregister_hw().is_none());
        assert!(slots.register_hw(Arc::new(DeferredEngine::named("hw"))));
        assert!(slots.unregister_hw().is_some());
        assert!(slots.hw().is_none());
    }
}
