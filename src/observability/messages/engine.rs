// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for engine slot registration and framework bring-up.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A hardware engine took the hardware slot.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use accel_engine::observability::messages::engine::HardwareEngineRegistered;
///
/// let msg = HardwareEngineRegistered { engine: "ioat" };
/// tracing::info!("{}", msg);
/// ```
pub struct HardwareEngineRegistered<'a> {
    pub engine: &'a str,
}

impl Display for HardwareEngineRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Hardware offload engine '{}' registered", self.engine)
    }
}

impl StructuredLog for HardwareEngineRegistered<'_> {
    fn log(&self) {
        tracing::info!(engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("hw_engine_registered", span_name = name, engine = self.engine)
    }
}

/// A second hardware engine tried to register and was ignored.
///
/// # Log Level
/// `info!` - Notice; the first engine stays bound
pub struct HardwareEngineAlreadyEnabled<'a> {
    pub existing: &'a str,
    pub rejected: &'a str,
}

impl Display for HardwareEngineAlreadyEnabled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Hardware offload engine already enabled ('{}'), ignoring '{}'",
            self.existing, self.rejected
        )
    }
}

impl StructuredLog for HardwareEngineAlreadyEnabled<'_> {
    fn log(&self) {
        tracing::info!(existing = self.existing, rejected = self.rejected, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "hw_engine_already_enabled",
            span_name = name,
            existing = self.existing,
            rejected = self.rejected,
        )
    }
}

/// An engine left its slot during teardown.
///
/// # Log Level
/// `debug!` - Teardown detail
pub struct EngineUnregistered<'a> {
    pub engine: &'a str,
    pub slot: &'a str,
}

impl Display for EngineUnregistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} engine '{}' unregistered", self.slot, self.engine)
    }
}

impl StructuredLog for EngineUnregistered<'_> {
    fn log(&self) {
        tracing::debug!(engine = self.engine, slot = self.slot, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "engine_unregistered",
            span_name = name,
            engine = self.engine,
            slot = self.slot,
        )
    }
}

/// The software engine took the software slot.
///
/// # Log Level
/// `debug!` - Always happens during bring-up
pub struct SoftwareEngineRegistered<'a> {
    pub engine: &'a str,
}

impl Display for SoftwareEngineRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Software engine '{}' registered", self.engine)
    }
}

impl StructuredLog for SoftwareEngineRegistered<'_> {
    fn log(&self) {
        tracing::debug!(engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("sw_engine_registered", span_name = name, engine = self.engine)
    }
}

/// Bring-up finished and the framework channel identity is registered.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use accel_engine::observability::messages::engine::FrameworkInitialized;
///
/// let msg = FrameworkInitialized {
///     module_count: 2,
///     task_size: 96,
///     hardware_engine: Some("ioat"),
/// };
/// assert!(msg.to_string().contains("hardware engine 'ioat'"));
/// ```
pub struct FrameworkInitialized<'a> {
    pub module_count: usize,
    pub task_size: usize,
    pub hardware_engine: Option<&'a str>,
}

impl Display for FrameworkInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.hardware_engine {
            Some(engine) => write!(
                f,
                "Accel engine initialized with hardware engine '{}': {} modules, task_size={} bytes",
                engine, self.module_count, self.task_size
            ),
            None => write!(
                f,
                "Accel engine initialized to use software engine: {} modules, task_size={} bytes",
                self.module_count, self.task_size
            ),
        }
    }
}

impl StructuredLog for FrameworkInitialized<'_> {
    fn log(&self) {
        tracing::info!(
            module_count = self.module_count,
            task_size = self.task_size,
            hardware_engine = self.hardware_engine.unwrap_or("none"),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "framework_initialized",
            span_name = name,
            module_count = self.module_count,
            task_size = self.task_size,
        )
    }
}
