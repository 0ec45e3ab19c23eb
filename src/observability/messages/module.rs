// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for module init and the finish sequence.

use crate::errors::AccelError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Module added to the registry.
///
/// # Log Level
/// `debug!` - Bring-up detail
pub struct ModuleRegistered<'a> {
    pub module: &'a str,
    pub position: usize,
    pub ctx_size: usize,
}

impl Display for ModuleRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Accel module '{}' registered at position {} (ctx_size={} bytes)",
            self.module, self.position, self.ctx_size
        )
    }
}

impl StructuredLog for ModuleRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            module = self.module,
            position = self.position,
            ctx_size = self.ctx_size,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("module_registered", span_name = name, module = self.module)
    }
}

/// Module init returned successfully.
///
/// # Log Level
/// `debug!` - Bring-up detail
pub struct ModuleInitialized<'a> {
    pub module: &'a str,
}

impl Display for ModuleInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Accel module '{}' initialized", self.module)
    }
}

impl StructuredLog for ModuleInitialized<'_> {
    fn log(&self) {
        tracing::debug!(module = self.module, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("module_initialized", span_name = name, module = self.module)
    }
}

/// Module init failed; bring-up stops here.
///
/// # Log Level
/// `error!` - Fatal to bring-up
pub struct ModuleInitFailed<'a> {
    pub module: &'a str,
    pub error: &'a AccelError,
}

impl Display for ModuleInitFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Accel module '{}' failed to initialize: {}", self.module, self.error)
    }
}

impl StructuredLog for ModuleInitFailed<'_> {
    fn log(&self) {
        tracing::error!(module = self.module, errno = self.error.errno(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("module_init_failed", span_name = name, module = self.module)
    }
}

/// `finish` was called.
///
/// # Log Level
/// `info!` - Important operational event
pub struct FinishStarted {
    pub module_count: usize,
}

impl Display for FinishStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Accel engine finish started: {} modules to finalize", self.module_count)
    }
}

impl StructuredLog for FinishStarted {
    fn log(&self) {
        tracing::info!(module_count = self.module_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("finish", span_name = name, module_count = self.module_count)
    }
}

/// The sequencer moved its cursor onto a module.
///
/// # Log Level
/// `debug!` - Teardown detail
pub struct ModuleFinalizing<'a> {
    pub module: &'a str,
    pub index: usize,
    pub has_fini: bool,
}

impl Display for ModuleFinalizing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.has_fini {
            write!(f, "Finalizing accel module '{}' ({})", self.module, self.index)
        } else {
            write!(
                f,
                "Accel module '{}' ({}) has no fini routine, advancing",
                self.module, self.index
            )
        }
    }
}

impl StructuredLog for ModuleFinalizing<'_> {
    fn log(&self) {
        tracing::debug!(
            module = self.module,
            index = self.index,
            has_fini = self.has_fini,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "module_finalizing",
            span_name = name,
            module = self.module,
            index = self.index,
        )
    }
}

/// A finish signal arrived for a module the cursor is not on.
///
/// # Log Level
/// `warn!` - Duplicate or out-of-order signal, ignored
pub struct StaleFinishSignal {
    pub signaled: usize,
    pub current: Option<usize>,
}

impl Display for StaleFinishSignal {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.current {
            Some(current) => write!(
                f,
                "Ignoring finish signal from module {} while finalizing module {}",
                self.signaled, current
            ),
            None => write!(
                f,
                "Ignoring finish signal from module {}: no finish in progress",
                self.signaled
            ),
        }
    }
}

impl StructuredLog for StaleFinishSignal {
    fn log(&self) {
        tracing::warn!(signaled = self.signaled, current = ?self.current, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("stale_finish_signal", span_name = name, signaled = self.signaled)
    }
}

/// Every module finished; the caller's callback is about to run.
///
/// # Log Level
/// `info!` - Important operational event
pub struct FinishCompleted {
    pub module_count: usize,
}

impl Display for FinishCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Accel engine finish completed: {} modules finalized", self.module_count)
    }
}

impl StructuredLog for FinishCompleted {
    fn log(&self) {
        tracing::info!(module_count = self.module_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("finish_completed", span_name = name, module_count = self.module_count)
    }
}
