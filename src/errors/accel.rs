// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by the accel framework, its engines and its modules.
//!
//! Submissions return `Result<(), AccelError>`. `Ok(())` means the engine
//! accepted the operation and the completion callback will fire exactly once;
//! any `Err` means the callback will never fire for that submission.

use std::fmt;
use thiserror::Error;

pub const EINVAL: i32 = 22;
pub const EBUSY: i32 = 16;
pub const ENODEV: i32 = 19;
pub const EALREADY: i32 = 114;
pub const ENOTSUP: i32 = 95;
pub const ENOSPC: i32 = 28;
pub const ESHUTDOWN: i32 = 108;
pub const ECANCELED: i32 = 125;

/// Operation families an engine may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Copy,
    Dualcast,
    Compare,
    Fill,
    Crc32c,
    BatchCreate,
    BatchPrepCopy,
    BatchSubmit,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Opcode::Copy => "copy",
            Opcode::Dualcast => "dualcast",
            Opcode::Compare => "compare",
            Opcode::Fill => "fill",
            Opcode::Crc32c => "crc32c",
            Opcode::BatchCreate => "batch_create",
            Opcode::BatchPrepCopy => "batch_prep_copy",
            Opcode::BatchSubmit => "batch_submit",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccelError {
    /// Operation arguments failed validation before reaching the engine.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The bound engine does not implement this operation.
    #[error("{op} is not supported by the {engine} engine")]
    Unsupported { op: Opcode, engine: &'static str },

    /// The task already carries an operation that has not completed.
    #[error("Task already has an operation in flight")]
    TaskBusy,

    /// The batch already holds the engine's maximum number of operations.
    #[error("Batch is full ({max} operations)")]
    BatchFull { max: u32 },

    /// The batch was created on a different channel.
    #[error("Batch belongs to another channel")]
    ForeignBatch,

    /// The engine refused the submission with an engine specific code.
    #[error("Engine '{engine}' rejected submission with status {code}")]
    Rejected { engine: &'static str, code: i32 },

    /// Channel creation found no software engine to fall back on.
    #[error("No software engine is registered")]
    NoSoftwareEngine,

    /// A second software engine registration was attempted.
    #[error("A software engine is already registered")]
    SoftwareEngineAlreadyRegistered,

    /// The software engine's channel factory returned nothing.
    #[error("Software engine '{engine}' failed to provide a channel")]
    SoftwareChannelUnavailable { engine: &'static str },

    /// A module's init routine failed; bring-up was aborted.
    #[error("Module '{module}' failed to initialize: {reason}")]
    ModuleInit { module: &'static str, reason: String },

    /// The framework's channel identity has been unregistered.
    #[error("Accel framework is shutting down")]
    ShuttingDown,

    /// `finish` was called while a previous finish is still running.
    #[error("Accel framework finish already in progress")]
    FinishInProgress,

    /// `finish` was called after every module had already finished.
    #[error("Accel framework has already finished")]
    AlreadyFinished,

    /// The finish sequence was dropped before it completed.
    #[error("Accel framework finish was aborted before completion")]
    FinishAborted,
}

impl AccelError {
    pub fn unsupported(op: Opcode, engine: &'static str) -> Self {
        AccelError::Unsupported { op, engine }
    }

    /// Negative errno-style status for callers that speak integer codes.
    pub fn errno(&self) -> i32 {
        match self {
            AccelError::InvalidArgument(_) | AccelError::ForeignBatch => -EINVAL,
            AccelError::Unsupported { .. } => -ENOTSUP,
            AccelError::TaskBusy | AccelError::FinishInProgress => -EBUSY,
            AccelError::BatchFull { .. } => -ENOSPC,
            AccelError::Rejected { code, .. } => {
                if *code < 0 {
                    *code
                } else {
                    -code.saturating_abs().max(1)
                }
            }
            AccelError::NoSoftwareEngine | AccelError::SoftwareChannelUnavailable { .. } => {
                -ENODEV
            }
            AccelError::SoftwareEngineAlreadyRegistered | AccelError::AlreadyFinished => {
                -EALREADY
            }
            AccelError::ModuleInit { .. } => -ENODEV,
            AccelError::ShuttingDown => -ESHUTDOWN,
            AccelError::FinishAborted => -ECANCELED,
        }
    }
}

/// Result type alias for accel framework operations.
pub type AccelResult<T> = Result<T, AccelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping_is_negative() {
        let cases = vec![
            AccelError::InvalidArgument("x".to_string()),
            AccelError::unsupported(Opcode::BatchCreate, "software"),
            AccelError::TaskBusy,
            AccelError::BatchFull { max: 4 },
            AccelError::ForeignBatch,
            AccelError::Rejected { engine: "hw", code: -5 },
            AccelError::Rejected { engine: "hw", code: 7 },
            AccelError::NoSoftwareEngine,
            AccelError::SoftwareEngineAlreadyRegistered,
            AccelError::ShuttingDown,
            AccelError::FinishInProgress,
            AccelError::AlreadyFinished,
            AccelError::FinishAborted,
        ];

        for err in cases {
            assert!(err.errno() < 0, "{:?} mapped to {}", err, err.errno());
        }
    }

    #[test]
    fn test_specific_errno_values() {
        assert_eq!(AccelError::InvalidArgument(String::new()).errno(), -EINVAL);
        assert_eq!(
            AccelError::unsupported(Opcode::Fill, "hw").errno(),
            -ENOTSUP
        );
        assert_eq!(AccelError::Rejected { engine: "hw", code: -5 }.errno(), -5);
        assert_eq!(AccelError::Rejected { engine: "hw", code: 7 }.errno(), -7);
        assert_eq!(AccelError::FinishInProgress.errno(), -EBUSY);
        assert_eq!(AccelError::AlreadyFinished.errno(), -EALREADY);
    }

    #[test]
    fn test_unsupported_message_names_operation_and_engine() {
        let msg = AccelError::unsupported(Opcode::BatchSubmit, "software").to_string();
        assert_eq!(msg, "batch_submit is not supported by the software engine");
    }
}
