// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod accel;
mod config;

pub use accel::{AccelError, AccelResult, Opcode};
pub use accel::{EALREADY, EBUSY, ECANCELED, EINVAL, ENODEV, ENOSPC, ENOTSUP, ESHUTDOWN};
pub use config::ConfigError;
