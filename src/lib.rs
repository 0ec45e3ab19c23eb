// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // software engine + test stubs
pub mod config;     // framework options
pub mod engine;     // registry, channels, dispatch, finish
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // engine + module plugin seams
pub mod utils;      // crc32c

pub use engine::{AccelChannel, AccelFramework, AccelFrameworkBuilder, AccelTask};
pub use errors::{AccelError, AccelResult};
pub use traits::{AccelEngine, AccelModule, Capabilities};
