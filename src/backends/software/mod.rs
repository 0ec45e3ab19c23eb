// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod engine;
mod module;

pub use engine::{compare_bytes, SoftwareChannel, SoftwareEngine, SOFTWARE_ENGINE_NAME};
pub use module::SoftwareModule;
