// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The software reference engine.
//!
//! Every operation runs inline on the submitting context and completes before
//! the submission returns. Results from this engine are the reference any
//! hardware engine must match bit for bit.

use crate::engine::task::EngineTask;
use crate::errors::AccelResult;
use crate::traits::{AccelEngine, Capabilities, NativeChannel};
use crate::utils::crc32c_update;

pub const SOFTWARE_ENGINE_NAME: &str = "software";

/// Per-context sub-channel. The software engine keeps no channel state.
#[derive(Debug, Default)]
pub struct SoftwareChannel;

#[derive(Debug, Default)]
pub struct SoftwareEngine;

impl SoftwareEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Three-way byte comparison returning the difference of the first
/// mismatching bytes, or `0` when the ranges are identical.
pub fn compare_bytes(src1: &[u8], src2: &[u8]) -> i32 {
    src1.iter()
        .zip(src2)
        .find(|(a, b)| a != b)
        .map(|(a, b)| *a as i32 - *b as i32)
        .unwrap_or(0)
}

impl AccelEngine for SoftwareEngine {
    fn name(&self) -> &'static str {
        SOFTWARE_ENGINE_NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::COPY
            | Capabilities::FILL
            | Capabilities::CRC32C
            | Capabilities::COMPARE
            | Capabilities::DUALCAST
    }

    fn get_io_channel(&self) -> Option<NativeChannel> {
        Some(Box::new(SoftwareChannel))
    }

    fn copy(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        dst: &mut [u8],
        src: &[u8],
    ) -> AccelResult<()> {
        dst.copy_from_slice(src);
        task.complete(0);
        Ok(())
    }

    fn dualcast(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        dst1: &mut [u8],
        dst2: &mut [u8],
        src: &[u8],
    ) -> AccelResult<()> {
        dst1.copy_from_slice(src);
        dst2.copy_from_slice(src);
        task.complete(0);
        Ok(())
    }

    fn compare(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        src1: &[u8],
        src2: &[u8],
    ) -> AccelResult<()> {
        let result = compare_bytes(src1, src2);
        task.complete(result);
        Ok(())
    }

    fn fill(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        dst: &mut [u8],
        fill: u8,
    ) -> AccelResult<()> {
        dst.fill(fill);
        task.complete(0);
        Ok(())
    }

    fn crc32c(
        &self,
        task: EngineTask<'_>,
        _ch: &mut NativeChannel,
        dst: &mut u32,
        src: &[u8],
        seed: u32,
    ) -> AccelResult<()> {
        *dst = crc32c_update(src, !seed);
        task.complete(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_bytes_table_driven() {
        struct TestCase {
            name: &'static str,
            a: &'static [u8],
            b: &'static [u8],
            expected: i32,
        }

        let test_cases = vec![
            TestCase {
                name: "identical",
                a: b"abcdef",
                b: b"abcdef",
                expected: 0,
            },
            TestCase {
                name: "empty",
                a: b"",
                b: b"",
                expected: 0,
            },
            TestCase {
                name: "first greater",
                a: b"abd",
                b: b"abc",
                expected: 1,
            },
            TestCase {
                name: "first smaller",
                a: b"abc",
                b: b"abz",
                expected: b'c' as i32 - b'z' as i32,
            },
            TestCase {
                name: "unsigned bytes",
                a: &[0xFF],
                b: &[0x01],
                expected: 0xFE,
            },
        ];

        for case in test_cases {
            assert_eq!(compare_bytes(case.a, case.b), case.expected, "case: {}", case.name);
        }
    }

    #[test]
    fn test_compare_sign_matches_lexicographic_order() {
        let samples: [&[u8]; 5] = [b"aaaa", b"aaab", b"abaa", b"zzzz", b"\x00\x00\x00\x01"];
        for a in samples {
            for b in samples {
                let expected = a.cmp(b) as i32;
                assert_eq!(compare_bytes(a, b).signum(), expected);
            }
        }
    }

    #[test]
    fn test_software_capabilities_exclude_batch() {
        let caps = SoftwareEngine::new().capabilities();
        assert!(caps.contains(Capabilities::COPY));
        assert!(caps.contains(Capabilities::DUALCAST));
        assert!(caps.contains(Capabilities::COMPARE));
        assert!(caps.contains(Capabilities::FILL));
        assert!(caps.contains(Capabilities::CRC32C));
        assert!(!caps.contains(Capabilities::BATCH));
    }

    #[test]
    fn test_channel_factory_never_returns_none() {
        let engine = SoftwareEngine::new();
        for _ in 0..8 {
            assert!(engine.get_io_channel().is_some());
        }
    }
}
