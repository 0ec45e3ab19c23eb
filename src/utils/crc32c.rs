// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Table-driven CRC-32C (Castagnoli).
//!
//! [`crc32c_update`] works on the raw CRC register: it applies no initial or
//! final inversion. A standard CRC-32C of a buffer is therefore
//! `!crc32c_update(data, !0)`, and the accel `crc32c` operation reports
//! `crc32c_update(data, !seed)`.

/// Reflected Castagnoli polynomial.
pub const CRC32C_POLYNOMIAL: u32 = 0x82F6_3B78;

const fn generate_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32C_POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static TABLE: [u32; 256] = generate_table();

/// Fold `data` into the CRC register `crc`.
pub fn crc32c_update(data: &[u8], mut crc: u32) -> u32 {
    for &byte in data {
        crc = TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc
}
