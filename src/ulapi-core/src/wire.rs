// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Header layout constants.
//!
//! Header wire format (little-endian, packed):
//!
//! | offset | width | field        |
//! |--------|-------|--------------|
//! | 0      | 4     | message_type |
//! | 4      | 2     | rnti         |
//! | 6      | 2     | rnti_type    |
//! | 8      | 4     | slot_idx     |
//! | 12     | 4     | task_idx     |
//! | 16     | 4     | sf_len       |
//! | 20     | 4     | offset       |
//! | 24     | 4     | snr_db (f32) |
//! | 28     | 8     | full_secs    |
//! | 36     | 8     | frac_secs    |
//! | 44     | 8     | time_diff    |
//! | 52     | 4     | nof_prb      |
//! | 56     | 4     | start_symbol |
//! | 60     | 4     | nof_symbol   |
//! | 64     | N_MAX | prb_map      |

/// srsRAN `SRSRAN_MAX_PRB_NR`, the PRB map capacity of stock producer builds.
pub const MAX_PRB_NR: usize = 275;

/// Width of every header field preceding `prb_map`.
pub const FIXED_HEADER_SIZE: usize = 64;

/// One complex sample: two little-endian f32.
pub const SAMPLE_SIZE: usize = 8;

/// Largest PRB map capacity a [`WireFormat`] is configured with.
pub const MAX_PRB_CAPACITY: usize = u16::MAX as usize;

/// Producer build parameters that change the header layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireFormat {
    /// Capacity of the embedded PRB map (N_MAX).
    pub max_prb: usize,
}

impl Default for WireFormat {
    fn default() -> Self {
        Self {
            max_prb: MAX_PRB_NR,
        }
    }
}

impl WireFormat {
    pub fn new(max_prb: usize) -> Self {
        Self { max_prb }
    }

    /// Total header size in bytes, `prb_map` included.
    ///
    /// Saturates, so an absurd capacity makes every header too short instead
    /// of wrapping.
    pub fn header_size(&self) -> usize {
        FIXED_HEADER_SIZE.saturating_add(self.max_prb)
    }
}
