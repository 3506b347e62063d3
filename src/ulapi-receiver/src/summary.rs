// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::fmt;

use ulapi_core::SlotHeader;

/// Human-readable multi-line description of one decoded slot.
pub struct SlotSummary<'a> {
    header: &'a SlotHeader,
    sample_rate_hz: f64,
}

impl<'a> SlotSummary<'a> {
    pub fn new(header: &'a SlotHeader, sample_rate_hz: f64) -> Self {
        Self {
            header,
            sample_rate_hz,
        }
    }
}

impl fmt::Display for SlotSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.header;
        writeln!(
            f,
            "Received uplink message for RNTI: {} {}",
            h.rnti, h.rnti_type
        )?;
        writeln!(f, "  Slot index: {}", h.slot_idx)?;
        writeln!(f, "  Task index: {}", h.task_idx)?;
        writeln!(f, "  SF length: {}", h.sf_len)?;
        writeln!(f, "  Offset: {}", h.offset)?;
        writeln!(f, "  SNR (dB): {}", h.snr_db)?;
        writeln!(f, "  Time (secs): {} + {}", h.full_secs, h.frac_secs)?;
        writeln!(
            f,
            "  Time diff (secs): {}  Samples: {}",
            h.time_diff,
            h.time_diff_samples(self.sample_rate_hz)
        )?;
        writeln!(f, "  No. of PRBs: {}", h.nof_prb)?;
        writeln!(f, "  Start symbol: {}", h.start_symbol)?;
        writeln!(f, "  No. of symbols: {}", h.nof_symbol)?;
        write!(f, "  UL PRB used: {}", h.prb_usage_string())
    }
}
