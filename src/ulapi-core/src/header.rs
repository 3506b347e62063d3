// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Fixed-layout slot header (frame 1 of the envelope).

use bytes::{Buf, BufMut};

use crate::error::DecodeError;
use crate::wire::WireFormat;

/// Decoded slot header.
///
/// `prb_map` always holds `WireFormat::max_prb` bytes; only the first
/// `nof_prb` of them are live. Use [`SlotHeader::prb_usage`] rather than
/// reading the map directly.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotHeader {
    pub message_type: u32,
    pub rnti: u16,
    pub rnti_type: u16,
    pub slot_idx: u32,
    pub task_idx: u32,
    /// Number of complex samples in each IQ frame.
    pub sf_len: u32,
    pub offset: u32,
    pub snr_db: f32,
    pub full_secs: i64,
    pub frac_secs: f64,
    /// Seconds since the reference event.
    pub time_diff: f64,
    pub nof_prb: u32,
    pub start_symbol: u32,
    pub nof_symbol: u32,
    pub prb_map: Vec<u8>,
}

impl SlotHeader {
    /// Parse the first `wire.header_size()` bytes of `bytes`.
    ///
    /// Trailing bytes are ignored. Fails when the buffer is short or when
    /// `nof_prb` claims more entries than the map can hold.
    pub fn parse(bytes: &[u8], wire: &WireFormat) -> Result<Self, DecodeError> {
        let required = wire.header_size();
        if bytes.len() < required {
            return Err(DecodeError::HeaderTooShort {
                required,
                actual: bytes.len(),
            });
        }

        let mut buf = &bytes[..required];
        let header = Self {
            message_type: buf.get_u32_le(),
            rnti: buf.get_u16_le(),
            rnti_type: buf.get_u16_le(),
            slot_idx: buf.get_u32_le(),
            task_idx: buf.get_u32_le(),
            sf_len: buf.get_u32_le(),
            offset: buf.get_u32_le(),
            snr_db: buf.get_f32_le(),
            full_secs: buf.get_i64_le(),
            frac_secs: buf.get_f64_le(),
            time_diff: buf.get_f64_le(),
            nof_prb: buf.get_u32_le(),
            start_symbol: buf.get_u32_le(),
            nof_symbol: buf.get_u32_le(),
            prb_map: buf.to_vec(),
        };

        if header.nof_prb as usize > wire.max_prb {
            return Err(DecodeError::PrbCountOutOfRange {
                nof_prb: header.nof_prb,
                capacity: wire.max_prb,
            });
        }
        Ok(header)
    }

    /// Serialize into exactly `wire.header_size()` bytes.
    ///
    /// `prb_map` must hold exactly `wire.max_prb` bytes, so that parsing the
    /// output yields `self` again.
    pub fn encode(&self, wire: &WireFormat) -> Result<Vec<u8>, DecodeError> {
        if self.prb_map.len() != wire.max_prb {
            return Err(DecodeError::PrbMapSizeMismatch {
                len: self.prb_map.len(),
                capacity: wire.max_prb,
            });
        }
        if self.nof_prb as usize > wire.max_prb {
            return Err(DecodeError::PrbCountOutOfRange {
                nof_prb: self.nof_prb,
                capacity: wire.max_prb,
            });
        }

        let mut out = Vec::with_capacity(wire.header_size());
        out.put_u32_le(self.message_type);
        out.put_u16_le(self.rnti);
        out.put_u16_le(self.rnti_type);
        out.put_u32_le(self.slot_idx);
        out.put_u32_le(self.task_idx);
        out.put_u32_le(self.sf_len);
        out.put_u32_le(self.offset);
        out.put_f32_le(self.snr_db);
        out.put_i64_le(self.full_secs);
        out.put_f64_le(self.frac_secs);
        out.put_f64_le(self.time_diff);
        out.put_u32_le(self.nof_prb);
        out.put_u32_le(self.start_symbol);
        out.put_u32_le(self.nof_symbol);
        out.put_slice(&self.prb_map);
        Ok(out)
    }

    /// The live part of the PRB map.
    pub fn prb_usage(&self) -> &[u8] {
        let live = (self.nof_prb as usize).min(self.prb_map.len());
        &self.prb_map[..live]
    }

    /// PRB usage flags rendered as concatenated decimal values, e.g. `"101"`.
    pub fn prb_usage_string(&self) -> String {
        self.prb_usage().iter().map(|b| b.to_string()).collect()
    }

    pub fn timestamp_secs(&self) -> f64 {
        self.full_secs as f64 + self.frac_secs
    }

    /// `time_diff` expressed in samples at `sample_rate_hz`.
    pub fn time_diff_samples(&self, sample_rate_hz: f64) -> f64 {
        self.time_diff * sample_rate_hz
    }
}
