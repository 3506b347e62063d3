// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Envelope to [`UplinkSlotMessage`] decoding.

use bytes::{Buf, BufMut};
use num_complex::Complex32;

use crate::envelope::RawEnvelope;
use crate::error::{DecodeError, SampleField};
use crate::header::SlotHeader;
use crate::wire::{WireFormat, SAMPLE_SIZE};

/// One decoded uplink slot. Sample buffers are owned copies.
#[derive(Debug, Clone, PartialEq)]
pub struct UplinkSlotMessage {
    header: SlotHeader,
    curr_samples: Vec<Complex32>,
    prev_samples: Vec<Complex32>,
}

impl UplinkSlotMessage {
    /// Assemble a message from sample buffers of at least `header.sf_len`
    /// elements. Extra samples are dropped.
    pub fn new(
        header: SlotHeader,
        mut curr_samples: Vec<Complex32>,
        mut prev_samples: Vec<Complex32>,
    ) -> Result<Self, DecodeError> {
        let sf_len = header.sf_len as usize;
        for (field, samples) in [
            (SampleField::Curr, &mut curr_samples),
            (SampleField::Prev, &mut prev_samples),
        ] {
            if samples.len() < sf_len {
                return Err(DecodeError::BufferTooShort {
                    field,
                    required_bytes: sf_len * SAMPLE_SIZE,
                    actual_bytes: samples.len() * SAMPLE_SIZE,
                });
            }
            samples.truncate(sf_len);
        }
        Ok(Self {
            header,
            curr_samples,
            prev_samples,
        })
    }

    pub fn header(&self) -> &SlotHeader {
        &self.header
    }

    pub fn curr_samples(&self) -> &[Complex32] {
        &self.curr_samples
    }

    pub fn prev_samples(&self) -> &[Complex32] {
        &self.prev_samples
    }
}

/// Decode one envelope. All-or-nothing: no partial message is ever returned.
pub fn decode(
    envelope: &RawEnvelope,
    wire: &WireFormat,
) -> Result<UplinkSlotMessage, DecodeError> {
    let header = SlotHeader::parse(&envelope.header, wire)?;
    let curr_samples = read_samples(&envelope.curr, header.sf_len, SampleField::Curr)?;
    let prev_samples = read_samples(&envelope.prev, header.sf_len, SampleField::Prev)?;
    Ok(UplinkSlotMessage {
        header,
        curr_samples,
        prev_samples,
    })
}

/// Reference encoder: frames a message the way a producer does.
pub fn encode_envelope(
    message: &UplinkSlotMessage,
    wire: &WireFormat,
) -> Result<RawEnvelope, DecodeError> {
    let header = message.header.encode(wire)?;
    Ok(RawEnvelope::new(
        header,
        write_samples(&message.prev_samples),
        write_samples(&message.curr_samples),
    ))
}

fn read_samples(
    bytes: &[u8],
    sf_len: u32,
    field: SampleField,
) -> Result<Vec<Complex32>, DecodeError> {
    let count = sf_len as usize;
    let required_bytes = count
        .checked_mul(SAMPLE_SIZE)
        .ok_or(DecodeError::SampleCountOverflow { sf_len })?;
    if bytes.len() < required_bytes {
        return Err(DecodeError::BufferTooShort {
            field,
            required_bytes,
            actual_bytes: bytes.len(),
        });
    }

    let mut buf = &bytes[..required_bytes];
    let mut samples = Vec::with_capacity(count);
    while buf.has_remaining() {
        let re = buf.get_f32_le();
        let im = buf.get_f32_le();
        samples.push(Complex32::new(re, im));
    }
    Ok(samples)
}

fn write_samples(samples: &[Complex32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * SAMPLE_SIZE);
    for s in samples {
        out.put_f32_le(s.re);
        out.put_f32_le(s.im);
    }
    out
}
