// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::fmt;

use thiserror::Error;

/// Which IQ frame of the envelope an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleField {
    Prev,
    Curr,
}

impl fmt::Display for SampleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleField::Prev => f.write_str("prev"),
            SampleField::Curr => f.write_str("curr"),
        }
    }
}

/// Per-message failure. The message is dropped, the stream continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed envelope: expected {expected} frames, got {actual}")]
    MalformedEnvelope { expected: usize, actual: usize },

    #[error("header too short: need {required} bytes, got {actual}")]
    HeaderTooShort { required: usize, actual: usize },

    #[error("{field} sample buffer too short: need {required_bytes} bytes, got {actual_bytes}")]
    BufferTooShort {
        field: SampleField,
        required_bytes: usize,
        actual_bytes: usize,
    },

    #[error("nof_prb {nof_prb} exceeds prb_map capacity {capacity}")]
    PrbCountOutOfRange { nof_prb: u32, capacity: usize },

    #[error("prb_map holds {len} bytes, wire format expects {capacity}")]
    PrbMapSizeMismatch { len: usize, capacity: usize },

    #[error("sf_len {sf_len} is too large to address")]
    SampleCountOverflow { sf_len: u32 },
}

/// Failure of the transport itself. Only `Interrupted` is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,

    #[error("transport interrupted")]
    Interrupted,

    #[error("transport I/O error: {0}")]
    Io(String),
}

/// Outcome of [`crate::receive_envelope`] other than a message or an idle poll.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
