// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Three-frame envelope and the transport seam it is read from.

use std::collections::VecDeque;

use bytes::Bytes;

use crate::error::{DecodeError, ReceiveError, TransportError};

/// Number of frames in a well-formed envelope.
pub const ENVELOPE_FRAMES: usize = 3;

/// Raw frames of one message: header, previous-slot IQ, current-slot IQ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnvelope {
    pub header: Bytes,
    pub prev: Bytes,
    pub curr: Bytes,
}

impl RawEnvelope {
    pub fn new(header: impl Into<Bytes>, prev: impl Into<Bytes>, curr: impl Into<Bytes>) -> Self {
        Self {
            header: header.into(),
            prev: prev.into(),
            curr: curr.into(),
        }
    }

    /// Build from a received multi-part message. Only the frame count is checked.
    pub fn from_parts(parts: Vec<Vec<u8>>) -> Result<Self, DecodeError> {
        let actual = parts.len();
        let Ok([header, prev, curr]) = <[Vec<u8>; ENVELOPE_FRAMES]>::try_from(parts) else {
            return Err(DecodeError::MalformedEnvelope {
                expected: ENVELOPE_FRAMES,
                actual,
            });
        };
        Ok(Self::new(header, prev, curr))
    }

    /// Frames in wire order.
    pub fn into_parts(self) -> [Bytes; ENVELOPE_FRAMES] {
        [self.header, self.prev, self.curr]
    }
}

/// A subscriber that yields whole multi-part messages.
pub trait Transport {
    /// Receive the next complete message.
    ///
    /// Returns `Ok(None)` when the poll interval elapsed without a message,
    /// so callers get a chance to observe shutdown between receives.
    fn recv_parts(&mut self) -> Result<Option<Vec<Vec<u8>>>, TransportError>;
}

/// Receive one message and check it carries exactly three frames.
pub fn receive_envelope<T: Transport + ?Sized>(
    transport: &mut T,
) -> Result<Option<RawEnvelope>, ReceiveError> {
    match transport.recv_parts()? {
        Some(parts) => Ok(Some(RawEnvelope::from_parts(parts)?)),
        None => Ok(None),
    }
}

/// In-memory FIFO transport. Reports [`TransportError::Closed`] once drained.
#[derive(Debug, Default)]
pub struct QueueTransport {
    queue: VecDeque<Vec<Vec<u8>>>,
}

impl QueueTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parts: Vec<Vec<u8>>) {
        self.queue.push_back(parts);
    }

    pub fn push_envelope(&mut self, envelope: RawEnvelope) {
        self.push(envelope.into_parts().into_iter().map(|b| b.to_vec()).collect());
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Transport for QueueTransport {
    fn recv_parts(&mut self) -> Result<Option<Vec<Vec<u8>>>, TransportError> {
        self.queue.pop_front().map(Some).ok_or(TransportError::Closed)
    }
}
