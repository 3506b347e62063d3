// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Wire format and decoding for the uplink slot API.
//!
//! A producer publishes one three-frame message per uplink slot:
//! `[header][previous-slot IQ][current-slot IQ]`. This crate turns those
//! frames into an owned [`UplinkSlotMessage`].

pub mod decode;
pub mod envelope;
pub mod error;
pub mod header;
pub mod wire;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use decode::{decode, encode_envelope, UplinkSlotMessage};
pub use envelope::{receive_envelope, QueueTransport, RawEnvelope, Transport};
pub use error::{DecodeError, ReceiveError, SampleField, TransportError};
pub use header::SlotHeader;
pub use wire::{WireFormat, FIXED_HEADER_SIZE, MAX_PRB_CAPACITY, MAX_PRB_NR, SAMPLE_SIZE};
