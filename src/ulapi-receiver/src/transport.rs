// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! ZeroMQ SUB socket transport.

use tracing::info;
use ulapi_core::{Transport, TransportError};

use crate::config::SubscribeConfig;

/// Subscriber socket and the context that owns it.
///
/// Both are released on drop; the socket is declared first so it closes
/// before the context terminates.
pub struct ZmqTransport {
    socket: zmq::Socket,
    _context: zmq::Context,
}

impl ZmqTransport {
    /// Open a SUB socket on a fresh context and connect it.
    pub fn connect(cfg: &SubscribeConfig) -> Result<Self, TransportError> {
        Self::connect_with(zmq::Context::new(), cfg)
    }

    /// Open a SUB socket on an existing context (needed for `inproc://`).
    pub fn connect_with(
        context: zmq::Context,
        cfg: &SubscribeConfig,
    ) -> Result<Self, TransportError> {
        let socket = context.socket(zmq::SUB).map_err(map_zmq_error)?;
        socket.set_linger(0).map_err(map_zmq_error)?;
        let timeout_ms = i32::try_from(cfg.poll_interval_ms).unwrap_or(i32::MAX);
        socket.set_rcvtimeo(timeout_ms).map_err(map_zmq_error)?;
        socket
            .set_subscribe(cfg.topic.as_bytes())
            .map_err(map_zmq_error)?;
        socket.connect(&cfg.endpoint).map_err(|e| {
            TransportError::Io(format!("connect to {} failed: {}", cfg.endpoint, e))
        })?;
        info!("Subscribed to {}", cfg.endpoint);
        Ok(Self {
            socket,
            _context: context,
        })
    }
}

impl Transport for ZmqTransport {
    fn recv_parts(&mut self) -> Result<Option<Vec<Vec<u8>>>, TransportError> {
        match self.socket.recv_multipart(0) {
            Ok(parts) => Ok(Some(parts)),
            Err(zmq::Error::EAGAIN) => Ok(None),
            Err(e) => Err(map_zmq_error(e)),
        }
    }
}

fn map_zmq_error(err: zmq::Error) -> TransportError {
    match err {
        zmq::Error::ETERM => TransportError::Closed,
        zmq::Error::EINTR => TransportError::Interrupted,
        other => TransportError::Io(other.to_string()),
    }
}
