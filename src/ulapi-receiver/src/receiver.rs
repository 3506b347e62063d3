// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Blocking receive loop: one envelope is received and decoded at a time.

use tokio::sync::watch;
use tracing::{debug, info, warn};
use ulapi_core::{
    decode, receive_envelope, ReceiveError, Transport, TransportError, UplinkSlotMessage,
    WireFormat,
};

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiveStats {
    pub received: u64,
    pub decoded: u64,
    pub rejected: u64,
}

/// Receive and decode messages until shutdown or transport close.
///
/// `shutdown` is checked before every receive, so a stop request takes
/// effect within one transport poll interval. Malformed messages are logged
/// and skipped; any transport failure other than a close is returned.
pub fn run_receive_loop<T, F>(
    transport: &mut T,
    wire: &WireFormat,
    shutdown: &watch::Receiver<bool>,
    mut on_message: F,
) -> Result<ReceiveStats, TransportError>
where
    T: Transport + ?Sized,
    F: FnMut(UplinkSlotMessage),
{
    let mut stats = ReceiveStats::default();

    loop {
        if *shutdown.borrow() {
            info!("Shutdown requested, stopping receiver");
            break;
        }

        let envelope = match receive_envelope(transport) {
            Ok(Some(envelope)) => envelope,
            Ok(None) | Err(ReceiveError::Transport(TransportError::Interrupted)) => continue,
            Err(ReceiveError::Transport(TransportError::Closed)) => {
                info!("Transport closed, stopping receiver");
                break;
            }
            Err(ReceiveError::Transport(e)) => return Err(e),
            Err(ReceiveError::Decode(e)) => {
                stats.received += 1;
                stats.rejected += 1;
                warn!("Dropping message: {}", e);
                continue;
            }
        };
        stats.received += 1;

        match decode(&envelope, wire) {
            Ok(message) => {
                stats.decoded += 1;
                let header = message.header();
                debug!(
                    "Decoded slot {} task {} (rnti {}, {} samples)",
                    header.slot_idx, header.task_idx, header.rnti, header.sf_len
                );
                on_message(message);
            }
            Err(e) => {
                stats.rejected += 1;
                warn!("Dropping message: {}", e);
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex32;
    use ulapi_core::{encode_envelope, QueueTransport, SlotHeader, MAX_PRB_NR};

    fn message(slot_idx: u32, sf_len: u32) -> UplinkSlotMessage {
        let header = SlotHeader {
            message_type: 0,
            rnti: 1,
            rnti_type: 0,
            slot_idx,
            task_idx: 9,
            sf_len,
            offset: 0,
            snr_db: 0.0,
            full_secs: 0,
            frac_secs: 0.0,
            time_diff: 0.0,
            nof_prb: 0,
            start_symbol: 0,
            nof_symbol: 14,
            prb_map: vec![0; MAX_PRB_NR],
        };
        let samples = vec![Complex32::new(slot_idx as f32, 0.0); sf_len as usize];
        UplinkSlotMessage::new(header, samples.clone(), samples).unwrap()
    }

    fn push(transport: &mut QueueTransport, msg: &UplinkSlotMessage) {
        let env = encode_envelope(msg, &WireFormat::default()).unwrap();
        transport.push_envelope(env);
    }

    #[test]
    fn test_loop_skips_bad_messages_and_keeps_order() {
        let mut transport = QueueTransport::new();
        push(&mut transport, &message(1, 2));
        transport.push(vec![vec![0u8; 4]]);
        transport.push(vec![vec![0u8; 10], Vec::new(), Vec::new()]);
        push(&mut transport, &message(2, 0));

        let (_tx, rx) = watch::channel(false);
        let mut slots = Vec::new();
        let stats = run_receive_loop(&mut transport, &WireFormat::default(), &rx, |m| {
            slots.push(m.header().slot_idx)
        })
        .unwrap();

        assert_eq!(slots, vec![1, 2]);
        assert_eq!(
            stats,
            ReceiveStats {
                received: 4,
                decoded: 2,
                rejected: 2
            }
        );
    }

    #[test]
    fn test_loop_stops_on_shutdown_without_receiving() {
        let mut transport = QueueTransport::new();
        push(&mut transport, &message(1, 1));

        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let stats = run_receive_loop(&mut transport, &WireFormat::default(), &rx, |_| {
            panic!("no message expected after shutdown")
        })
        .unwrap();

        assert_eq!(stats, ReceiveStats::default());
        assert_eq!(transport.len(), 1);
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn recv_parts(&mut self) -> Result<Option<Vec<Vec<u8>>>, TransportError> {
            Err(TransportError::Io("socket gone".to_string()))
        }
    }

    #[test]
    fn test_transport_failure_is_fatal() {
        let (_tx, rx) = watch::channel(false);
        let err = run_receive_loop(&mut FailingTransport, &WireFormat::default(), &rx, |_| {})
            .unwrap_err();
        assert_eq!(err, TransportError::Io("socket gone".to_string()));
    }

    /// Interrupted once, then serves the queued envelopes.
    struct InterruptedTransport {
        interrupted: bool,
        inner: QueueTransport,
    }

    impl Transport for InterruptedTransport {
        fn recv_parts(&mut self) -> Result<Option<Vec<Vec<u8>>>, TransportError> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(TransportError::Interrupted);
            }
            self.inner.recv_parts()
        }
    }

    #[test]
    fn test_interrupted_receive_is_retried() {
        let mut inner = QueueTransport::new();
        push(&mut inner, &message(4, 1));
        let mut transport = InterruptedTransport {
            interrupted: false,
            inner,
        };

        let (_tx, rx) = watch::channel(false);
        let mut slots = Vec::new();
        let stats = run_receive_loop(&mut transport, &WireFormat::default(), &rx, |m| {
            slots.push(m.header().slot_idx)
        })
        .unwrap();

        assert!(transport.interrupted);
        assert_eq!(slots, vec![4]);
        assert_eq!(
            stats,
            ReceiveStats {
                received: 1,
                decoded: 1,
                rejected: 0
            }
        );
    }

    /// Idles until polled a few times, then flips the shutdown flag.
    struct IdleTransport {
        polls: u32,
        shutdown: watch::Sender<bool>,
    }

    impl Transport for IdleTransport {
        fn recv_parts(&mut self) -> Result<Option<Vec<Vec<u8>>>, TransportError> {
            self.polls += 1;
            if self.polls == 3 {
                let _ = self.shutdown.send(true);
            }
            Ok(None)
        }
    }

    #[test]
    fn test_idle_polls_observe_shutdown() {
        let (tx, rx) = watch::channel(false);
        let mut transport = IdleTransport {
            polls: 0,
            shutdown: tx,
        };
        let stats =
            run_receive_loop(&mut transport, &WireFormat::default(), &rx, |_| {}).unwrap();
        assert_eq!(transport.polls, 3);
        assert_eq!(stats.received, 0);
    }
}
