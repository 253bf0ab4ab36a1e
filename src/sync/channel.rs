//! Peer channel abstraction.
//!
//! The engine only sends; inbound messages are fed to
//! `HostSession::handle_message` / `GuestSession::handle_message` by whatever
//! owns the transport.

use super::error::SyncError;
use super::message::{PeerId, SyncMessage};

/// Outbound half of a peer transport.
pub trait PeerChannel {
    /// Send to one peer.
    fn send(&mut self, peer: PeerId, message: &SyncMessage) -> Result<(), SyncError>;

    /// Send to every connected peer.
    fn broadcast(&mut self, message: &SyncMessage) -> Result<(), SyncError>;
}

/// An encoded message waiting in a `LoopbackChannel`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// `None` for broadcasts.
    pub to: Option<PeerId>,
    pub json: String,
}

/// In-memory channel that keeps every outbound message, encoded, until
/// drained. Used for local multi-seat play and tests.
#[derive(Clone, Debug, Default)]
pub struct LoopbackChannel {
    outbox: Vec<Envelope>,
}

impl LoopbackChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> &[Envelope] {
        &self.outbox
    }

    /// Take every queued message.
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.outbox)
    }
}

impl PeerChannel for LoopbackChannel {
    fn send(&mut self, peer: PeerId, message: &SyncMessage) -> Result<(), SyncError> {
        self.outbox.push(Envelope {
            to: Some(peer),
            json: message.to_json()?,
        });
        Ok(())
    }

    fn broadcast(&mut self, message: &SyncMessage) -> Result<(), SyncError> {
        self.outbox.push(Envelope {
            to: None,
            json: message.to_json()?,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_loopback_records_and_drains() {
        let mut channel = LoopbackChannel::new();
        let message = SyncMessage::Pick {
            player_id: PlayerId::new(1),
            picks: Vec::new(),
        };

        channel.send(PeerId::new(4), &message).unwrap();
        channel.broadcast(&message).unwrap();

        assert_eq!(channel.sent().len(), 2);
        let drained = channel.drain();
        assert_eq!(drained[0].to, Some(PeerId::new(4)));
        assert_eq!(drained[1].to, None);
        assert_eq!(SyncMessage::from_json(&drained[1].json).unwrap(), message);
        assert!(channel.sent().is_empty());
    }
}
