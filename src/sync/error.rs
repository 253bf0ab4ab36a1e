//! Synchronization errors.

use thiserror::Error;

use super::message::PeerId;
use crate::core::DraftError;
use crate::draft::SessionPhase;

/// Errors raised by the host barrier and guest projections.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The contribution was rejected by the draft rules.
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("{0} has no seat in this draft")]
    UnknownPeer(PeerId),

    /// A pick set outside `draft`, or a faction snapshot during `draft`.
    #[error("contribution does not fit the {phase} phase")]
    WrongContribution { phase: SessionPhase },

    /// Local edits after this seat submitted its contribution.
    #[error("already submitted; waiting for the next snapshot")]
    Frozen,

    #[error("no snapshot received from the host yet")]
    NoSnapshot,

    /// Transport failure reported by a network `PeerChannel`. The
    /// in-memory loopback never returns it.
    #[error("channel error: {0}")]
    Channel(String),

    #[error("message codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_draft_errors_pass_through() {
        let err: SyncError = DraftError::AlreadyCommitted(PlayerId::new(2)).into();
        assert_eq!(err.to_string(), "Player 2 has already committed this round");
        assert!(matches!(err, SyncError::Draft(_)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SyncError::WrongContribution {
                phase: SessionPhase::Complete
            }
            .to_string(),
            "contribution does not fit the complete phase"
        );
        assert_eq!(
            SyncError::UnknownPeer(PeerId::new(7)).to_string(),
            "peer 7 has no seat in this draft"
        );
        assert_eq!(
            SyncError::Channel("connection reset".into()).to_string(),
            "channel error: connection reset"
        );
    }
}
