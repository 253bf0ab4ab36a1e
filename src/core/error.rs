//! Draft errors.
//!
//! Every rejection is locally recoverable: the session is left exactly as it
//! was before the rejected operation.

use thiserror::Error;

use super::PlayerId;
use crate::catalogue::Category;
use crate::draft::SessionPhase;

/// Errors raised by the draft state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Limit or shape violation while staging a pick.
    #[error("{player} cannot pick that: {reason}")]
    IllegalPick { player: PlayerId, reason: String },

    /// Commit with a staged-set size other than the round's requirement.
    #[error("{}", incomplete_message(.player, .staged, .required))]
    IncompleteSubmission {
        player: PlayerId,
        staged: usize,
        required: usize,
    },

    /// No pending swap offer matches the request.
    #[error("{player} has no pending swap offer for '{trigger}'")]
    UnresolvableSwap { player: PlayerId, trigger: String },

    /// Removal or build move that the current phase does not allow.
    #[error("{player} cannot remove that: {reason}")]
    IllegalRemoval { player: PlayerId, reason: String },

    #[error("operation requires the {expected} phase, session is in {actual}")]
    WrongPhase {
        expected: SessionPhase,
        actual: SessionPhase,
    },

    #[error("{0} is not seated in this draft")]
    UnknownPlayer(PlayerId),

    /// Faction snapshot not reachable from the canonical build.
    #[error("snapshot from {player} rejected: {reason}")]
    InvalidSnapshot { player: PlayerId, reason: String },

    #[error("{0} has already committed this round")]
    AlreadyCommitted(PlayerId),

    #[error("no {category} slot {index} for {player}")]
    NoSuchSlot {
        player: PlayerId,
        category: Category,
        index: usize,
    },
}

fn incomplete_message(player: &PlayerId, staged: &usize, required: &usize) -> String {
    if staged < required {
        format!(
            "{} must pick {} this round, only {} selected",
            player, required, staged
        )
    } else {
        format!(
            "{} may only pick {} this round, {} selected",
            player, required, staged
        )
    }
}
