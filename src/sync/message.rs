//! Wire messages and contributions.
//!
//! Messages are JSON objects tagged by `type`:
//!
//! ```text
//! {"type":"PICK","playerId":2,"picks":[...]}
//! {"type":"FACTION_UPDATE","playerId":2,"faction":{...},"phase":"reduction"}
//! {"type":"STATE","state":{...}}
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{DraftError, PlayerId};
use crate::draft::{DraftSession, FactionBuild, Pick, SessionPhase};
use crate::rules::DraftRules;

/// Transport-level identity of a connected peer.
///
/// Independent of seats: the host maps peers to `PlayerId`s explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub u64);

impl PeerId {
    /// The host process itself.
    pub const LOCAL: PeerId = PeerId(0);

    #[must_use]
    pub const fn new(id: u64) -> Self {
        PeerId(id)
    }

    #[must_use]
    pub const fn is_local(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_local() {
            f.write_str("local peer")
        } else {
            write!(f, "peer {}", self.0)
        }
    }
}

/// A message on the peer channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SyncMessage {
    /// A committed pick set, guest to host.
    #[serde(rename = "PICK", rename_all = "camelCase")]
    Pick { player_id: PlayerId, picks: Vec<Pick> },

    /// A finished faction snapshot for one phase, guest to host.
    #[serde(rename = "FACTION_UPDATE", rename_all = "camelCase")]
    FactionUpdate {
        player_id: PlayerId,
        faction: FactionBuild,
        phase: SessionPhase,
    },

    /// Canonical state, host to guests.
    #[serde(rename = "STATE")]
    State { state: Box<DraftSession> },
}

impl SyncMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Wire tag, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SyncMessage::Pick { .. } => "PICK",
            SyncMessage::FactionUpdate { .. } => "FACTION_UPDATE",
            SyncMessage::State { .. } => "STATE",
        }
    }
}

/// One seat's input to a barrier cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Contribution {
    /// Committed picks for a draft round.
    PickSet(Vec<Pick>),
    /// Whole build after a build, reduction or swap cycle.
    FactionSnapshot(FactionBuild),
}

impl Contribution {
    /// Can this kind of contribution be collected in `phase`?
    #[must_use]
    pub fn fits(&self, phase: SessionPhase) -> bool {
        match self {
            Contribution::PickSet(_) => phase == SessionPhase::Draft,
            Contribution::FactionSnapshot(_) => matches!(
                phase,
                SessionPhase::Build | SessionPhase::Reduction | SessionPhase::Swap
            ),
        }
    }

    /// Record into a session without advancing it.
    pub fn record(
        &self,
        rules: &DraftRules,
        session: &mut DraftSession,
        player: PlayerId,
    ) -> Result<(), DraftError> {
        match self {
            Contribution::PickSet(picks) => rules.record_picks(session, player, picks),
            Contribution::FactionSnapshot(build) => {
                rules.record_snapshot(session, player, build.clone())
            }
        }
    }

    #[must_use]
    pub fn into_message(self, player: PlayerId, phase: SessionPhase) -> SyncMessage {
        match self {
            Contribution::PickSet(picks) => SyncMessage::Pick {
                player_id: player,
                picks,
            },
            Contribution::FactionSnapshot(faction) => SyncMessage::FactionUpdate {
                player_id: player,
                faction,
                phase,
            },
        }
    }
}
