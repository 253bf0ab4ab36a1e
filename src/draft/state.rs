//! Canonical draft session state.
//!
//! `DraftSession` is plain data: every rule lives in `rules::DraftRules`.
//! The host owns the only authoritative copy and replicates it whole; guests
//! hold disposable copies.
//!
//! ## Phases
//!
//! ```text
//! draft -> [build] -> [reduction] -> [swap] -> complete
//! ```
//!
//! `build` is entered by `frankendraz` only. `reduction` and `swap` are
//! entered only when there is something to reduce or to offer.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::holdings::{Bag, FactionBuild};
use super::pick::{PendingPickSet, PickRecord};
use crate::core::{DraftConfig, PlayerId, PlayerMap};
use crate::resolver::SwapOffer;
use crate::rules::Variant;

/// Session phase. Only ever advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Draft,
    Build,
    Reduction,
    Swap,
    Complete,
}

impl SessionPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Draft => "draft",
            SessionPhase::Build => "build",
            SessionPhase::Reduction => "reduction",
            SessionPhase::Swap => "swap",
            SessionPhase::Complete => "complete",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The whole draft.
///
/// `round` counts barrier cycles, not only draft rounds: it is bumped every
/// time a phase restarts collection (a new draft round, a repeated reduction,
/// a regenerated swap set), so `(phase, round)` identifies one cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSession {
    pub config: DraftConfig,
    pub phase: SessionPhase,
    /// Current cycle, starting at 1.
    pub round: u32,
    /// Bag each seat currently drafts from.
    pub bags: PlayerMap<Bag>,
    pub builds: PlayerMap<FactionBuild>,
    /// Staged, uncommitted picks. Never replicated.
    pub pending: PlayerMap<PendingPickSet>,
    /// Seats that have committed or submitted in the current cycle.
    pub submitted: PlayerMap<bool>,
    /// Outstanding swap offers, regenerated on every swap-phase entry.
    pub swap_offers: Vec<SwapOffer>,
    /// Private component pools for the build phase.
    pub build_pools: PlayerMap<Bag>,
    pub history: Vector<PickRecord>,
}

impl DraftSession {
    /// Empty session in the draft phase with the given bags.
    pub fn new(config: DraftConfig, bags: PlayerMap<Bag>) -> Self {
        let player_count = config.player_count;
        assert_eq!(bags.player_count(), player_count, "One bag per seat");

        Self {
            config,
            phase: SessionPhase::Draft,
            round: 1,
            bags,
            builds: PlayerMap::with_default(player_count),
            pending: PlayerMap::with_default(player_count),
            submitted: PlayerMap::with_value(player_count, false),
            swap_offers: Vec::new(),
            build_pools: PlayerMap::with_default(player_count),
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count())
    }

    #[must_use]
    pub fn has_player(&self, player: PlayerId) -> bool {
        player.index() < self.player_count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// Identifies one collection cycle.
    #[must_use]
    pub fn cycle(&self) -> (SessionPhase, u32) {
        (self.phase, self.round)
    }

    /// Outstanding swap offers owned by one seat.
    pub fn offers_for(&self, player: PlayerId) -> impl Iterator<Item = &SwapOffer> {
        self.swap_offers.iter().filter(move |o| o.player == player)
    }

    /// Copy fit for replication: staged picks are private and stripped.
    #[must_use]
    pub fn public_snapshot(&self) -> Self {
        let mut snapshot = self.clone();
        for (_, pending) in snapshot.pending.iter_mut() {
            pending.clear();
        }
        snapshot
    }

    /// Start a new collection cycle within the current phase.
    pub(crate) fn next_cycle(&mut self) {
        self.round += 1;
        self.clear_submissions();
    }

    /// Move to a later phase, starting its first cycle.
    pub(crate) fn enter_phase(&mut self, phase: SessionPhase) {
        debug_assert!(phase > self.phase, "phases only advance");
        self.phase = phase;
        self.round = 1;
        self.clear_submissions();
    }

    fn clear_submissions(&mut self) {
        for (_, done) in self.submitted.iter_mut() {
            *done = false;
        }
        for (_, pending) in self.pending.iter_mut() {
            pending.clear();
        }
    }
}
