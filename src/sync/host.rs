//! Host-authoritative barrier.
//!
//! The host owns the only canonical `DraftSession`. Each cycle it buffers one
//! contribution per seat, keyed by `PlayerId`; when every seat that owes one
//! has contributed it merges them in seat order into a copy of the session,
//! settles the copy, swaps it in and broadcasts it. During the draft a seat
//! the rules skip this round owes nothing, though an empty pick set from it
//! is still buffered. A seat that never contributes stalls the barrier: there
//! is no timeout, only `waiting_on`.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use super::channel::PeerChannel;
use super::error::SyncError;
use super::message::{Contribution, PeerId, SyncMessage};
use super::seat::SeatDraft;
use crate::core::{DraftConfig, DraftError, PlayerId};
use crate::draft::{DraftSession, SessionPhase};
use crate::rules::DraftRules;

pub struct HostSession<C: PeerChannel> {
    rules: DraftRules,
    session: DraftSession,
    seats: BTreeMap<PeerId, PlayerId>,
    buffer: BTreeMap<PlayerId, Contribution>,
    channel: C,
}

impl<C: PeerChannel> HostSession<C> {
    /// Start a draft. Seats are assigned with `seat`.
    pub fn new(rules: DraftRules, config: DraftConfig, channel: C) -> Self {
        let session = rules.start(config);
        Self {
            rules,
            session,
            seats: BTreeMap::new(),
            buffer: BTreeMap::new(),
            channel,
        }
    }

    #[must_use]
    pub fn session(&self) -> &DraftSession {
        &self.session
    }

    #[must_use]
    pub fn rules(&self) -> &DraftRules {
        &self.rules
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Map a peer to a seat. A seat held by another peer is reassigned.
    pub fn seat(&mut self, peer: PeerId, player: PlayerId) -> Result<(), SyncError> {
        if !self.session.has_player(player) {
            return Err(DraftError::UnknownPlayer(player).into());
        }
        if let Some((previous, _)) = self.seats.iter().find(|(_, p)| **p == player) {
            warn!("{} moves from {} to {}", player, previous, peer);
        }
        self.seats.retain(|_, p| *p != player);
        self.seats.insert(peer, player);
        info!("{} seated as {}", peer, player);
        Ok(())
    }

    pub fn player_for(&self, peer: PeerId) -> Result<PlayerId, SyncError> {
        self.seats
            .get(&peer)
            .copied()
            .ok_or(SyncError::UnknownPeer(peer))
    }

    /// A fresh working copy for the host's own seat.
    pub fn local_seat(&self) -> Result<SeatDraft, SyncError> {
        let player = self.player_for(PeerId::LOCAL)?;
        Ok(SeatDraft::new(player, self.session.public_snapshot()))
    }

    /// Seats that owe a contribution and have none buffered in this cycle.
    #[must_use]
    pub fn waiting_on(&self) -> Vec<PlayerId> {
        if self.session.is_complete() {
            return Vec::new();
        }
        self.session
            .player_ids()
            .filter(|p| self.owes_contribution(*p))
            .collect()
    }

    fn owes_contribution(&self, player: PlayerId) -> bool {
        if self.buffer.contains_key(&player) {
            return false;
        }
        self.session.phase != SessionPhase::Draft || self.rules.is_active(&self.session, player)
    }

    fn barrier_full(&self) -> bool {
        !self.session.is_complete()
            && self
                .session
                .player_ids()
                .all(|p| !self.owes_contribution(p))
    }

    /// Buffer a seat's contribution.
    ///
    /// The contribution is checked against the canonical session first, so
    /// a rejected one never enters the buffer. A second contribution from the
    /// same seat in one cycle is ignored. Returns `true` when this
    /// contribution completed the barrier and the session advanced.
    pub fn submit(
        &mut self,
        peer: PeerId,
        contribution: Contribution,
    ) -> Result<bool, SyncError> {
        let player = self.player_for(peer)?;
        let phase = self.session.phase;
        if !contribution.fits(phase) {
            warn!("{} sent a contribution that does not fit {}", player, phase);
            return Err(SyncError::WrongContribution { phase });
        }
        if self.buffer.contains_key(&player) {
            warn!(
                "{} already contributed to {} round {}, ignored",
                player, phase, self.session.round
            );
            return Ok(false);
        }

        let mut probe = self.session.clone();
        contribution.record(&self.rules, &mut probe, player)?;

        self.buffer.insert(player, contribution);
        debug!(
            "buffered {}, waiting on {} more",
            player,
            self.waiting_on().len()
        );

        if self.barrier_full() {
            self.apply()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Submit the host's own seat.
    pub fn submit_local(&mut self, seat: &mut SeatDraft) -> Result<bool, SyncError> {
        let message = seat.submit(&self.rules)?;
        self.handle(PeerId::LOCAL, message)
    }

    /// Merge the buffer into the canonical session. The buffer is kept if
    /// any contribution fails to record.
    fn apply(&mut self) -> Result<(), SyncError> {
        let before = self.session.cycle();

        let mut next = self.session.clone();
        for (player, contribution) in &self.buffer {
            contribution.record(&self.rules, &mut next, *player)?;
        }
        self.rules.settle(&mut next);
        self.session = next;
        self.buffer.clear();

        let (phase, round) = self.session.cycle();
        info!(
            "barrier applied for {} round {}: now {} round {}",
            before.0, before.1, phase, round
        );
        self.broadcast_state()
    }

    /// Send the canonical state to every peer.
    pub fn broadcast_state(&mut self) -> Result<(), SyncError> {
        let message = SyncMessage::State {
            state: Box::new(self.session.public_snapshot()),
        };
        self.channel.broadcast(&message)
    }

    /// Feed an inbound JSON message. Undecodable and stale messages are
    /// logged and dropped.
    pub fn handle_message(&mut self, peer: PeerId, json: &str) -> Result<bool, SyncError> {
        match SyncMessage::from_json(json) {
            Ok(message) => self.handle(peer, message),
            Err(err) => {
                warn!("dropping undecodable message from {}: {}", peer, err);
                Ok(false)
            }
        }
    }

    /// Feed an inbound message.
    pub fn handle(&mut self, peer: PeerId, message: SyncMessage) -> Result<bool, SyncError> {
        let player = self.player_for(peer)?;
        let phase = self.session.phase;

        match message {
            SyncMessage::Pick { player_id, picks } => {
                if player_id != player {
                    warn!("{} sent picks for {}, dropped", peer, player_id);
                    return Ok(false);
                }
                if phase != SessionPhase::Draft {
                    warn!("stale picks from {} during {}, dropped", player, phase);
                    return Ok(false);
                }
                // A skip sent for a round the barrier already closed.
                if picks.is_empty() && self.rules.is_active(&self.session, player) {
                    warn!("stale skip from {} in round {}, dropped", player, self.session.round);
                    return Ok(false);
                }
                self.submit(peer, Contribution::PickSet(picks))
            }
            SyncMessage::FactionUpdate {
                player_id,
                faction,
                phase: sent_for,
            } => {
                if player_id != player {
                    warn!("{} sent a snapshot for {}, dropped", peer, player_id);
                    return Ok(false);
                }
                if phase != sent_for {
                    warn!(
                        "stale {} snapshot from {} during {}, dropped",
                        sent_for, player, phase
                    );
                    return Ok(false);
                }
                self.submit(peer, Contribution::FactionSnapshot(faction))
            }
            SyncMessage::State { .. } => {
                warn!("{} sent canonical state; only the host does, dropped", peer);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalogue::{Catalogue, Category, Component};
    use crate::draft::Pick;
    use crate::rules::Variant;
    use crate::sync::LoopbackChannel;

    fn host(players: usize) -> HostSession<LoopbackChannel> {
        let components = (0..12)
            .map(|i| Component::new(format!("Ability {}", i), Category::Abilities, "Sol"))
            .collect();
        let rules = DraftRules::new(Arc::new(Catalogue::new(components).unwrap()));
        let config = DraftConfig::new(Variant::Rotisserie, players).with_seed(2);
        let mut host = HostSession::new(rules, config, LoopbackChannel::new());
        host.seat(PeerId::LOCAL, PlayerId::new(0)).unwrap();
        for p in 1..players {
            host.seat(PeerId::new(p as u64 + 10), PlayerId::new(p as u8)).unwrap();
        }
        host
    }

    fn one_pick(host: &HostSession<LoopbackChannel>, player: PlayerId) -> Contribution {
        let component = host.session().bags[player].get(Category::Abilities)[0].clone();
        Contribution::PickSet(vec![Pick::new(Category::Abilities, component)])
    }

    #[test]
    fn test_unknown_peer() {
        let mut host = host(2);
        assert!(matches!(
            host.submit(PeerId::new(99), Contribution::PickSet(Vec::new())),
            Err(SyncError::UnknownPeer(_))
        ));
    }

    #[test]
    fn test_barrier_waits_for_every_seat() {
        let mut host = host(3);
        let p0 = PlayerId::new(0);

        let first = one_pick(&host, p0);
        assert!(!host.submit(PeerId::LOCAL, first).unwrap());
        assert_eq!(host.waiting_on(), vec![PlayerId::new(1), PlayerId::new(2)]);
        // The canonical session is untouched until the barrier fills.
        assert!(host.session().builds[p0].is_empty());

        let second = one_pick(&host, PlayerId::new(1));
        assert!(!host.submit(PeerId::new(11), second).unwrap());
        let third = one_pick(&host, PlayerId::new(2));
        assert!(host.submit(PeerId::new(12), third).unwrap());

        assert_eq!(host.session().cycle(), (SessionPhase::Draft, 2));
        assert_eq!(host.session().builds[p0].count(Category::Abilities), 1);
        assert_eq!(host.waiting_on().len(), 3);
        assert_eq!(host.channel().sent().len(), 1);
    }

    #[test]
    fn test_duplicate_ignored_and_invalid_rejected() {
        let mut host = host(2);
        let p0 = PlayerId::new(0);

        assert!(matches!(
            host.submit(PeerId::LOCAL, Contribution::PickSet(Vec::new())),
            Err(SyncError::Draft(DraftError::IncompleteSubmission { .. }))
        ));
        assert_eq!(host.waiting_on().len(), 2);

        let pick = one_pick(&host, p0);
        host.submit(PeerId::LOCAL, pick.clone()).unwrap();
        assert!(!host.submit(PeerId::LOCAL, pick).unwrap());
        assert_eq!(host.waiting_on(), vec![PlayerId::new(1)]);
    }

    #[test]
    fn test_failed_merge_keeps_buffer() {
        let mut host = host(2);
        let p0 = PlayerId::new(0);

        let pick = one_pick(&host, p0);
        host.submit(PeerId::LOCAL, pick).unwrap();
        // Commit the seat behind the barrier's back so its buffered picks
        // no longer record.
        host.session.submitted[p0] = true;

        assert!(host.apply().is_err());
        assert!(host.buffer.contains_key(&p0));
        assert_eq!(host.session().cycle(), (SessionPhase::Draft, 1));
        assert!(host.channel().sent().is_empty());
    }

    #[test]
    fn test_stale_skip_dropped() {
        let mut host = host(2);
        let skip = SyncMessage::Pick {
            player_id: PlayerId::new(1),
            picks: Vec::new(),
        };

        assert!(!host.handle(PeerId::new(11), skip).unwrap());
        assert_eq!(host.waiting_on().len(), 2);
    }

    #[test]
    fn test_reseating_moves_peer() {
        let mut host = host(2);
        host.seat(PeerId::new(50), PlayerId::new(1)).unwrap();

        assert!(host.player_for(PeerId::new(11)).is_err());
        assert_eq!(host.player_for(PeerId::new(50)).unwrap(), PlayerId::new(1));
        assert!(host.seat(PeerId::new(51), PlayerId::new(5)).is_err());
    }

    #[test]
    fn test_garbage_dropped() {
        let mut host = host(2);
        assert!(!host.handle_message(PeerId::new(11), "{not json").unwrap());
        assert_eq!(host.waiting_on().len(), 2);
    }
}
