//! Guest projection.
//!
//! A guest keeps the last canonical snapshot and a `SeatDraft` working copy.
//! Local edits are discarded whenever a snapshot for a different
//! `(phase, round)` arrives; a rebroadcast of the same cycle keeps them.

use log::{debug, warn};

use super::channel::PeerChannel;
use super::error::SyncError;
use super::message::{PeerId, SyncMessage};
use super::seat::SeatDraft;
use crate::catalogue::{Category, Component};
use crate::core::PlayerId;
use crate::draft::{DraftSession, Pick};
use crate::resolver::SwapOffer;
use crate::rules::DraftRules;

pub struct GuestSession<C: PeerChannel> {
    rules: DraftRules,
    player: PlayerId,
    host: PeerId,
    channel: C,
    seat: Option<SeatDraft>,
}

impl<C: PeerChannel> GuestSession<C> {
    pub fn new(rules: DraftRules, player: PlayerId, host: PeerId, channel: C) -> Self {
        Self {
            rules,
            player,
            host,
            channel,
            seat: None,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Last canonical snapshot, if any arrived.
    #[must_use]
    pub fn snapshot(&self) -> Option<&DraftSession> {
        self.seat.as_ref().map(SeatDraft::canonical)
    }

    pub fn seat(&self) -> Result<&SeatDraft, SyncError> {
        self.seat.as_ref().ok_or(SyncError::NoSnapshot)
    }

    /// Take a canonical snapshot. Returns `true` if local edits were reset.
    pub fn receive_state(&mut self, state: DraftSession) -> bool {
        if let Some(seat) = self.seat.as_mut() {
            if seat.cycle() == state.cycle() {
                seat.refresh(state);
                return false;
            }
        }
        debug!("{} resets for {} round {}", self.player, state.phase, state.round);
        self.seat = Some(SeatDraft::new(self.player, state));
        true
    }

    /// Feed an inbound JSON message from the host.
    pub fn handle_message(&mut self, json: &str) -> Result<bool, SyncError> {
        match SyncMessage::from_json(json) {
            Ok(SyncMessage::State { state }) => Ok(self.receive_state(*state)),
            Ok(other) => {
                warn!("{} ignores {} sent to a guest", self.player, other.kind());
                Ok(false)
            }
            Err(err) => {
                warn!("{} drops undecodable message: {}", self.player, err);
                Ok(false)
            }
        }
    }

    fn with_seat<T>(
        &mut self,
        edit: impl FnOnce(&mut SeatDraft, &DraftRules) -> Result<T, SyncError>,
    ) -> Result<T, SyncError> {
        let seat = self.seat.as_mut().ok_or(SyncError::NoSnapshot)?;
        edit(seat, &self.rules)
    }

    pub fn stage_pick(&mut self, pick: Pick) -> Result<(), SyncError> {
        self.with_seat(|seat, rules| seat.stage_pick(rules, pick))
    }

    pub fn unstage_pick(&mut self, index: usize) -> Result<Pick, SyncError> {
        self.with_seat(|seat, rules| seat.unstage_pick(rules, index))
    }

    pub fn remove(
        &mut self,
        category: Category,
        index: usize,
    ) -> Result<Vec<Component>, SyncError> {
        self.with_seat(|seat, rules| seat.remove(rules, category, index))
    }

    pub fn accept_offer(&mut self, offer: &SwapOffer) -> Result<Component, SyncError> {
        self.with_seat(|seat, rules| seat.accept_offer(rules, offer))
    }

    pub fn decline_offer(&mut self, offer: &SwapOffer) -> Result<(), SyncError> {
        self.with_seat(|seat, rules| seat.decline_offer(rules, offer))
    }

    pub fn add_from_pool(&mut self, category: Category, index: usize) -> Result<(), SyncError> {
        self.with_seat(|seat, rules| seat.add_from_pool(rules, category, index))
    }

    pub fn return_to_pool(
        &mut self,
        category: Category,
        index: usize,
    ) -> Result<Component, SyncError> {
        self.with_seat(|seat, rules| seat.return_to_pool(rules, category, index))
    }

    /// Send this seat's contribution to the host and freeze local edits.
    pub fn submit(&mut self) -> Result<(), SyncError> {
        let message = self.with_seat(|seat, rules| seat.submit(rules))?;
        self.channel.send(self.host, &message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalogue::Catalogue;
    use crate::core::DraftConfig;
    use crate::draft::SessionPhase;
    use crate::rules::Variant;
    use crate::sync::LoopbackChannel;

    fn rules() -> DraftRules {
        let components = (0..8)
            .map(|i| Component::new(format!("Ability {}", i), Category::Abilities, "Sol"))
            .collect();
        DraftRules::new(Arc::new(Catalogue::new(components).unwrap()))
    }

    #[test]
    fn test_no_snapshot_yet() {
        let mut guest =
            GuestSession::new(rules(), PlayerId::new(1), PeerId::LOCAL, LoopbackChannel::new());
        assert!(guest.snapshot().is_none());
        assert!(matches!(guest.submit(), Err(SyncError::NoSnapshot)));
    }

    #[test]
    fn test_same_cycle_keeps_edits() {
        let rules = rules();
        let session = rules.start(DraftConfig::new(Variant::Rotisserie, 2).with_seed(8));
        let mut guest =
            GuestSession::new(rules, PlayerId::new(1), PeerId::LOCAL, LoopbackChannel::new());

        assert!(guest.receive_state(session.clone()));
        let pick = Pick::new(
            Category::Abilities,
            guest.seat().unwrap().bag().get(Category::Abilities)[0].clone(),
        );
        guest.stage_pick(pick).unwrap();

        assert!(!guest.receive_state(session.clone()));
        assert_eq!(guest.seat().unwrap().staged().len(), 1);

        let mut later = session;
        later.round = 2;
        assert!(guest.receive_state(later));
        assert!(guest.seat().unwrap().staged().is_empty());
    }

    #[test]
    fn test_submit_sends_to_host() {
        let rules = rules();
        let session = rules.start(DraftConfig::new(Variant::Rotisserie, 2).with_seed(8));
        let mut guest =
            GuestSession::new(rules, PlayerId::new(1), PeerId::new(3), LoopbackChannel::new());
        guest.receive_state(session);

        let pick = Pick::new(
            Category::Abilities,
            guest.seat().unwrap().bag().get(Category::Abilities)[0].clone(),
        );
        guest.stage_pick(pick).unwrap();
        guest.submit().unwrap();

        let sent = guest.channel().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, Some(PeerId::new(3)));
        assert!(guest.seat().unwrap().is_frozen());
        assert_eq!(guest.snapshot().unwrap().phase, SessionPhase::Draft);
    }
}
