//! Per-seat working copy.
//!
//! A `SeatDraft` pairs the last canonical snapshot with a private working
//! copy. Edits go through the same `DraftRules` seat operations the host
//! uses, so a seat sees rejections immediately; none of them advance the
//! working copy's phase. `submit` turns the edits into one contribution and
//! freezes the seat until a snapshot for the next cycle arrives.

use log::info;

use super::error::SyncError;
use super::message::{Contribution, SyncMessage};
use crate::catalogue::{Category, Component};
use crate::core::PlayerId;
use crate::draft::{Bag, DraftSession, FactionBuild, PendingPickSet, Pick, SessionPhase};
use crate::resolver::SwapOffer;
use crate::rules::DraftRules;

#[derive(Clone, Debug)]
pub struct SeatDraft {
    player: PlayerId,
    canonical: DraftSession,
    working: DraftSession,
    frozen: bool,
}

impl SeatDraft {
    pub fn new(player: PlayerId, snapshot: DraftSession) -> Self {
        Self {
            player,
            working: snapshot.clone(),
            canonical: snapshot,
            frozen: false,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Last snapshot received from the host.
    #[must_use]
    pub fn canonical(&self) -> &DraftSession {
        &self.canonical
    }

    /// Snapshot plus this seat's local edits.
    #[must_use]
    pub fn working(&self) -> &DraftSession {
        &self.working
    }

    #[must_use]
    pub fn cycle(&self) -> (SessionPhase, u32) {
        self.canonical.cycle()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn bag(&self) -> &Bag {
        &self.working.bags[self.player]
    }

    #[must_use]
    pub fn build(&self) -> &FactionBuild {
        &self.working.builds[self.player]
    }

    #[must_use]
    pub fn build_pool(&self) -> &Bag {
        &self.working.build_pools[self.player]
    }

    #[must_use]
    pub fn staged(&self) -> &PendingPickSet {
        &self.working.pending[self.player]
    }

    /// Swap offers still open for this seat.
    pub fn offers(&self) -> impl Iterator<Item = &SwapOffer> {
        self.working.offers_for(self.player)
    }

    /// Replace the canonical snapshot within the same cycle, keeping local
    /// edits.
    pub(crate) fn refresh(&mut self, snapshot: DraftSession) {
        self.canonical = snapshot;
    }

    fn editable(&mut self) -> Result<&mut DraftSession, SyncError> {
        if self.frozen {
            Err(SyncError::Frozen)
        } else {
            Ok(&mut self.working)
        }
    }

    pub fn stage_pick(&mut self, rules: &DraftRules, pick: Pick) -> Result<(), SyncError> {
        let player = self.player;
        rules.stage_pick(self.editable()?, player, pick)?;
        Ok(())
    }

    pub fn unstage_pick(&mut self, rules: &DraftRules, index: usize) -> Result<Pick, SyncError> {
        let player = self.player;
        Ok(rules.unstage_pick(self.editable()?, player, index)?)
    }

    /// Reduction removal, with cascade.
    pub fn remove(
        &mut self,
        rules: &DraftRules,
        category: Category,
        index: usize,
    ) -> Result<Vec<Component>, SyncError> {
        let player = self.player;
        Ok(rules.reduce(self.editable()?, player, category, index)?)
    }

    pub fn accept_offer(
        &mut self,
        rules: &DraftRules,
        offer: &SwapOffer,
    ) -> Result<Component, SyncError> {
        let player = self.player;
        Ok(rules.accept_offer(self.editable()?, player, offer)?)
    }

    pub fn decline_offer(
        &mut self,
        rules: &DraftRules,
        offer: &SwapOffer,
    ) -> Result<(), SyncError> {
        let player = self.player;
        rules.decline_offer(self.editable()?, player, offer)?;
        Ok(())
    }

    pub fn add_from_pool(
        &mut self,
        rules: &DraftRules,
        category: Category,
        index: usize,
    ) -> Result<(), SyncError> {
        let player = self.player;
        rules.add_from_pool(self.editable()?, player, category, index)?;
        Ok(())
    }

    pub fn return_to_pool(
        &mut self,
        rules: &DraftRules,
        category: Category,
        index: usize,
    ) -> Result<Component, SyncError> {
        let player = self.player;
        Ok(rules.return_to_pool(self.editable()?, player, category, index)?)
    }

    /// The contribution the current edits amount to.
    pub fn contribution(&self) -> Result<Contribution, SyncError> {
        match self.working.phase {
            SessionPhase::Draft => Ok(Contribution::PickSet(
                self.staged().iter().cloned().collect(),
            )),
            SessionPhase::Build | SessionPhase::Reduction | SessionPhase::Swap => {
                Ok(Contribution::FactionSnapshot(self.build().clone()))
            }
            phase => Err(SyncError::WrongContribution { phase }),
        }
    }

    /// Check the contribution against the canonical snapshot, then freeze.
    ///
    /// Returns the message to send to the host.
    pub fn submit(&mut self, rules: &DraftRules) -> Result<SyncMessage, SyncError> {
        if self.frozen {
            return Err(SyncError::Frozen);
        }
        let contribution = self.contribution()?;
        let mut probe = self.canonical.clone();
        contribution.record(rules, &mut probe, self.player)?;

        self.frozen = true;
        info!(
            "{} submits for {} round {}",
            self.player, self.canonical.phase, self.canonical.round
        );
        Ok(contribution.into_message(self.player, self.canonical.phase))
    }
}
