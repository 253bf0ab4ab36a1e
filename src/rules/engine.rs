//! The draft state machine.
//!
//! `DraftRules` holds the shared catalogue and applies every transition to a
//! `DraftSession`. Operations come in two kinds:
//!
//! - **Seat edits** (`stage_pick`, `reduce`, `accept_offer`, `add_from_pool`,
//!   ...) touch one seat's holdings and never advance the session. A guest's
//!   working copy only ever sees these.
//! - **Commits** (`commit`, `remove_component`, `resolve_swap`,
//!   `finish_build`, `submit_snapshot`) record an edit and then `settle` the
//!   session, advancing it as far as the recorded state allows.
//!
//! Rejected operations leave the session untouched.

use std::sync::Arc;

use log::{debug, info};

use crate::allocator::allocate_bags;
use crate::catalogue::{Catalogue, Category, Component};
use crate::core::{DraftConfig, DraftError, PlayerId};
use crate::draft::{Bag, DraftSession, FactionBuild, PendingPickSet, Pick, PickRecord, SessionPhase};
use crate::resolver::{self, SwapOffer};

/// Draft rules over a shared catalogue.
#[derive(Clone, Debug)]
pub struct DraftRules {
    catalogue: Arc<Catalogue>,
}

impl DraftRules {
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self { catalogue }
    }

    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Allocate bags and open the first draft round.
    pub fn start(&self, config: DraftConfig) -> DraftSession {
        info!(
            "starting {} draft for {} seats (seed {})",
            config.variant, config.player_count, config.seed
        );
        let bags = allocate_bags(&self.catalogue, &config);
        let mut session = DraftSession::new(config, bags);
        self.settle(&mut session);
        session
    }

    // === Draft phase ===

    /// Categories in which a seat can legally take something from the bag it
    /// currently holds.
    #[must_use]
    pub fn legal_categories(&self, session: &DraftSession, player: PlayerId) -> Vec<Category> {
        if !session.has_player(player) {
            return Vec::new();
        }
        let variant = session.variant();
        let bag = &session.bags[player];
        let build = &session.builds[player];
        variant
            .draft_categories(&session.config)
            .into_iter()
            .filter(|c| bag.count(*c) > 0 && build.count(*c) < variant.draft_limit(*c))
            .collect()
    }

    /// Picks a seat must commit this round: the round size, capped by the
    /// number of categories it can legally pick in.
    #[must_use]
    pub fn required_picks(&self, session: &DraftSession, player: PlayerId) -> usize {
        if session.phase != SessionPhase::Draft {
            return 0;
        }
        let round_size = session.variant().round_picks(session.round, &session.config);
        round_size.min(self.legal_categories(session, player).len())
    }

    /// Does this seat have to pick this round? Inactive seats are skipped.
    #[must_use]
    pub fn is_active(&self, session: &DraftSession, player: PlayerId) -> bool {
        self.required_picks(session, player) > 0
    }

    /// Has every active seat committed?
    #[must_use]
    pub fn round_complete(&self, session: &DraftSession) -> bool {
        session.phase == SessionPhase::Draft
            && session
                .player_ids()
                .all(|p| session.submitted[p] || !self.is_active(session, p))
    }

    /// No seat can pick anything from any bag it will ever hold.
    ///
    /// Also true once every seat has met every draft limit.
    #[must_use]
    pub fn draft_exhausted(&self, session: &DraftSession) -> bool {
        !session
            .player_ids()
            .any(|p| self.can_still_pick(session, p))
    }

    fn can_still_pick(&self, session: &DraftSession, player: PlayerId) -> bool {
        let variant = session.variant();
        let categories = variant.draft_categories(&session.config);
        let build = &session.builds[player];
        let open = |bag: &Bag| {
            categories
                .iter()
                .any(|c| bag.count(*c) > 0 && build.count(*c) < variant.draft_limit(*c))
        };

        if variant.rotates() {
            session.bags.values().any(open)
        } else {
            open(&session.bags[player])
        }
    }

    /// Check a pick against the seat's staged set.
    pub fn check_pick(
        &self,
        session: &DraftSession,
        player: PlayerId,
        pick: &Pick,
    ) -> Result<(), DraftError> {
        expect_phase(session, SessionPhase::Draft)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;
        let required = self.required_picks(session, player);
        self.validate_pick(session, player, &session.pending[player], required, pick)
    }

    fn validate_pick(
        &self,
        session: &DraftSession,
        player: PlayerId,
        staged: &PendingPickSet,
        required: usize,
        pick: &Pick,
    ) -> Result<(), DraftError> {
        let illegal = |reason: String| DraftError::IllegalPick { player, reason };
        let variant = session.variant();
        let category = pick.category;

        if pick.component.category != category {
            return Err(illegal(format!("{} is not a {} component", pick.component, category)));
        }
        if !variant.draft_categories(&session.config).contains(&category) {
            return Err(illegal(format!("{} is not drafted in {}", category, variant)));
        }
        if !session.bags[player].contains(category, &pick.component) {
            return Err(illegal(format!("{} is not in your bag", pick.component)));
        }
        if staged.staged_in(category) > 0 {
            return Err(illegal(format!("already picking from {} this round", category)));
        }
        let limit = variant.draft_limit(category);
        if session.builds[player].count(category) >= limit {
            return Err(illegal(format!("{} limit of {} reached", category, limit)));
        }
        if staged.len() >= required {
            return Err(illegal(format!("only {} picks this round", required)));
        }
        Ok(())
    }

    /// Stage a pick. Nothing leaves the bag until the set is committed.
    pub fn stage_pick(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        pick: Pick,
    ) -> Result<(), DraftError> {
        self.check_pick(session, player, &pick)?;
        debug!("{} stages {} from {}", player, pick.component, pick.category);
        session.pending[player].push(pick);
        Ok(())
    }

    /// Retract a staged pick.
    pub fn unstage_pick(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        index: usize,
    ) -> Result<Pick, DraftError> {
        expect_phase(session, SessionPhase::Draft)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;
        session.pending[player]
            .remove(index)
            .ok_or_else(|| DraftError::IllegalPick {
                player,
                reason: format!("no staged pick at {}", index),
            })
    }

    /// Check a whole pick set as it would be committed.
    pub fn check_commit(
        &self,
        session: &DraftSession,
        player: PlayerId,
        picks: &[Pick],
    ) -> Result<(), DraftError> {
        expect_phase(session, SessionPhase::Draft)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;

        let required = self.required_picks(session, player);
        if picks.len() != required {
            return Err(DraftError::IncompleteSubmission {
                player,
                staged: picks.len(),
                required,
            });
        }

        let mut staged = PendingPickSet::new();
        for pick in picks {
            self.validate_pick(session, player, &staged, required, pick)?;
            staged.push(pick.clone());
        }
        Ok(())
    }

    /// Move a pick set from bag to build without advancing the round.
    pub fn record_picks(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        picks: &[Pick],
    ) -> Result<(), DraftError> {
        self.check_commit(session, player, picks)?;

        let round = session.round;
        for pick in picks {
            if let Some(component) = session.bags[player].take(pick.category, &pick.component) {
                session.history.push_back(PickRecord {
                    player,
                    round,
                    category: pick.category,
                    component: component.clone(),
                });
                session.builds[player].push(pick.category, component);
            }
        }
        session.pending[player].clear();
        session.submitted[player] = true;
        debug!("{} commits {} picks in round {}", player, picks.len(), round);
        Ok(())
    }

    /// Commit the seat's staged picks.
    pub fn commit(&self, session: &mut DraftSession, player: PlayerId) -> Result<(), DraftError> {
        expect_seat(session, player)?;
        let picks: Vec<Pick> = session.pending[player].iter().cloned().collect();
        self.commit_pick_set(session, player, &picks)
    }

    /// Commit an explicit pick set, then advance if the round is done.
    pub fn commit_pick_set(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        picks: &[Pick],
    ) -> Result<(), DraftError> {
        self.record_picks(session, player, picks)?;
        self.settle(session);
        Ok(())
    }

    fn complete_round(&self, session: &mut DraftSession) {
        info!("draft round {} complete", session.round);

        // Within one full rotation some seat holds a bag it can pick from,
        // unless the draft is exhausted.
        for _ in 0..session.player_count() {
            if session.variant().rotates() {
                session.bags.rotate();
            }
            session.next_cycle();
            if self.draft_exhausted(session) {
                break;
            }
            if session.player_ids().any(|p| self.is_active(session, p)) {
                return;
            }
            debug!("no seat can pick in round {}, passing bags on", session.round);
        }
        self.finish_draft(session);
    }

    fn finish_draft(&self, session: &mut DraftSession) {
        info!("draft finished with {} picks", session.history.len());
        if session.variant().has_build_phase() {
            self.enter_build(session);
        } else {
            self.check_final_limits(session);
        }
    }

    // === Build phase ===

    fn enter_build(&self, session: &mut DraftSession) {
        session.enter_phase(SessionPhase::Build);
        for player in PlayerId::all(session.player_count()) {
            let pool = self.build_pool(session, player);
            session.build_pools[player] = pool;
        }
        info!("entering build phase");
    }

    /// Every eligible item of every faction the seat drafted.
    fn build_pool(&self, session: &DraftSession, player: PlayerId) -> Bag {
        let mut factions: Vec<&str> = session.builds[player]
            .get(Category::Faction)
            .iter()
            .map(|c| c.faction.as_str())
            .collect();
        factions.sort_unstable();
        factions.dedup();

        let mut pool = Bag::new();
        for faction in factions {
            for component in self
                .catalogue
                .faction_components(faction)
                .filter(|c| session.config.is_eligible(c))
            {
                pool.push(component.category, component.clone());
            }
        }
        pool
    }

    /// Move an item from the seat's build pool into its build.
    pub fn add_from_pool(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        category: Category,
        index: usize,
    ) -> Result<(), DraftError> {
        expect_phase(session, SessionPhase::Build)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;

        if index >= session.build_pools[player].count(category) {
            return Err(DraftError::NoSuchSlot { player, category, index });
        }
        let limit = session.variant().final_limit(category);
        if session.builds[player].count(category) >= limit {
            return Err(DraftError::IllegalPick {
                player,
                reason: format!("{} limit of {} reached", category, limit),
            });
        }
        if let Some(component) = session.build_pools[player].take_at(category, index) {
            debug!("{} builds {}", player, component);
            session.builds[player].push(category, component);
        }
        Ok(())
    }

    /// Move an item from the seat's build back to its pool. Drafted
    /// categories stay put.
    pub fn return_to_pool(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        category: Category,
        index: usize,
    ) -> Result<Component, DraftError> {
        expect_phase(session, SessionPhase::Build)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;

        if session.variant().limit(category).is_some_and(|l| l.drafted) {
            return Err(DraftError::IllegalRemoval {
                player,
                reason: format!("{} was drafted and stays in the build", category),
            });
        }
        let component = session.builds[player]
            .remove_at(category, index)
            .ok_or(DraftError::NoSuchSlot { player, category, index })?;
        session.build_pools[player].push(category, component.clone());
        Ok(component)
    }

    /// Mark a seat's build as final; the phase ends once every seat is done.
    pub fn finish_build(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
    ) -> Result<(), DraftError> {
        expect_phase(session, SessionPhase::Build)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;
        session.submitted[player] = true;
        self.settle(session);
        Ok(())
    }

    fn complete_build(&self, session: &mut DraftSession) {
        for (_, build) in session.builds.iter_mut() {
            build.strip(Category::Faction);
        }
        for (_, pool) in session.build_pools.iter_mut() {
            *pool = Bag::new();
        }
        info!("build phase complete");
        self.check_final_limits(session);
    }

    // === Reduction phase ===

    /// Categories in which a seat holds more than the final limit.
    #[must_use]
    pub fn over_limit_categories(&self, session: &DraftSession, player: PlayerId) -> Vec<Category> {
        if !session.has_player(player) {
            return Vec::new();
        }
        let variant = session.variant();
        let build = &session.builds[player];
        build
            .iter()
            .map(|(category, _)| category)
            .filter(|c| build.count(*c) > variant.final_limit(*c))
            .collect()
    }

    #[must_use]
    pub fn within_final_limits(&self, session: &DraftSession) -> bool {
        session
            .player_ids()
            .all(|p| self.over_limit_categories(session, p).is_empty())
    }

    fn check_final_limits(&self, session: &mut DraftSession) {
        if self.within_final_limits(session) {
            self.enter_swap_or_complete(session);
        } else {
            session.enter_phase(SessionPhase::Reduction);
            info!("entering reduction phase");
        }
    }

    /// Remove a held item from a category over its final limit, cascading to
    /// everything swapped in or granted because of it.
    pub fn reduce(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        category: Category,
        index: usize,
    ) -> Result<Vec<Component>, DraftError> {
        expect_phase(session, SessionPhase::Reduction)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;

        let variant = session.variant();
        let build = &session.builds[player];
        let limit = variant.final_limit(category);
        if build.count(category) <= limit {
            return Err(DraftError::IllegalRemoval {
                player,
                reason: format!("{} is within its limit of {}", category, limit),
            });
        }
        match build.get(category).get(index) {
            None => return Err(DraftError::NoSuchSlot { player, category, index }),
            Some(held) if held.is_granted() => {
                return Err(DraftError::IllegalRemoval {
                    player,
                    reason: format!("{} comes with another component", held),
                })
            }
            Some(_) => {}
        }

        let removed = session.builds[player]
            .remove_with_cascade(category, index)
            .ok_or(DraftError::NoSuchSlot { player, category, index })?;
        debug!("{} removes {} ({} with cascade)", player, removed[0], removed.len());
        Ok(removed)
    }

    /// `reduce`, then advance once every seat is within its final limits.
    pub fn remove_component(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        category: Category,
        index: usize,
    ) -> Result<Vec<Component>, DraftError> {
        let removed = self.reduce(session, player, category, index)?;
        self.settle(session);
        Ok(removed)
    }

    // === Swap phase ===

    fn enter_swap_or_complete(&self, session: &mut DraftSession) {
        resolver::apply_all_extras(self.catalogue.as_ref(), &mut session.builds);
        let offers = resolver::collect_swap_offers(self.catalogue.as_ref(), &session.builds);
        if offers.is_empty() {
            self.complete(session);
        } else {
            session.enter_phase(SessionPhase::Swap);
            info!("entering swap phase with {} offers", offers.len());
            session.swap_offers = offers;
        }
    }

    fn pending_offer(
        session: &DraftSession,
        player: PlayerId,
        offer: &SwapOffer,
    ) -> Result<usize, DraftError> {
        session
            .swap_offers
            .iter()
            .position(|o| o.player == player && o == offer)
            .ok_or_else(|| DraftError::UnresolvableSwap {
                player,
                trigger: offer.trigger_component.clone(),
            })
    }

    /// Accept a pending offer. Every other offer on the same slot lapses.
    ///
    /// Returns the replaced trigger.
    pub fn accept_offer(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        offer: &SwapOffer,
    ) -> Result<Component, DraftError> {
        expect_phase(session, SessionPhase::Swap)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;
        Self::pending_offer(session, player, offer)?;

        let replaced = resolver::resolve_swap(&mut session.builds[player], offer)?;
        session.swap_offers.retain(|o| !o.same_slot(offer));
        debug!("{} swaps {} for {}", player, replaced, offer.swap_option);
        Ok(replaced)
    }

    /// Refuse a pending offer.
    pub fn decline_offer(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        offer: &SwapOffer,
    ) -> Result<(), DraftError> {
        expect_phase(session, SessionPhase::Swap)?;
        expect_seat(session, player)?;
        expect_open(session, player)?;
        let index = Self::pending_offer(session, player, offer)?;

        resolver::refuse_swap(&mut session.builds[player], offer)?;
        session.swap_offers.remove(index);
        debug!("{} keeps {} over {}", player, offer.trigger_component, offer.swap_option);
        Ok(())
    }

    /// `accept_offer`, then complete once no offer is pending.
    pub fn resolve_swap(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        offer: &SwapOffer,
    ) -> Result<Component, DraftError> {
        let replaced = self.accept_offer(session, player, offer)?;
        self.settle(session);
        Ok(replaced)
    }

    /// `decline_offer`, then complete once no offer is pending.
    pub fn refuse_swap(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        offer: &SwapOffer,
    ) -> Result<(), DraftError> {
        self.decline_offer(session, player, offer)?;
        self.settle(session);
        Ok(())
    }

    fn complete(&self, session: &mut DraftSession) {
        let granted = resolver::apply_all_extras(self.catalogue.as_ref(), &mut session.builds);
        session.swap_offers.clear();
        session.enter_phase(SessionPhase::Complete);
        info!("draft complete ({} late grants)", granted);
    }

    // === Faction snapshots ===

    /// Check a whole-build snapshot against the seat's canonical build.
    ///
    /// A snapshot must be reachable by the edits the current phase allows:
    /// removals in `reduction`, in-place swaps and refusals in `swap`, pool
    /// moves within final limits in `build`.
    pub fn check_snapshot(
        &self,
        session: &DraftSession,
        player: PlayerId,
        snapshot: &FactionBuild,
    ) -> Result<(), DraftError> {
        expect_seat(session, player)?;
        expect_open(session, player)?;
        match session.phase {
            SessionPhase::Build => self.rebuild_from_pool(session, player, snapshot).map(|_| ()),
            SessionPhase::Reduction => self.check_reduction(session, player, snapshot),
            SessionPhase::Swap => self.check_swaps(session, player, snapshot),
            phase => Err(DraftError::InvalidSnapshot {
                player,
                reason: format!("nothing to submit in the {} phase", phase),
            }),
        }
    }

    /// Replace a seat's build with a checked snapshot and mark the seat done,
    /// without advancing.
    pub fn record_snapshot(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        snapshot: FactionBuild,
    ) -> Result<(), DraftError> {
        self.check_snapshot(session, player, &snapshot)?;

        match session.phase {
            SessionPhase::Build => {
                let (build, pool) = self.rebuild_from_pool(session, player, &snapshot)?;
                session.builds[player] = build;
                session.build_pools[player] = pool;
            }
            SessionPhase::Swap => {
                session.builds[player] = snapshot;
                // Whatever is still on offer was passed over.
                let passed = resolver::swap_offers_for(
                    self.catalogue.as_ref(),
                    player,
                    &session.builds[player],
                );
                for offer in &passed {
                    resolver::refuse_swap(&mut session.builds[player], offer)?;
                }
                session.swap_offers.retain(|o| o.player != player);
            }
            _ => session.builds[player] = snapshot,
        }

        session.submitted[player] = true;
        debug!("{} submits a {} snapshot", player, session.phase);
        Ok(())
    }

    /// `record_snapshot`, then advance once every seat has submitted.
    pub fn submit_snapshot(
        &self,
        session: &mut DraftSession,
        player: PlayerId,
        snapshot: FactionBuild,
    ) -> Result<(), DraftError> {
        self.record_snapshot(session, player, snapshot)?;
        self.settle(session);
        Ok(())
    }

    fn check_reduction(
        &self,
        session: &DraftSession,
        player: PlayerId,
        snapshot: &FactionBuild,
    ) -> Result<(), DraftError> {
        let invalid = |reason: String| DraftError::InvalidSnapshot { player, reason };
        let variant = session.variant();
        let canonical = &session.builds[player];

        if let Some((category, _)) = snapshot
            .iter()
            .find(|(c, list)| !list.is_empty() && canonical.get(*c).is_empty())
        {
            return Err(invalid(format!("adds components to {}", category)));
        }

        let mut removed: Vec<(Category, &Component)> = Vec::new();
        for (category, held) in canonical.iter() {
            let dropped = dropped_from(held, snapshot.get(category))
                .ok_or_else(|| {
                    invalid(format!(
                        "{} is not a reduction of the held components",
                        category
                    ))
                })?;
            removed.extend(dropped.into_iter().map(|c| (category, c)));
        }

        for (category, _) in canonical.iter() {
            let limit = variant.final_limit(category);
            let direct = removed
                .iter()
                .filter(|(c, component)| {
                    *c == category && !removed.iter().any(|(_, t)| component.depends_on(&t.name))
                })
                .count();
            if direct == 0 {
                continue;
            }
            let excess = canonical.count(category).saturating_sub(limit);
            if direct > excess {
                return Err(invalid(format!(
                    "removes {} from {}, only {} over the limit",
                    direct, category, excess
                )));
            }
        }
        Ok(())
    }

    fn check_swaps(
        &self,
        session: &DraftSession,
        player: PlayerId,
        snapshot: &FactionBuild,
    ) -> Result<(), DraftError> {
        let invalid = |reason: String| DraftError::InvalidSnapshot { player, reason };
        let canonical = &session.builds[player];

        if let Some((category, _)) = snapshot
            .iter()
            .find(|(c, list)| list.len() != canonical.get(*c).len())
        {
            return Err(invalid(format!("{} changed size", category)));
        }

        for (category, held) in canonical.iter() {
            let sent = snapshot.get(category);
            if sent.len() != held.len() {
                return Err(invalid(format!("{} changed size", category)));
            }
            for (held, sent) in held.iter().zip(sent) {
                let sent = without_declines(sent);
                if without_declines(held) == sent {
                    continue;
                }
                let legal = resolver::swap_options_for(self.catalogue.as_ref(), held)
                    .iter()
                    .any(|option| resolver::swapped_copy(option, held) == sent);
                if !legal {
                    return Err(invalid(format!("{} cannot become {}", held, sent)));
                }
            }
        }
        Ok(())
    }

    /// Rebuild a build-phase snapshot from canonical copies.
    ///
    /// Returns the new build and what is left of the pool.
    fn rebuild_from_pool(
        &self,
        session: &DraftSession,
        player: PlayerId,
        snapshot: &FactionBuild,
    ) -> Result<(FactionBuild, Bag), DraftError> {
        let invalid = |reason: String| DraftError::InvalidSnapshot { player, reason };
        let variant = session.variant();
        let canonical = &session.builds[player];
        let drafted = |c: Category| variant.limit(c).is_some_and(|l| l.drafted);

        let mut available = session.build_pools[player].clone();
        let mut build = FactionBuild::new();

        for (category, held) in canonical.iter() {
            if drafted(category) {
                if snapshot.get(category) != held {
                    return Err(invalid(format!("drafted {} cannot change", category)));
                }
                for component in held {
                    build.push(category, component.clone());
                }
            } else {
                for component in held {
                    available.push(category, component.clone());
                }
            }
        }

        for (category, list) in snapshot.iter() {
            if drafted(category) {
                if canonical.get(category) != list {
                    return Err(invalid(format!("drafted {} cannot change", category)));
                }
                continue;
            }
            let limit = variant.final_limit(category);
            if list.len() > limit {
                return Err(invalid(format!("{} holds {}, limit {}", category, list.len(), limit)));
            }
            for component in list {
                let taken = available
                    .take(category, component)
                    .ok_or_else(|| invalid(format!("{} is not in the pool", component)))?;
                build.push(category, taken);
            }
        }

        Ok((build, available))
    }

    // === Transitions ===

    /// Seats the current cycle still waits on.
    #[must_use]
    pub fn waiting_on(&self, session: &DraftSession) -> Vec<PlayerId> {
        if session.is_complete() {
            return Vec::new();
        }
        session
            .player_ids()
            .filter(|p| !session.submitted[*p])
            .filter(|p| session.phase != SessionPhase::Draft || self.is_active(session, *p))
            .collect()
    }

    /// Advance the session as far as its recorded state allows.
    ///
    /// Called after every commit. Idempotent.
    pub fn settle(&self, session: &mut DraftSession) {
        let all_submitted = session.submitted.values().all(|done| *done);
        match session.phase {
            SessionPhase::Draft => {
                if self.round_complete(session) {
                    self.complete_round(session);
                }
            }
            SessionPhase::Build => {
                if all_submitted {
                    self.complete_build(session);
                }
            }
            SessionPhase::Reduction => {
                if self.within_final_limits(session) {
                    info!("every build is within its final limits");
                    self.enter_swap_or_complete(session);
                } else if all_submitted {
                    session.next_cycle();
                    info!("reduction continues, round {}", session.round);
                }
            }
            SessionPhase::Swap => {
                if session.swap_offers.is_empty() {
                    self.complete(session);
                } else if all_submitted {
                    session.swap_offers =
                        resolver::collect_swap_offers(self.catalogue.as_ref(), &session.builds);
                    if session.swap_offers.is_empty() {
                        self.complete(session);
                    } else {
                        session.next_cycle();
                    }
                }
            }
            SessionPhase::Complete => {}
        }
    }
}

fn expect_phase(session: &DraftSession, expected: SessionPhase) -> Result<(), DraftError> {
    if session.phase == expected {
        Ok(())
    } else {
        Err(DraftError::WrongPhase {
            expected,
            actual: session.phase,
        })
    }
}

fn expect_seat(session: &DraftSession, player: PlayerId) -> Result<(), DraftError> {
    if session.has_player(player) {
        Ok(())
    } else {
        Err(DraftError::UnknownPlayer(player))
    }
}

fn expect_open(session: &DraftSession, player: PlayerId) -> Result<(), DraftError> {
    if session.submitted[player] {
        Err(DraftError::AlreadyCommitted(player))
    } else {
        Ok(())
    }
}

/// Components of `held` missing from `kept`, if `kept` is `held` with some
/// entries removed and the rest in order.
fn dropped_from<'a>(held: &'a [Component], kept: &[Component]) -> Option<Vec<&'a Component>> {
    let mut kept = kept.iter().peekable();
    let mut dropped = Vec::new();
    for component in held {
        if kept.peek() == Some(&component) {
            kept.next();
        } else {
            dropped.push(component);
        }
    }
    kept.next().is_none().then_some(dropped)
}

fn without_declines(component: &Component) -> Component {
    let mut component = component.clone();
    component.declined_swaps.clear();
    component
}
