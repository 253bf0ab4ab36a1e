//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use frankendraft::catalogue::{Catalogue, Category, Component};
use frankendraft::core::{Expansion, PlayerId};
use frankendraft::draft::{DraftSession, Pick, SessionPhase};
use frankendraft::rules::DraftRules;

pub const BASE_FACTIONS: [&str; 6] = ["Arborec", "Hacan", "Jol-Nar", "Letnev", "Mentak", "Sol"];

const SINGLE_ITEM_CATEGORIES: [Category; 10] = [
    Category::Agents,
    Category::Commanders,
    Category::Heroes,
    Category::Promissory,
    Category::Flagship,
    Category::Mech,
    Category::StartingTechs,
    Category::StartingFleet,
    Category::Commodities,
    Category::HomeSystem,
];

fn faction(name: &str, expansion: Expansion) -> Vec<Component> {
    let item = |label: String, category: Category| {
        Component::new(label, category, name).with_expansion(expansion)
    };

    let mut components = Vec::new();
    for i in 1..=3 {
        components.push(item(format!("{} Ability {}", name, i), Category::Abilities));
    }
    for i in 1..=2 {
        components.push(item(format!("{} Tech {}", name, i), Category::FactionTechs));
    }
    for category in SINGLE_ITEM_CATEGORIES {
        let label = if name == "Mentak" && category == Category::Flagship {
            "Corsair".to_string()
        } else {
            format!("{} {}", name, category)
        };
        components.push(item(label, category));
    }
    components.push(
        Component::new(format!("{} Breakthrough", name), Category::Breakthrough, name)
            .with_expansion(Expansion::ThundersEdge),
    );
    components
}

/// Six base factions, one Prophecy of Kings faction, 20 blue and 8 red
/// tiles. Holding Mentak's Corsair offers "Pillage Fleet" as a swap and
/// grants "Salvage Drone".
pub fn catalogue() -> Catalogue {
    let mut components: Vec<Component> = BASE_FACTIONS
        .iter()
        .flat_map(|name| faction(name, Expansion::Base))
        .collect();
    components.extend(faction("Titans", Expansion::ProphecyOfKings));

    components.push(
        Component::new("Pillage Fleet", Category::Flagship, "Mentak").swap_for("Corsair"),
    );
    components.push(Component::new("Salvage Drone", Category::Mech, "Mentak").grant_for("Corsair"));

    for i in 1..=20 {
        components.push(Component::neutral(format!("Blue {}", i), Category::BlueTile));
    }
    for i in 1..=8 {
        components.push(Component::neutral(format!("Red {}", i), Category::RedTile));
    }

    Catalogue::new(components).expect("fixture catalogue has unique identities")
}

pub fn rules() -> DraftRules {
    DraftRules::new(Arc::new(catalogue()))
}

pub fn rules_for(components: Vec<Component>) -> DraftRules {
    DraftRules::new(Arc::new(Catalogue::new(components).expect("unique identities")))
}

/// The first item of each of the first legal categories, as many as the
/// round requires.
pub fn first_picks(rules: &DraftRules, session: &DraftSession, player: PlayerId) -> Vec<Pick> {
    let required = rules.required_picks(session, player);
    rules
        .legal_categories(session, player)
        .into_iter()
        .take(required)
        .map(|category| Pick::new(category, session.bags[player].get(category)[0].clone()))
        .collect()
}

/// Commit `first_picks` for every active seat until the draft phase ends.
pub fn play_draft(rules: &DraftRules, session: &mut DraftSession) {
    for _ in 0..200 {
        if session.phase != SessionPhase::Draft {
            return;
        }
        let cycle = session.cycle();
        for player in session.player_ids().collect::<Vec<_>>() {
            if session.cycle() != cycle {
                break;
            }
            if rules.is_active(session, player) && !session.submitted[player] {
                let picks = first_picks(rules, session, player);
                rules
                    .commit_pick_set(session, player, &picks)
                    .expect("first picks are always legal");
            }
        }
    }
    panic!("draft did not finish within 200 rounds");
}

/// Remove the first held item of over-limit categories until the phase ends.
pub fn reduce_to_limits(rules: &DraftRules, session: &mut DraftSession) {
    while session.phase == SessionPhase::Reduction {
        let (player, category) = session
            .player_ids()
            .find_map(|p| rules.over_limit_categories(session, p).first().map(|c| (p, *c)))
            .expect("reduction phase always has an over-limit seat");
        rules
            .remove_component(session, player, category, 0)
            .expect("over-limit removal is legal");
    }
}

/// Refuse every pending swap offer.
pub fn refuse_all_swaps(rules: &DraftRules, session: &mut DraftSession) {
    while session.phase == SessionPhase::Swap {
        let offer = session.swap_offers[0].clone();
        rules
            .refuse_swap(session, offer.player, &offer)
            .expect("pending offers can be refused");
    }
}

/// Every component a build holds, granted extras included.
pub fn held_names(session: &DraftSession, player: PlayerId) -> Vec<String> {
    session.builds[player]
        .iter()
        .flat_map(|(_, list)| list.iter().map(|c| c.name.clone()))
        .collect()
}
