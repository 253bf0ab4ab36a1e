//! Draft variants and their limit tables.
//!
//! A variant is chosen once when the session is created. Everything that
//! differs between rule-sets hangs off this enum: which categories are
//! drafted, the draft/final limits, bag sizes, round sizes, whether bags pass
//! between rounds and whether a build phase follows the draft.

use serde::{Deserialize, Serialize};

use crate::catalogue::Category;
use crate::core::{DraftConfig, Expansion};

/// Limits for one category under one variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLimit {
    /// Cap enforced while picking.
    pub draft: usize,
    /// Cap a finished faction must satisfy. Never above `draft`.
    pub final_limit: usize,
    /// Default per-seat bag size.
    pub bag: usize,
    /// Drafted from bags (as opposed to only bounded in the build phase).
    pub drafted: bool,
}

const fn drafted(draft: usize, final_limit: usize, bag: usize) -> CategoryLimit {
    CategoryLimit {
        draft,
        final_limit,
        bag,
        drafted: true,
    }
}

const fn built(final_limit: usize) -> CategoryLimit {
    CategoryLimit {
        draft: final_limit,
        final_limit,
        bag: 0,
        drafted: false,
    }
}

/// Rule-set governing pick counts, limits and category shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Pick-and-pass from rotating bags; three picks first, then two.
    Franken,
    /// Larger limits; each seat keeps its own, larger bag.
    Power,
    /// Pick-and-pass, exactly one pick per round.
    Rotisserie,
    /// Draft whole factions and tiles, then build from the drafted factions.
    Frankendraz,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Franken,
        Variant::Power,
        Variant::Rotisserie,
        Variant::Frankendraz,
    ];

    /// Limit table entry for a category, `None` if the variant ignores it.
    #[must_use]
    pub const fn limit(self, category: Category) -> Option<CategoryLimit> {
        match self {
            Variant::Franken | Variant::Rotisserie => franken_limit(category),
            Variant::Power => power_limit(category),
            Variant::Frankendraz => frankendraz_limit(category),
        }
    }

    /// Categories drafted from bags, in display order.
    #[must_use]
    pub fn draft_categories(self, config: &DraftConfig) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.limit(*c).is_some_and(|l| l.drafted))
            .filter(|c| {
                *c != Category::Breakthrough || config.expansion_enabled(Expansion::ThundersEdge)
            })
            .collect()
    }

    /// Cap while picking. Zero for categories the variant does not draft.
    #[must_use]
    pub fn draft_limit(self, category: Category) -> usize {
        self.limit(category)
            .filter(|l| l.drafted)
            .map_or(0, |l| l.draft)
    }

    /// Cap for a finished faction. Categories outside the table are
    /// unbounded.
    #[must_use]
    pub fn final_limit(self, category: Category) -> usize {
        self.limit(category).map_or(usize::MAX, |l| l.final_limit)
    }

    /// Per-seat bag size for a category, honouring config overrides.
    #[must_use]
    pub fn bag_size(self, category: Category, config: &DraftConfig) -> usize {
        config
            .bag_size_override(category)
            .unwrap_or_else(|| self.limit(category).map_or(0, |l| l.bag))
    }

    /// Picks required in a round, before capping by what a seat can legally
    /// take.
    #[must_use]
    pub fn round_picks(self, round: u32, config: &DraftConfig) -> usize {
        let (first, subsequent) = match self {
            Variant::Rotisserie => return 1,
            Variant::Franken => (3, 2),
            Variant::Power => (4, 3),
            Variant::Frankendraz => (3, 3),
        };
        if round <= 1 {
            config.first_round_picks.unwrap_or(first)
        } else {
            config.subsequent_picks.unwrap_or(subsequent)
        }
    }

    /// Do bags pass to the next seat between rounds?
    #[must_use]
    pub const fn rotates(self) -> bool {
        !matches!(self, Variant::Power)
    }

    /// Does a build phase follow the draft?
    #[must_use]
    pub const fn has_build_phase(self) -> bool {
        matches!(self, Variant::Frankendraz)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Variant::Franken => "franken",
            Variant::Power => "power",
            Variant::Rotisserie => "rotisserie",
            Variant::Frankendraz => "frankendraz",
        };
        f.write_str(name)
    }
}

const fn franken_limit(category: Category) -> Option<CategoryLimit> {
    Some(match category {
        Category::Abilities => drafted(4, 3, 4),
        Category::FactionTechs => drafted(3, 2, 3),
        Category::Agents
        | Category::Commanders
        | Category::Heroes
        | Category::Promissory
        | Category::Flagship
        | Category::Mech
        | Category::StartingTechs
        | Category::StartingFleet
        | Category::Commodities
        | Category::HomeSystem
        | Category::Breakthrough => drafted(2, 1, 2),
        Category::BlueTile => drafted(3, 3, 3),
        Category::RedTile => drafted(2, 2, 2),
        Category::TablePosition => drafted(1, 1, 1),
        Category::Faction => return None,
    })
}

const fn power_limit(category: Category) -> Option<CategoryLimit> {
    Some(match category {
        Category::Abilities => drafted(6, 4, 7),
        Category::FactionTechs => drafted(4, 3, 5),
        Category::Agents | Category::Commanders | Category::Heroes | Category::Promissory => {
            drafted(3, 2, 4)
        }
        Category::Flagship
        | Category::Mech
        | Category::StartingTechs
        | Category::StartingFleet
        | Category::Commodities
        | Category::HomeSystem
        | Category::Breakthrough => drafted(2, 1, 3),
        Category::BlueTile => drafted(3, 3, 4),
        Category::RedTile => drafted(2, 2, 3),
        Category::TablePosition => drafted(1, 1, 1),
        Category::Faction => return None,
    })
}

const fn frankendraz_limit(category: Category) -> Option<CategoryLimit> {
    Some(match category {
        Category::Faction => drafted(3, 3, 3),
        Category::BlueTile => drafted(3, 3, 3),
        Category::RedTile => drafted(2, 2, 2),
        Category::TablePosition => return None,
        Category::Abilities => built(3),
        Category::FactionTechs => built(2),
        _ => built(1),
    })
}
