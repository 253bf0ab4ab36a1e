//! Draft configuration.
//!
//! A draft is created from a `DraftConfig`: the variant, the number of seats,
//! the expansion toggles and the ban lists. The config is plain data and can
//! be loaded from JSON so a lobby can hand it to the engine unchanged.

use serde::{Deserialize, Serialize};

use crate::allocator::AllocationMode;
use crate::catalogue::{Category, Component};
use crate::rules::Variant;

/// Content sets a catalogue component can come from.
///
/// `Base` is always enabled; the others are toggled per draft.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    #[default]
    Base,
    ProphecyOfKings,
    Codex,
    DiscordantStars,
    ThundersEdge,
}

/// Complete draft configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftConfig {
    /// Rule-set governing pick counts, limits and category shape.
    pub variant: Variant,

    /// Number of seats (1-255).
    pub player_count: usize,

    /// Seed for bag allocation. Same seed, same bags.
    #[serde(default)]
    pub seed: u64,

    /// Enabled expansions in addition to `Base`.
    #[serde(default)]
    pub expansions: Vec<Expansion>,

    /// Factions whose components never enter the pool.
    #[serde(default)]
    pub banned_factions: Vec<String>,

    /// Component names that never enter the pool.
    #[serde(default)]
    pub banned_components: Vec<String>,

    /// Pad short pools with tagged copies instead of handing out short bags.
    #[serde(default = "default_true")]
    pub allow_duplicates: bool,

    /// Override of the variant's first-round pick count.
    #[serde(default)]
    pub first_round_picks: Option<usize>,

    /// Override of the variant's pick count for every later round.
    #[serde(default)]
    pub subsequent_picks: Option<usize>,

    /// Overrides of the per-seat bag size for individual categories.
    #[serde(default)]
    pub bag_sizes: Vec<(Category, usize)>,
}

fn default_true() -> bool {
    true
}

impl DraftConfig {
    /// Create a config with base content only and no bans.
    pub fn new(variant: Variant, player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            variant,
            player_count,
            seed: 0,
            expansions: Vec::new(),
            banned_factions: Vec::new(),
            banned_components: Vec::new(),
            allow_duplicates: true,
            first_round_picks: None,
            subsequent_picks: None,
            bag_sizes: Vec::new(),
        }
    }

    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable an expansion.
    #[must_use]
    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        if !self.expansions.contains(&expansion) {
            self.expansions.push(expansion);
        }
        self
    }

    /// Ban a whole faction.
    #[must_use]
    pub fn ban_faction(mut self, faction: impl Into<String>) -> Self {
        self.banned_factions.push(faction.into());
        self
    }

    /// Ban a single component by name.
    #[must_use]
    pub fn ban_component(mut self, name: impl Into<String>) -> Self {
        self.banned_components.push(name.into());
        self
    }

    /// Never replicate pools; short pools yield short bags.
    #[must_use]
    pub fn without_duplicates(mut self) -> Self {
        self.allow_duplicates = false;
        self
    }

    /// How short pools are dealt.
    #[must_use]
    pub fn allocation_mode(&self) -> AllocationMode {
        if self.allow_duplicates {
            AllocationMode::Replicate
        } else {
            AllocationMode::Unique
        }
    }

    /// Override the round sizes.
    #[must_use]
    pub fn with_round_picks(mut self, first: usize, subsequent: usize) -> Self {
        self.first_round_picks = Some(first);
        self.subsequent_picks = Some(subsequent);
        self
    }

    /// Override the per-seat bag size for one category.
    #[must_use]
    pub fn with_bag_size(mut self, category: Category, size: usize) -> Self {
        self.bag_sizes.retain(|(c, _)| *c != category);
        self.bag_sizes.push((category, size));
        self
    }

    #[must_use]
    pub fn expansion_enabled(&self, expansion: Expansion) -> bool {
        expansion == Expansion::Base || self.expansions.contains(&expansion)
    }

    /// Check whether a catalogue component may enter the pool.
    #[must_use]
    pub fn is_eligible(&self, component: &Component) -> bool {
        self.expansion_enabled(component.expansion)
            && !self.banned_factions.iter().any(|f| *f == component.faction)
            && !self.banned_components.iter().any(|n| *n == component.name)
    }

    /// Configured bag size override for a category, if any.
    #[must_use]
    pub fn bag_size_override(&self, category: Category) -> Option<usize> {
        self.bag_sizes
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, size)| *size)
    }
}
