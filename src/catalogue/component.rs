//! Draftable components and their categories.
//!
//! A `Component` is the immutable catalogue record of one draftable item
//! (an ability, a flagship, a tile, ...). Held copies in bags and builds are
//! clones of that record, optionally tagged with provenance: the copy round
//! that padded a short pool, or the trigger that swapped or granted it.

use serde::{Deserialize, Serialize};

use crate::core::Expansion;

/// Component category.
///
/// The faction-owned item categories, the neutral tiles, the table position
/// and the synthetic `Faction` meta-category drafted by `frankendraz`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Abilities,
    FactionTechs,
    Agents,
    Commanders,
    Heroes,
    Promissory,
    Flagship,
    Mech,
    StartingTechs,
    StartingFleet,
    Commodities,
    BlueTile,
    RedTile,
    HomeSystem,
    Breakthrough,
    TablePosition,
    /// A whole faction, drafted as a single item.
    #[serde(rename = "factions")]
    Faction,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 17] = [
        Category::Abilities,
        Category::FactionTechs,
        Category::Agents,
        Category::Commanders,
        Category::Heroes,
        Category::Promissory,
        Category::Flagship,
        Category::Mech,
        Category::StartingTechs,
        Category::StartingFleet,
        Category::Commodities,
        Category::BlueTile,
        Category::RedTile,
        Category::HomeSystem,
        Category::Breakthrough,
        Category::TablePosition,
        Category::Faction,
    ];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Abilities => "abilities",
            Category::FactionTechs => "faction_techs",
            Category::Agents => "agents",
            Category::Commanders => "commanders",
            Category::Heroes => "heroes",
            Category::Promissory => "promissory",
            Category::Flagship => "flagship",
            Category::Mech => "mech",
            Category::StartingTechs => "starting_techs",
            Category::StartingFleet => "starting_fleet",
            Category::Commodities => "commodities",
            Category::BlueTile => "blue_tile",
            Category::RedTile => "red_tile",
            Category::HomeSystem => "home_system",
            Category::Breakthrough => "breakthrough",
            Category::TablePosition => "table_position",
            Category::Faction => "factions",
        }
    }

    /// Is this a faction-owned item category?
    #[must_use]
    pub const fn is_faction_item(self) -> bool {
        !matches!(
            self,
            Category::BlueTile | Category::RedTile | Category::TablePosition | Category::Faction
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a dependent component reaches a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Optional replacement of the trigger, accepted or refused by its holder.
    Swap,
    /// Automatic extra handed to whoever holds the trigger.
    Grant,
}

/// Marks a catalogue component as reachable only through a trigger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the component that triggers this one (same faction).
    pub trigger: String,
    pub kind: DependencyKind,
}

/// A draftable component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Name, unique within a faction + category pair.
    pub name: String,

    pub category: Category,

    /// Owning faction. Empty for neutral tiles and table positions.
    #[serde(default)]
    pub faction: String,

    #[serde(default)]
    pub expansion: Expansion,

    /// Replica round when the allocator padded a short pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_index: Option<u32>,

    /// Set on catalogue records only reachable through a trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,

    /// Held copy that replaced a trigger through an accepted swap.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_swap: bool,

    /// Name of the trigger this copy replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swapped_from: Option<String>,

    /// Name of the held trigger that granted this copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<String>,

    /// Swap options its holder has refused.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declined_swaps: Vec<String>,
}

impl Component {
    /// Create a base-game component with no dependency metadata.
    pub fn new(name: impl Into<String>, category: Category, faction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            faction: faction.into(),
            expansion: Expansion::Base,
            copy_index: None,
            dependency: None,
            is_swap: false,
            swapped_from: None,
            granted_by: None,
            declined_swaps: Vec::new(),
        }
    }

    /// Create a neutral component (tiles, table positions).
    pub fn neutral(name: impl Into<String>, category: Category) -> Self {
        Self::new(name, category, "")
    }

    #[must_use]
    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    /// Mark as a swap option offered to holders of `trigger`.
    #[must_use]
    pub fn swap_for(mut self, trigger: impl Into<String>) -> Self {
        self.dependency = Some(Dependency {
            trigger: trigger.into(),
            kind: DependencyKind::Swap,
        });
        self
    }

    /// Mark as an automatic grant to holders of `trigger`.
    #[must_use]
    pub fn grant_for(mut self, trigger: impl Into<String>) -> Self {
        self.dependency = Some(Dependency {
            trigger: trigger.into(),
            kind: DependencyKind::Grant,
        });
        self
    }

    #[must_use]
    pub fn with_copy_index(mut self, copy_index: u32) -> Self {
        self.copy_index = Some(copy_index);
        self
    }

    /// Is this record only reachable through a trigger?
    #[must_use]
    pub fn is_dependent(&self) -> bool {
        self.dependency.is_some()
    }

    /// Was this copy granted automatically?
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.granted_by.is_some()
    }

    /// Same catalogue record, ignoring copy tags and provenance.
    #[must_use]
    pub fn same_record(&self, other: &Component) -> bool {
        self.name == other.name && self.faction == other.faction && self.category == other.category
    }

    /// Same catalogue record and same copy round.
    #[must_use]
    pub fn same_identity(&self, other: &Component) -> bool {
        self.same_record(other) && self.copy_index == other.copy_index
    }

    /// Does this copy name `trigger` as the component it was swapped from or
    /// granted by?
    #[must_use]
    pub fn depends_on(&self, trigger: &str) -> bool {
        self.swapped_from.as_deref() == Some(trigger) || self.granted_by.as_deref() == Some(trigger)
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.faction.is_empty() {
            write!(f, "{}", self.name)?;
        } else {
            write!(f, "{} ({})", self.name, self.faction)?;
        }
        if let Some(copy) = self.copy_index {
            write!(f, " #{}", copy)?;
        }
        Ok(())
    }
}
