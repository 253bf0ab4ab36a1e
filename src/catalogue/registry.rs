//! Component catalogue with trigger tables.
//!
//! The `Catalogue` is built once from static data and shared immutably by the
//! allocator, the resolver and the state machine. Dependent components (swap
//! options and grants) never enter the draft pool: they are filed under the
//! trigger that reaches them, keyed by `(trigger name, faction)`.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::component::{Category, Component, DependencyKind};
use crate::core::DraftConfig;

/// Errors raised while building a catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("duplicate component '{name}' in {category} for faction '{faction}'")]
    Duplicate {
        category: Category,
        faction: String,
        name: String,
    },

    #[error("malformed catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Static trigger relationships for one held component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerRule {
    /// Name of the held trigger.
    pub trigger: String,
    pub faction: String,
    /// Optional replacements for the trigger.
    pub swaps: Vec<Component>,
    /// Automatic extras for holding the trigger.
    pub grants: Vec<Component>,
}

/// Read-only lookup surface the engine needs from reference data.
pub trait ComponentCatalogue {
    /// Draftable components of a category, dependent records excluded.
    fn by_category(&self, category: Category) -> &[Component];

    /// Trigger rule for a held component, if it triggers anything.
    fn find_trigger(&self, name: &str, faction: &str) -> Option<&TriggerRule>;
}

/// Catalogue of draftable components.
///
/// ## Example
///
/// ```
/// use frankendraft::catalogue::{Catalogue, Category, Component, ComponentCatalogue};
///
/// let catalogue = Catalogue::new(vec![
///     Component::new("Corsair", Category::Flagship, "Mentak"),
///     Component::new("Pillage Fleet", Category::Flagship, "Mentak").swap_for("Corsair"),
/// ])
/// .unwrap();
///
/// assert_eq!(catalogue.by_category(Category::Flagship).len(), 1);
/// let rule = catalogue.find_trigger("Corsair", "Mentak").unwrap();
/// assert_eq!(rule.swaps[0].name, "Pillage Fleet");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    by_category: FxHashMap<Category, Vec<Component>>,
    triggers: FxHashMap<(String, String), TriggerRule>,
    len: usize,
}

impl Catalogue {
    /// Build a catalogue, rejecting duplicate identities.
    pub fn new(components: Vec<Component>) -> Result<Self, CatalogueError> {
        let mut catalogue = Self::default();
        for component in components {
            catalogue.register(component)?;
        }
        Ok(catalogue)
    }

    /// Parse a catalogue from a JSON array of components.
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let components: Vec<Component> = serde_json::from_str(json)?;
        Self::new(components)
    }

    fn register(&mut self, component: Component) -> Result<(), CatalogueError> {
        if self.contains(component.category, &component.faction, &component.name) {
            return Err(CatalogueError::Duplicate {
                category: component.category,
                faction: component.faction,
                name: component.name,
            });
        }

        self.len += 1;
        match component.dependency.clone() {
            Some(dependency) => {
                let key = (dependency.trigger.clone(), component.faction.clone());
                let rule = self.triggers.entry(key).or_insert_with(|| TriggerRule {
                    trigger: dependency.trigger,
                    faction: component.faction.clone(),
                    ..TriggerRule::default()
                });
                match dependency.kind {
                    DependencyKind::Swap => rule.swaps.push(component),
                    DependencyKind::Grant => rule.grants.push(component),
                }
            }
            None => self
                .by_category
                .entry(component.category)
                .or_default()
                .push(component),
        }
        Ok(())
    }

    /// Check whether a record with this identity is registered, dependent
    /// records included.
    #[must_use]
    pub fn contains(&self, category: Category, faction: &str, name: &str) -> bool {
        self.get(category, faction, name).is_some()
    }

    /// Look up a record by identity, dependent records included.
    #[must_use]
    pub fn get(&self, category: Category, faction: &str, name: &str) -> Option<&Component> {
        let matches = |c: &&Component| {
            c.category == category && c.faction == faction && c.name == name
        };
        self.by_category
            .get(&category)
            .and_then(|list| list.iter().find(matches))
            .or_else(|| {
                self.triggers
                    .values()
                    .flat_map(|rule| rule.swaps.iter().chain(rule.grants.iter()))
                    .find(matches)
            })
    }

    /// Number of registered records, dependent records included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sorted names of every faction owning at least one draftable item.
    #[must_use]
    pub fn factions(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_category
            .iter()
            .filter(|(category, _)| category.is_faction_item())
            .flat_map(|(_, list)| list.iter().map(|c| c.faction.clone()))
            .filter(|f| !f.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Draftable items owned by a faction, in category order.
    pub fn faction_components<'a>(
        &'a self,
        faction: &'a str,
    ) -> impl Iterator<Item = &'a Component> + 'a {
        Category::ALL
            .into_iter()
            .filter(|c| c.is_faction_item())
            .flat_map(move |category| self.by_category(category).iter())
            .filter(move |c| c.faction == faction)
    }

    /// Pool of a category for a draft, after expansion toggles and bans.
    ///
    /// `Faction` yields one synthetic item per faction with at least one
    /// eligible component. `TablePosition` is never drawn from the catalogue.
    #[must_use]
    pub fn draft_pool(&self, category: Category, config: &DraftConfig) -> Vec<Component> {
        match category {
            Category::TablePosition => Vec::new(),
            Category::Faction => self
                .factions()
                .into_iter()
                .filter_map(|faction| {
                    let first = self
                        .faction_components(&faction)
                        .find(|c| config.is_eligible(c))?;
                    Some(
                        Component::new(faction.clone(), Category::Faction, faction.clone())
                            .with_expansion(first.expansion),
                    )
                })
                .collect(),
            _ => self
                .by_category(category)
                .iter()
                .filter(|c| config.is_eligible(c))
                .cloned()
                .collect(),
        }
    }
}

impl ComponentCatalogue for Catalogue {
    fn by_category(&self, category: Category) -> &[Component] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn find_trigger(&self, name: &str, faction: &str) -> Option<&TriggerRule> {
        self.triggers.get(&(name.to_string(), faction.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Expansion;
    use crate::rules::Variant;

    fn sample() -> Catalogue {
        Catalogue::new(vec![
            Component::new("Mitosis", Category::Abilities, "Arborec"),
            Component::new("Versatile", Category::Abilities, "Sol"),
            Component::new("Orbital Drop", Category::Abilities, "Sol"),
            Component::new("Awaken", Category::Abilities, "Titans")
                .with_expansion(Expansion::ProphecyOfKings),
            Component::new("Corsair", Category::Flagship, "Mentak"),
            Component::new("Pillage Fleet", Category::Flagship, "Mentak").swap_for("Corsair"),
            Component::new("Salvage Drone", Category::Mech, "Mentak").grant_for("Corsair"),
            Component::neutral("Mecatol Rex", Category::BlueTile),
        ])
        .unwrap()
    }

    #[test]
    fn test_dependent_records_stay_out_of_pool() {
        let catalogue = sample();

        assert_eq!(catalogue.len(), 8);
        assert_eq!(catalogue.by_category(Category::Flagship).len(), 1);
        assert!(catalogue.by_category(Category::Mech).is_empty());
        assert!(catalogue.contains(Category::Mech, "Mentak", "Salvage Drone"));
    }

    #[test]
    fn test_find_trigger() {
        let catalogue = sample();
        let rule = catalogue.find_trigger("Corsair", "Mentak").unwrap();

        assert_eq!(rule.swaps.len(), 1);
        assert_eq!(rule.grants.len(), 1);
        assert_eq!(rule.grants[0].name, "Salvage Drone");
        assert!(catalogue.find_trigger("Corsair", "Sol").is_none());
        assert!(catalogue.find_trigger("Mitosis", "Arborec").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = Catalogue::new(vec![
            Component::new("Mitosis", Category::Abilities, "Arborec"),
            Component::new("Mitosis", Category::Abilities, "Arborec"),
        ]);
        assert!(matches!(result, Err(CatalogueError::Duplicate { .. })));

        // Same name in another faction is a different identity.
        let ok = Catalogue::new(vec![
            Component::new("Mitosis", Category::Abilities, "Arborec"),
            Component::new("Mitosis", Category::Abilities, "Sol"),
        ]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_factions_sorted_and_deduped() {
        let catalogue = sample();
        assert_eq!(catalogue.factions(), vec!["Arborec", "Mentak", "Sol", "Titans"]);
    }

    #[test]
    fn test_draft_pool_filters() {
        let catalogue = sample();
        let config = DraftConfig::new(Variant::Franken, 2).ban_component("Orbital Drop");

        let pool = catalogue.draft_pool(Category::Abilities, &config);
        let names: Vec<_> = pool.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Mitosis", "Versatile"]);

        assert!(catalogue.draft_pool(Category::TablePosition, &config).is_empty());
    }

    #[test]
    fn test_faction_pool_skips_ineligible_factions() {
        let catalogue = sample();
        let config = DraftConfig::new(Variant::Frankendraz, 2).ban_faction("Sol");

        let pool = catalogue.draft_pool(Category::Faction, &config);
        let names: Vec<_> = pool.iter().map(|c| c.name.as_str()).collect();

        // Titans needs Prophecy of Kings, Sol is banned.
        assert_eq!(names, vec!["Arborec", "Mentak"]);
        assert!(pool.iter().all(|c| c.category == Category::Faction));
    }

    #[test]
    fn test_from_json() {
        let catalogue = Catalogue::from_json(
            r#"[
                {"name":"Mitosis","category":"abilities","faction":"Arborec"},
                {"name":"Pillage Fleet","category":"flagship","faction":"Mentak",
                 "dependency":{"trigger":"Corsair","kind":"swap"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalogue.len(), 2);
        assert!(catalogue.find_trigger("Corsair", "Mentak").is_some());
    }
}
