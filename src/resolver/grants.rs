//! Automatic grants.
//!
//! Holding a trigger component hands its owner every grant filed under
//! `(trigger name, faction)`. Grants are appended once: a build that already
//! holds a granted copy of the same name in the target category is left alone,
//! so resolution is idempotent.

use log::debug;

use crate::catalogue::{Component, ComponentCatalogue};
use crate::core::PlayerMap;
use crate::draft::FactionBuild;

/// Grants reached by holding `component`.
pub fn extras_for<C: ComponentCatalogue + ?Sized>(
    catalogue: &C,
    component: &Component,
) -> Vec<Component> {
    catalogue
        .find_trigger(&component.name, &component.faction)
        .map(|rule| rule.grants.clone())
        .unwrap_or_default()
}

/// Held copy of a grant, tagged with the trigger that reached it.
fn granted_copy(grant: &Component, trigger: &Component) -> Component {
    let mut copy = grant.clone();
    copy.dependency = None;
    copy.granted_by = Some(trigger.name.clone());
    copy
}

/// One pass over a build. Returns how many grants were appended.
fn grant_pass<C: ComponentCatalogue + ?Sized>(catalogue: &C, build: &mut FactionBuild) -> usize {
    let held: Vec<Component> = build
        .iter()
        .flat_map(|(_, list)| list.iter().cloned())
        .collect();

    let mut added = 0;
    for trigger in &held {
        for grant in extras_for(catalogue, trigger) {
            let already = build
                .get(grant.category)
                .iter()
                .any(|c| c.is_granted() && c.name == grant.name);
            if !already {
                debug!("granting {} for {}", grant, trigger.name);
                build.push(grant.category, granted_copy(&grant, trigger));
                added += 1;
            }
        }
    }
    added
}

/// Resolve grants for one build until nothing changes.
///
/// Terminates for any catalogue: every pass either appends a grant not yet
/// held or stops, and the set of grantable names is finite.
pub fn apply_extras<C: ComponentCatalogue + ?Sized>(
    catalogue: &C,
    build: &mut FactionBuild,
) -> usize {
    let mut total = 0;
    loop {
        let added = grant_pass(catalogue, build);
        if added == 0 {
            return total;
        }
        total += added;
    }
}

/// Resolve grants for every seat until nothing changes.
pub fn apply_all_extras<C: ComponentCatalogue + ?Sized>(
    catalogue: &C,
    builds: &mut PlayerMap<FactionBuild>,
) -> usize {
    builds
        .iter_mut()
        .map(|(_, build)| apply_extras(catalogue, build))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Catalogue, Category};
    use crate::core::PlayerId;

    fn catalogue() -> Catalogue {
        Catalogue::new(vec![
            Component::new("Corsair", Category::Flagship, "Mentak"),
            Component::new("Salvage Drone", Category::Mech, "Mentak").grant_for("Corsair"),
            Component::new("Scrap Yard", Category::Promissory, "Mentak").grant_for("Salvage Drone"),
            Component::new("Versatile", Category::Abilities, "Sol"),
        ])
        .unwrap()
    }

    #[test]
    fn test_extras_for() {
        let catalogue = catalogue();
        let corsair = Component::new("Corsair", Category::Flagship, "Mentak");
        let extras = extras_for(&catalogue, &corsair);

        assert_eq!(extras.len(), 1);
        assert_eq!(extras[0].name, "Salvage Drone");
        let versatile = Component::new("Versatile", Category::Abilities, "Sol");
        assert!(extras_for(&catalogue, &versatile).is_empty());
    }

    #[test]
    fn test_chained_grants_reach_fixed_point() {
        let catalogue = catalogue();
        let mut build = FactionBuild::new();
        build.push(Category::Flagship, Component::new("Corsair", Category::Flagship, "Mentak"));

        let added = apply_extras(&catalogue, &mut build);

        assert_eq!(added, 2);
        assert_eq!(build.get(Category::Mech)[0].granted_by.as_deref(), Some("Corsair"));
        assert_eq!(
            build.get(Category::Promissory)[0].granted_by.as_deref(),
            Some("Salvage Drone")
        );
        assert!(build.get(Category::Mech)[0].dependency.is_none());
    }

    #[test]
    fn test_idempotent() {
        let catalogue = catalogue();
        let mut builds: PlayerMap<FactionBuild> = PlayerMap::with_default(2);
        builds[PlayerId::new(1)].push(
            Category::Flagship,
            Component::new("Corsair", Category::Flagship, "Mentak"),
        );

        assert_eq!(apply_all_extras(&catalogue, &mut builds), 2);
        let once = builds.clone();
        assert_eq!(apply_all_extras(&catalogue, &mut builds), 0);
        assert_eq!(builds, once);
        assert!(builds[PlayerId::new(0)].is_empty());
    }

    #[test]
    fn test_self_granting_catalogue_terminates() {
        let catalogue = Catalogue::new(vec![
            Component::new("Loop", Category::Abilities, "Ouro"),
            Component::new("Loop", Category::Agents, "Ouro").grant_for("Loop"),
        ])
        .unwrap();
        let mut build = FactionBuild::new();
        build.push(Category::Abilities, Component::new("Loop", Category::Abilities, "Ouro"));

        assert_eq!(apply_extras(&catalogue, &mut build), 1);
        assert_eq!(build.total(), 2);
    }
}
