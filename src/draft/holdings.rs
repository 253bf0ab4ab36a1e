//! Per-seat holdings: the bag a player drafts from and the faction they build.
//!
//! Both are ordered lists of components keyed by category. A `Bag` only
//! shrinks during a round; a `FactionBuild` grows through picks and build
//! moves, shrinks through reduction, and has slots replaced by swaps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalogue::{Category, Component};

/// A player's private pool of not-yet-picked components.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bag {
    items: BTreeMap<Category, Vec<Component>>,
}

impl Bag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Components of a category, in bag order.
    #[must_use]
    pub fn get(&self, category: Category) -> &[Component] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.get(category).len()
    }

    /// Replace the list of a category.
    pub fn insert(&mut self, category: Category, components: Vec<Component>) {
        self.items.insert(category, components);
    }

    pub fn push(&mut self, category: Category, component: Component) {
        self.items.entry(category).or_default().push(component);
    }

    #[must_use]
    pub fn contains(&self, category: Category, component: &Component) -> bool {
        self.get(category).iter().any(|c| c.same_identity(component))
    }

    /// Remove the component with this identity, if present.
    pub fn take(&mut self, category: Category, component: &Component) -> Option<Component> {
        let list = self.items.get_mut(&category)?;
        let index = list.iter().position(|c| c.same_identity(component))?;
        Some(list.remove(index))
    }

    /// Remove the component at a slot.
    pub fn take_at(&mut self, category: Category, index: usize) -> Option<Component> {
        let list = self.items.get_mut(&category)?;
        (index < list.len()).then(|| list.remove(index))
    }

    /// Categories with their lists, including emptied ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Component])> {
        self.items.iter().map(|(c, list)| (*c, list.as_slice()))
    }

    /// Total components across categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Components a player has committed to their faction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionBuild {
    items: BTreeMap<Category, Vec<Component>>,
}

impl FactionBuild {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, category: Category) -> &[Component] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Components counted against category limits.
    ///
    /// Granted extras ride along with their trigger and are not counted.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.get(category).iter().filter(|c| !c.is_granted()).count()
    }

    pub fn push(&mut self, category: Category, component: Component) {
        self.items.entry(category).or_default().push(component);
    }

    /// Replace the component at a slot, keeping the list size.
    pub fn replace(
        &mut self,
        category: Category,
        index: usize,
        component: Component,
    ) -> Option<Component> {
        let slot = self.items.get_mut(&category)?.get_mut(index)?;
        Some(std::mem::replace(slot, component))
    }

    pub fn slot_mut(&mut self, category: Category, index: usize) -> Option<&mut Component> {
        self.items.get_mut(&category)?.get_mut(index)
    }

    /// Remove the component at a slot.
    pub fn remove_at(&mut self, category: Category, index: usize) -> Option<Component> {
        let list = self.items.get_mut(&category)?;
        (index < list.len()).then(|| list.remove(index))
    }

    /// Remove a slot together with everything swapped in or granted because
    /// of it, transitively.
    ///
    /// Returns every removed component, the requested one first.
    pub fn remove_with_cascade(
        &mut self,
        category: Category,
        index: usize,
    ) -> Option<Vec<Component>> {
        let first = self.remove_at(category, index)?;
        let mut removed = vec![first];
        let mut cursor = 0;

        while cursor < removed.len() {
            let trigger = removed[cursor].name.clone();
            for list in self.items.values_mut() {
                let mut i = 0;
                while i < list.len() {
                    if list[i].depends_on(&trigger) {
                        removed.push(list.remove(i));
                    } else {
                        i += 1;
                    }
                }
            }
            cursor += 1;
        }

        Some(removed)
    }

    /// Drop a whole category, returning what it held.
    pub fn strip(&mut self, category: Category) -> Vec<Component> {
        self.items.remove(&category).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Component])> {
        self.items.iter().map(|(c, list)| (*c, list.as_slice()))
    }

    /// Total components across categories, granted extras included.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ability(name: &str) -> Component {
        Component::new(name, Category::Abilities, "Sol")
    }

    #[test]
    fn test_bag_take_by_identity() {
        let mut bag = Bag::new();
        bag.insert(
            Category::Abilities,
            vec![ability("Versatile"), ability("Versatile").with_copy_index(1)],
        );

        let copy = ability("Versatile").with_copy_index(1);
        assert_eq!(bag.take(Category::Abilities, &copy), Some(copy.clone()));
        assert_eq!(bag.count(Category::Abilities), 1);
        assert!(bag.take(Category::Abilities, &copy).is_none());
        assert!(bag.take(Category::Mech, &copy).is_none());
    }

    #[test]
    fn test_build_count_ignores_grants() {
        let mut build = FactionBuild::new();
        build.push(Category::Mech, Component::new("ZS Thunderbolt", Category::Mech, "Sol"));
        let mut granted = Component::new("Salvage Drone", Category::Mech, "Mentak");
        granted.granted_by = Some("Corsair".into());
        build.push(Category::Mech, granted);

        assert_eq!(build.count(Category::Mech), 1);
        assert_eq!(build.get(Category::Mech).len(), 2);
        assert_eq!(build.total(), 2);
    }

    #[test]
    fn test_cascade_removes_dependents_transitively() {
        let mut build = FactionBuild::new();
        build.push(Category::Flagship, Component::new("Corsair", Category::Flagship, "Mentak"));
        let mut swapped = Component::new("Pillage Fleet", Category::Abilities, "Mentak");
        swapped.is_swap = true;
        swapped.swapped_from = Some("Corsair".into());
        build.push(Category::Abilities, ability("Versatile"));
        build.push(Category::Abilities, swapped);
        let mut granted = Component::new("Plunder", Category::Promissory, "Mentak");
        granted.granted_by = Some("Pillage Fleet".into());
        build.push(Category::Promissory, granted);

        let removed = build.remove_with_cascade(Category::Flagship, 0).unwrap();
        let names: Vec<_> = removed.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Corsair", "Pillage Fleet", "Plunder"]);
        assert_eq!(build.get(Category::Abilities).len(), 1);
        assert!(build.get(Category::Promissory).is_empty());
    }

    #[test]
    fn test_replace_keeps_size() {
        let mut build = FactionBuild::new();
        build.push(Category::Abilities, ability("A"));
        build.push(Category::Abilities, ability("B"));

        let old = build.replace(Category::Abilities, 1, ability("C")).unwrap();
        assert_eq!(old.name, "B");
        assert_eq!(build.get(Category::Abilities)[1].name, "C");
        assert_eq!(build.get(Category::Abilities).len(), 2);
        assert!(build.replace(Category::Abilities, 5, ability("D")).is_none());
    }

    #[test]
    fn test_strip() {
        let mut build = FactionBuild::new();
        build.push(Category::Faction, Component::new("Sol", Category::Faction, "Sol"));
        build.push(Category::Abilities, ability("A"));

        assert_eq!(build.strip(Category::Faction).len(), 1);
        assert!(build.get(Category::Faction).is_empty());
        assert_eq!(build.total(), 1);
    }
}
