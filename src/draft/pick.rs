//! Picks: staged selections and committed history.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalogue::{Category, Component};
use crate::core::PlayerId;

/// One chosen component and the category it is drafted into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub category: Category,
    pub component: Component,
}

impl Pick {
    #[must_use]
    pub fn new(category: Category, component: Component) -> Self {
        Self { category, component }
    }
}

/// Picks chosen this round but not yet committed.
///
/// Private to its owner until submitted. A round never asks for more than a
/// handful of picks, so the set lives inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingPickSet {
    picks: SmallVec<[Pick; 4]>,
}

impl PendingPickSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Number of staged picks in a category.
    #[must_use]
    pub fn staged_in(&self, category: Category) -> usize {
        self.picks.iter().filter(|p| p.category == category).count()
    }

    /// Is this exact component already staged?
    #[must_use]
    pub fn contains(&self, component: &Component) -> bool {
        self.picks.iter().any(|p| p.component.same_identity(component))
    }

    pub fn push(&mut self, pick: Pick) {
        self.picks.push(pick);
    }

    /// Retract a staged pick.
    pub fn remove(&mut self, index: usize) -> Option<Pick> {
        (index < self.picks.len()).then(|| self.picks.remove(index))
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pick> {
        self.picks.iter()
    }

    /// Drain the staged picks in staging order.
    pub fn take(&mut self) -> Vec<Pick> {
        self.picks.drain(..).collect()
    }
}

impl FromIterator<Pick> for PendingPickSet {
    fn from_iter<I: IntoIterator<Item = Pick>>(iter: I) -> Self {
        Self {
            picks: iter.into_iter().collect(),
        }
    }
}

/// A committed pick, kept for the session's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRecord {
    pub player: PlayerId,
    pub round: u32,
    pub category: Category,
    pub component: Component,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(name: &str, category: Category) -> Pick {
        Pick::new(category, Component::new(name, category, "Sol"))
    }

    #[test]
    fn test_staged_in_counts_per_category() {
        let set: PendingPickSet = vec![
            pick("Versatile", Category::Abilities),
            pick("Evelyn DeLouis", Category::Agents),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.staged_in(Category::Abilities), 1);
        assert_eq!(set.staged_in(Category::Mech), 0);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut set = PendingPickSet::new();
        set.push(pick("Versatile", Category::Abilities));

        assert!(set.remove(3).is_none());
        assert_eq!(set.remove(0).unwrap().component.name, "Versatile");
        assert!(set.is_empty());
    }

    #[test]
    fn test_take_drains_in_order() {
        let mut set = PendingPickSet::new();
        set.push(pick("A", Category::Abilities));
        set.push(pick("B", Category::Agents));

        let names: Vec<_> = set.take().into_iter().map(|p| p.component.name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(set.is_empty());
    }
}
