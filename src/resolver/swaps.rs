//! Swap offers.
//!
//! Offers are derived, never stored for long: they are collected by scanning
//! held components for trigger matches. Accepting one replaces the trigger in
//! place with the swap option. Refusing one records the refusal on the held
//! trigger, so an offer regenerated from the same build never comes back.

use serde::{Deserialize, Serialize};

use crate::catalogue::{Category, Component, ComponentCatalogue};
use crate::core::{DraftError, PlayerId, PlayerMap};
use crate::draft::FactionBuild;

/// An optional replacement of a held trigger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOffer {
    pub player: PlayerId,
    /// Name of the held trigger.
    pub trigger_component: String,
    pub trigger_category: Category,
    /// Slot of the trigger within its category.
    pub trigger_index: usize,
    /// Catalogue record offered in place of the trigger.
    pub swap_option: Component,
}

impl SwapOffer {
    /// Does this offer concern the same held slot as `other`?
    #[must_use]
    pub fn same_slot(&self, other: &SwapOffer) -> bool {
        self.player == other.player
            && self.trigger_category == other.trigger_category
            && self.trigger_index == other.trigger_index
    }
}

/// Swap options still open for a held component.
pub fn swap_options_for<C: ComponentCatalogue + ?Sized>(
    catalogue: &C,
    held: &Component,
) -> Vec<Component> {
    if held.is_swap {
        return Vec::new();
    }
    catalogue
        .find_trigger(&held.name, &held.faction)
        .map(|rule| {
            rule.swaps
                .iter()
                .filter(|option| !held.declined_swaps.contains(&option.name))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Offers for one build.
pub fn swap_offers_for<C: ComponentCatalogue + ?Sized>(
    catalogue: &C,
    player: PlayerId,
    build: &FactionBuild,
) -> Vec<SwapOffer> {
    let mut offers = Vec::new();
    for (category, list) in build.iter() {
        for (index, held) in list.iter().enumerate() {
            for option in swap_options_for(catalogue, held) {
                offers.push(SwapOffer {
                    player,
                    trigger_component: held.name.clone(),
                    trigger_category: category,
                    trigger_index: index,
                    swap_option: option,
                });
            }
        }
    }
    offers
}

/// Every open offer across all seats, in seat order.
pub fn collect_swap_offers<C: ComponentCatalogue + ?Sized>(
    catalogue: &C,
    builds: &PlayerMap<FactionBuild>,
) -> Vec<SwapOffer> {
    builds
        .iter()
        .flat_map(|(player, build)| swap_offers_for(catalogue, player, build))
        .collect()
}

/// Held copy of a swap option replacing `trigger`.
#[must_use]
pub fn swapped_copy(option: &Component, trigger: &Component) -> Component {
    let mut copy = option.clone();
    copy.dependency = None;
    copy.copy_index = trigger.copy_index;
    copy.is_swap = true;
    copy.swapped_from = Some(trigger.name.clone());
    copy
}

fn held_trigger<'a>(
    build: &'a FactionBuild,
    offer: &SwapOffer,
) -> Result<&'a Component, DraftError> {
    build
        .get(offer.trigger_category)
        .get(offer.trigger_index)
        .filter(|held| held.name == offer.trigger_component && !held.is_swap)
        .ok_or_else(|| DraftError::UnresolvableSwap {
            player: offer.player,
            trigger: offer.trigger_component.clone(),
        })
}

/// Accept an offer: replace the trigger in place.
///
/// Returns the replaced trigger.
pub fn resolve_swap(build: &mut FactionBuild, offer: &SwapOffer) -> Result<Component, DraftError> {
    let trigger = held_trigger(build, offer)?.clone();
    let copy = swapped_copy(&offer.swap_option, &trigger);
    build
        .replace(offer.trigger_category, offer.trigger_index, copy)
        .ok_or_else(|| DraftError::UnresolvableSwap {
            player: offer.player,
            trigger: offer.trigger_component.clone(),
        })
}

/// Refuse an offer: the build keeps its trigger, marked so the option is not
/// offered again.
pub fn refuse_swap(build: &mut FactionBuild, offer: &SwapOffer) -> Result<(), DraftError> {
    held_trigger(build, offer)?;
    if let Some(held) = build.slot_mut(offer.trigger_category, offer.trigger_index) {
        if !held.declined_swaps.contains(&offer.swap_option.name) {
            held.declined_swaps.push(offer.swap_option.name.clone());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;

    fn catalogue() -> Catalogue {
        Catalogue::new(vec![
            Component::new("Corsair", Category::Flagship, "Mentak"),
            Component::new("Pillage Fleet", Category::Flagship, "Mentak").swap_for("Corsair"),
            Component::new("Raider Fleet", Category::Flagship, "Mentak").swap_for("Corsair"),
            Component::new("Versatile", Category::Abilities, "Sol"),
        ])
        .unwrap()
    }

    fn build_with_corsair() -> FactionBuild {
        let mut build = FactionBuild::new();
        build.push(Category::Abilities, Component::new("Versatile", Category::Abilities, "Sol"));
        build.push(Category::Flagship, Component::new("Corsair", Category::Flagship, "Mentak"));
        build
    }

    #[test]
    fn test_collect_offers_one_per_option() {
        let catalogue = catalogue();
        let offers = swap_offers_for(&catalogue, PlayerId::new(2), &build_with_corsair());

        assert_eq!(offers.len(), 2);
        assert!(offers.iter().all(|o| o.trigger_component == "Corsair"));
        assert!(offers.iter().all(|o| o.player == PlayerId::new(2)));
        assert_eq!(offers[0].trigger_index, 0);
        assert!(offers[0].same_slot(&offers[1]));
    }

    #[test]
    fn test_resolve_replaces_in_place() {
        let catalogue = catalogue();
        let mut build = build_with_corsair();
        let offer = swap_offers_for(&catalogue, PlayerId::new(0), &build).remove(0);

        let old = resolve_swap(&mut build, &offer).unwrap();
        let held = &build.get(Category::Flagship)[0];

        assert_eq!(old.name, "Corsair");
        assert_eq!(held.name, "Pillage Fleet");
        assert!(held.is_swap);
        assert_eq!(held.swapped_from.as_deref(), Some("Corsair"));
        assert_eq!(build.get(Category::Flagship).len(), 1);

        // The slot no longer holds the trigger.
        assert!(matches!(
            resolve_swap(&mut build, &offer),
            Err(DraftError::UnresolvableSwap { .. })
        ));
        assert!(swap_offers_for(&catalogue, PlayerId::new(0), &build).is_empty());
    }

    #[test]
    fn test_refusal_not_reoffered() {
        let catalogue = catalogue();
        let mut build = build_with_corsair();
        let offers = swap_offers_for(&catalogue, PlayerId::new(0), &build);

        refuse_swap(&mut build, &offers[0]).unwrap();
        let again = swap_offers_for(&catalogue, PlayerId::new(0), &build);

        assert_eq!(again.len(), 1);
        assert_eq!(again[0].swap_option.name, "Raider Fleet");
        assert_eq!(build.get(Category::Flagship)[0].name, "Corsair");
    }

    #[test]
    fn test_collect_across_seats() {
        let catalogue = catalogue();
        let mut builds: PlayerMap<FactionBuild> = PlayerMap::with_default(3);
        builds[PlayerId::new(1)] = build_with_corsair();

        let offers = collect_swap_offers(&catalogue, &builds);
        assert_eq!(offers.len(), 2);
        assert!(offers.iter().all(|o| o.player == PlayerId::new(1)));
    }
}
