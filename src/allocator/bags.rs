//! Bag allocation.
//!
//! Each category is dealt independently: shuffle the pool once, then slice it
//! into one contiguous chunk per seat. When demand exceeds supply the pool is
//! replicated first, each replica round tagged with its `copy_index` so equal
//! names in different bags stay distinguishable.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalogue::{Catalogue, Category, Component};
use crate::core::{DraftConfig, DraftRng, PlayerMap};
use crate::draft::Bag;

/// What to do when a category's pool is smaller than demand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationMode {
    /// Pad the pool with tagged copies until demand is met.
    #[default]
    Replicate,
    /// Never copy; short pools are split as evenly as possible.
    Unique,
}

/// Deal one category's pool into `players` bag slices.
///
/// Pure apart from the RNG it is handed: the same seed yields the same slices.
///
/// ```
/// use frankendraft::allocator::{allocate, AllocationMode};
/// use frankendraft::catalogue::{Category, Component};
/// use frankendraft::core::DraftRng;
///
/// let pool: Vec<_> = ["A", "B", "C"]
///     .iter()
///     .map(|n| Component::new(*n, Category::Abilities, "Sol"))
///     .collect();
///
/// let mut rng = DraftRng::new(1);
/// let bags = allocate(&pool, 4, 2, AllocationMode::Replicate, &mut rng);
/// assert_eq!(bags.len(), 4);
/// assert!(bags.iter().all(|b| b.len() == 2));
/// ```
pub fn allocate(
    pool: &[Component],
    players: usize,
    per_player_target: usize,
    mode: AllocationMode,
    rng: &mut DraftRng,
) -> Vec<Vec<Component>> {
    if pool.is_empty() || per_player_target == 0 || players == 0 {
        return vec![Vec::new(); players];
    }

    let demand = players * per_player_target;
    let supply = pool.len();

    let mut expanded: Vec<Component> = if demand <= supply || mode == AllocationMode::Unique {
        pool.to_vec()
    } else {
        let rounds = demand.div_ceil(supply);
        (0..rounds)
            .flat_map(|round| {
                pool.iter().map(move |c| {
                    let mut copy = c.clone();
                    if round > 0 {
                        copy.copy_index = Some(round as u32);
                    }
                    copy
                })
            })
            .collect()
    };

    rng.shuffle(&mut expanded);

    let sizes = slice_sizes(expanded.len(), players, per_player_target);
    let mut rest = expanded.into_iter();
    sizes
        .into_iter()
        .map(|size| rest.by_ref().take(size).collect())
        .collect()
}

/// Chunk sizes: the target for everyone when supply allows, otherwise an
/// even split with the remainder going to the first seats.
fn slice_sizes(available: usize, players: usize, target: usize) -> Vec<usize> {
    if available >= players * target {
        return vec![target; players];
    }
    let base = available / players;
    let extra = available % players;
    (0..players).map(|p| base + usize::from(p < extra)).collect()
}

/// One unique table position per seat, `1..=players`.
///
/// Never replicated.
pub fn allocate_table_positions(players: usize, rng: &mut DraftRng) -> Vec<Component> {
    let mut positions: Vec<Component> = (1..=players)
        .map(|p| Component::neutral(p.to_string(), Category::TablePosition))
        .collect();
    rng.shuffle(&mut positions);
    positions
}

/// Build every seat's bag for a draft.
///
/// Each category draws from its own RNG stream derived from the config seed.
pub fn allocate_bags(catalogue: &Catalogue, config: &DraftConfig) -> PlayerMap<Bag> {
    let variant = config.variant;
    let players = config.player_count;
    let mode = config.allocation_mode();
    let rng = DraftRng::new(config.seed);
    let mut bags: PlayerMap<Bag> = PlayerMap::with_default(players);

    for category in variant.draft_categories(config) {
        let mut stream = rng.for_context(category.as_str());

        let slices: Vec<Vec<Component>> = if category == Category::TablePosition {
            allocate_table_positions(players, &mut stream)
                .into_iter()
                .map(|position| vec![position])
                .collect()
        } else {
            let pool = catalogue.draft_pool(category, config);
            let target = variant.bag_size(category, config);
            debug!(
                "allocating {}: pool {} for {} seats x {}",
                category,
                pool.len(),
                players,
                target
            );
            allocate(&pool, players, target, mode, &mut stream)
        };

        for ((_, bag), slice) in bags.iter_mut().zip(slices) {
            bag.insert(category, slice);
        }
    }

    bags
}
