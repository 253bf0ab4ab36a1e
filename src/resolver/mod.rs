//! Dependency resolver: grants and swap offers.
//!
//! Both are catalogue lookups keyed by `(trigger name, faction)`:
//!
//! - **Grants** are automatic and resolved to a fixed point
//!   (`apply_all_extras`).
//! - **Swaps** are optional: `collect_swap_offers` lists them, and each is
//!   accepted (`resolve_swap`) or refused (`refuse_swap`) by its owner.

mod grants;
mod swaps;

pub use grants::{apply_all_extras, apply_extras, extras_for};
pub use swaps::{
    collect_swap_offers, refuse_swap, resolve_swap, swap_offers_for, swap_options_for, swapped_copy,
    SwapOffer,
};
