//! Bag allocator.
//!
//! Deals the shared pool into one private bag per seat for each drafted
//! category. See `bags` for the dealing rules.

mod bags;

pub use bags::{allocate, allocate_bags, allocate_table_positions, AllocationMode};
