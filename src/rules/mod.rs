//! Draft rules: variants and the state machine.
//!
//! `Variant` carries everything that differs between rule-sets (limit tables,
//! round sizes, rotation, build phase). `DraftRules` applies picks, removals,
//! swaps and snapshots to a `DraftSession` and advances its phase:
//!
//! ```text
//! draft -> [build] -> [reduction] -> [swap] -> complete
//! ```

pub mod engine;
pub mod variant;

pub use engine::DraftRules;
pub use variant::{CategoryLimit, Variant};
