//! Draft session data model.
//!
//! ## Key Types
//!
//! - `SessionPhase`: `draft -> build -> reduction -> swap -> complete`
//! - `DraftSession`: Canonical state (bags, builds, cycle, history)
//! - `Bag` / `FactionBuild`: Per-seat holdings keyed by category
//! - `Pick` / `PendingPickSet`: Staged selections for the current round
//! - `PickRecord`: Committed pick history

pub mod holdings;
pub mod pick;
pub mod state;

pub use holdings::{Bag, FactionBuild};
pub use pick::{PendingPickSet, Pick, PickRecord};
pub use state::{DraftSession, SessionPhase};
