//! Core types: seats, RNG, configuration, errors.
//!
//! These are shared by every other module and know nothing about variants or
//! networking.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{DraftConfig, Expansion};
pub use error::DraftError;
pub use player::{PlayerId, PlayerMap};
pub use rng::{DraftRng, DraftRngState};
