//! # frankendraft
//!
//! A draft orchestration engine for faction-building board game drafts.
//!
//! ## Design Principles
//!
//! 1. **One Writer**: The host owns the only canonical `DraftSession`. Every
//!    other copy is a disposable projection.
//!
//! 2. **Variants as Data**: The four rule-sets (`franken`, `power`,
//!    `rotisserie`, `frankendraz`) are a closed enum carrying their own limit
//!    tables and round sizes, chosen once per session.
//!
//! 3. **Explicit Catalogue**: Reference data is built once and handed to the
//!    engine; nothing looks components up through globals.
//!
//! ## Architecture
//!
//! - **Atomic Transitions**: Every transition is computed on a full copy of
//!   the session and swapped in whole. Rejections leave state untouched.
//!
//! - **Barrier Replication**: The host buffers one contribution per seat and
//!   advances only when all are in.
//!
//! - **Deterministic Allocation**: Bags are dealt from ChaCha8 streams derived
//!   from the config seed.
//!
//! ## Modules
//!
//! - `core`: Seats, RNG, configuration, errors
//! - `catalogue`: Categories, components, trigger tables
//! - `allocator`: Bag dealing
//! - `resolver`: Grants and swap offers
//! - `draft`: Session data model
//! - `rules`: Variants and the draft state machine
//! - `sync`: Host barrier, guest projection, wire messages

pub mod core;
pub mod catalogue;
pub mod allocator;
pub mod resolver;
pub mod draft;
pub mod rules;
pub mod sync;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap,
    DraftRng, DraftRngState,
    DraftConfig, Expansion,
    DraftError,
};

pub use crate::catalogue::{
    Catalogue, CatalogueError, Category, Component, ComponentCatalogue, TriggerRule,
};

pub use crate::allocator::{allocate, allocate_bags, AllocationMode};

pub use crate::resolver::{apply_all_extras, collect_swap_offers, extras_for, SwapOffer};

pub use crate::draft::{
    Bag, DraftSession, FactionBuild, PendingPickSet, Pick, PickRecord, SessionPhase,
};

pub use crate::rules::{CategoryLimit, DraftRules, Variant};

pub use crate::sync::{
    Contribution, GuestSession, HostSession, LoopbackChannel,
    PeerChannel, PeerId, SeatDraft, SyncError, SyncMessage,
};
