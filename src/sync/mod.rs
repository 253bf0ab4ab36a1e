//! Peer synchronization: host-authoritative replication.
//!
//! The host holds the canonical `DraftSession` and collects one contribution
//! per seat per cycle (a pick set during `draft`, a faction snapshot
//! afterwards) before advancing it and broadcasting the result. Guests hold a
//! read-only projection plus a private working copy.
//!
//! ## Key Types
//!
//! - `HostSession`: Seat mapping, contribution barrier, state broadcast
//! - `GuestSession`: Snapshot projection and local staging
//! - `SeatDraft`: One seat's working copy, shared by guests and the host
//! - `SyncMessage`: `PICK`, `FACTION_UPDATE` and `STATE` envelopes
//! - `PeerChannel`: Outbound transport, with an in-memory `LoopbackChannel`
//!
//! Everything is single-threaded and driven by inbound messages; nothing
//! blocks.

mod channel;
mod error;
mod guest;
mod host;
mod message;
mod seat;

pub use channel::{Envelope, LoopbackChannel, PeerChannel};
pub use error::SyncError;
pub use guest::GuestSession;
pub use host::HostSession;
pub use message::{Contribution, PeerId, SyncMessage};
pub use seat::SeatDraft;
