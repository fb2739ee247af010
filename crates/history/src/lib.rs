//! Undo/redo command log for a live, multi-actor object-editing session.
//!
//! The engine records create/update/delete operations against externally-owned
//! objects, batches them per actor, commits them as atomic reversible entries,
//! and replays them forward or backward while keeping cross-references
//! consistent when objects are destroyed and recreated under new identities.
//!
//! # Architecture
//!
//! ```text
//! actor input ──► pre_push (merge into pending)
//!                      │ push (commit)
//!                      ▼
//!                HistoryLog ◄── bounded, cursor-addressed entries
//!                      │ undo()/redo()
//!                      ▼
//!                IdentityArena ──► ObjectStore / Scheduler (external)
//! ```
//!
//! Historical entries never hold raw external ids. Every referenced object is
//! interned into an identity arena and entries store the stable internal
//! index; when the store assigns a fresh id on recreation a single O(1)
//! rebind makes the whole log, past and future of the cursor, observe the new
//! identity.
//!
//! The engine is single-threaded by design: "concurrent" actors are logical
//! slots interleaved by the host's event loop, and the `&mut self` receivers
//! make re-entrant calls from store callbacks unrepresentable.

mod command;
mod identity;
mod log;
mod pending;
mod session;
mod store;

pub use command::{EditBatch, ObjectSnapshot, PropertyEdit};
pub use session::{HistoryConfig, MAX_HISTORY_ITEMS, SessionHistory, WAKE_RETRY_DELAY};
pub use store::{ObjectStore, RetryToken, Scheduler, StoreError};
