//! Collaborator traits for the external object store and timer facility.
//!
//! The engine owns no objects. It drives an [`ObjectStore`] that actually
//! creates, edits, and deletes them, and a [`Scheduler`] used for the one
//! deferred side effect (the physics-wake retry). Both are implemented by the
//! embedding host; tests implement them with in-memory fakes.

use std::time::Duration;

use carve_primitives::{ObjectId, PropertyPatch};
use thiserror::Error;

/// Errors reported by the object store.
///
/// The engine absorbs these during replay: a stale reference degrades to a
/// per-command no-op, everything else is logged and skipped, and the step's
/// remaining commands still run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
	/// The referenced object no longer exists.
	#[error("object {0} does not exist")]
	UnknownObject(ObjectId),
	/// The store refused the operation for its own reasons.
	#[error("store rejected the operation: {0}")]
	Rejected(String),
}

/// Mutating operations the engine needs from the object store.
///
/// Property reads are deliberately absent: capturing undo/redo data from
/// current object state is the caller's job, done before [`pre_push`].
///
/// [`pre_push`]: crate::SessionHistory::pre_push
pub trait ObjectStore {
	/// Creates an object from a captured state, returning its identifier.
	///
	/// The store may return a different id on every call, even when the state
	/// describes a previously-seen logical object.
	fn create_object(&mut self, state: &PropertyPatch) -> Result<ObjectId, StoreError>;

	/// Applies a partial-property patch to an object.
	fn set_properties(&mut self, object: ObjectId, patch: &PropertyPatch)
	-> Result<(), StoreError>;

	/// Deletes an object.
	fn delete_object(&mut self, object: ObjectId) -> Result<(), StoreError>;
}

/// Handle for a scheduled retry, issued by the [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryToken(u64);

impl RetryToken {
	/// Wraps a raw scheduler-assigned token value.
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw token value.
	pub const fn raw(self) -> u64 {
		self.0
	}
}

/// One-shot deferred task facility.
///
/// Scheduled retries are fire-and-forget from the engine's point of view: it
/// never observes the outcome, only cancels outstanding tokens on
/// [`clear`](crate::SessionHistory::clear) so tests do not leak timers.
pub trait Scheduler {
	/// Schedules a one-shot re-application of `patch` to `object` after
	/// `delay`.
	fn schedule_retry(
		&mut self,
		delay: Duration,
		object: ObjectId,
		patch: PropertyPatch,
	) -> RetryToken;

	/// Cancels a previously scheduled retry.
	///
	/// Must be a no-op for tokens that already fired or were never issued.
	fn cancel_retry(&mut self, token: RetryToken);
}
