//! The session history engine: commit, replay, and identity upkeep.


use std::time::Duration;

use carve_primitives::{ActorSlot, ObjectId, PropertyPatch};
use tracing::{trace, warn};

use crate::command::{CommandBatch, EditBatch};
use crate::identity::IdentityArena;
use crate::log::{HistoryEntry, HistoryLog};
use crate::pending::PendingPair;
use crate::store::{ObjectStore, RetryToken, Scheduler, StoreError};

/// Default capacity of the committed log.
pub const MAX_HISTORY_ITEMS: usize = 100;

/// Default delay before re-applying a patch that restored an object to rest.
pub const WAKE_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Construction-time configuration for a [`SessionHistory`].
#[derive(Debug, Clone)]
pub struct HistoryConfig {
	/// Maximum number of committed entries; the oldest are evicted beyond it.
	pub max_items: usize,
	/// Delay for the physics-wake retry, or `None` to disable it.
	///
	/// Some physics engines fail to wake an object restored to exact rest
	/// under gravity; re-applying the patch shortly afterwards compensates.
	/// Whether the retry is needed depends on the engine behind the store.
	pub wake_retry_delay: Option<Duration>,
}

impl Default for HistoryConfig {
	fn default() -> Self {
		Self {
			max_items: MAX_HISTORY_ITEMS,
			wake_retry_delay: Some(WAKE_RETRY_DELAY),
		}
	}
}

/// Undo/redo command log for one editing session.
///
/// Owns the per-actor pending buffers, the bounded committed log, and the
/// identity arena. External effects go through the collaborator traits passed
/// to [`undo`](Self::undo), [`redo`](Self::redo), and [`clear`](Self::clear);
/// the engine holds no reference to the store between calls.
#[derive(Debug)]
pub struct SessionHistory {
	pending: [PendingPair; ActorSlot::COUNT],
	log: HistoryLog,
	arena: IdentityArena,
	wake_retry_delay: Option<Duration>,
	/// Tokens of scheduled retries, cancelled on [`clear`](Self::clear).
	retries: Vec<RetryToken>,
}

impl Default for SessionHistory {
	fn default() -> Self {
		Self::new(HistoryConfig::default())
	}
}

impl SessionHistory {
	/// Creates an empty history with the given configuration.
	pub fn new(config: HistoryConfig) -> Self {
		Self {
			pending: std::array::from_fn(|_| PendingPair::default()),
			log: HistoryLog::new(config.max_items),
			arena: IdentityArena::new(),
			wake_retry_delay: config.wake_retry_delay,
			retries: Vec::new(),
		}
	}

	/// Returns `true` if a committed entry is available to undo.
	pub fn has_undo(&self) -> bool {
		self.log.has_undo()
	}

	/// Returns `true` if an undone entry is available to redo.
	pub fn has_redo(&self) -> bool {
		self.log.has_redo()
	}

	/// Number of undoable entries.
	pub fn undo_len(&self) -> usize {
		self.log.undo_len()
	}

	/// Number of redoable entries.
	pub fn redo_len(&self) -> usize {
		self.log.redo_len()
	}

	/// Merges an undo/redo pair into `slot`'s pending batch.
	///
	/// Successive calls for the same object collapse per key: the undo side
	/// keeps the first-seen value, the redo side the last-seen one. Never
	/// touches the committed log.
	pub fn pre_push(&mut self, slot: ActorSlot, undo: EditBatch, redo: EditBatch) {
		trace!(
			%slot,
			undo_sets = undo.set_properties.len(),
			undo_creates = undo.create_objects.len(),
			undo_deletes = undo.delete_objects.len(),
			redo_sets = redo.set_properties.len(),
			redo_creates = redo.create_objects.len(),
			redo_deletes = redo.delete_objects.len(),
			"pre-push into pending batch"
		);
		let undo = CommandBatch::intern(undo, &mut self.arena);
		let redo = CommandBatch::intern(redo, &mut self.arena);
		self.pending[slot.index()].merge(&mut self.arena, undo, redo);
	}

	/// Commits `slot`'s pending batch as one history entry.
	///
	/// Discards any redoable entries first (history is strictly linear) and
	/// evicts the oldest entries beyond capacity. Guaranteed no-op when the
	/// slot has nothing pending: callers may push defensively without growing
	/// the log. Returns `true` if an entry was committed.
	pub fn push(&mut self, slot: ActorSlot) -> bool {
		let pair = &mut self.pending[slot.index()];
		if pair.is_empty() {
			trace!(%slot, "push with empty pending batch ignored");
			return false;
		}
		let (undo, redo) = pair.take();
		let dropped = self.log.append(HistoryEntry { undo, redo });
		for entry in dropped {
			entry.undo.release(&mut self.arena);
			entry.redo.release(&mut self.arena);
		}
		trace!(%slot, entries = self.log.len(), "pending batch committed");
		true
	}

	/// Merges one final undo/redo pair into `slot` and commits in one call.
	pub fn push_with(&mut self, slot: ActorSlot, undo: EditBatch, redo: EditBatch) -> bool {
		self.pre_push(slot, undo, redo);
		self.push(slot)
	}

	/// Applies one undo step against the store and moves the cursor back.
	///
	/// Creates run first so recreated objects are rebound before any command
	/// that references them; property restores may schedule the physics-wake
	/// retry. Stale references degrade to per-command no-ops; the step's
	/// other effects still apply. Returns `false` without side effects when
	/// there is nothing to undo.
	pub fn undo<H>(&mut self, host: &mut H) -> bool
	where
		H: ObjectStore + Scheduler,
	{
		let Some(entry) = self.log.current() else {
			trace!("undo: nothing to undo");
			return false;
		};
		replay_batch(
			&mut self.arena,
			&entry.undo,
			host,
			self.wake_retry_delay,
			&mut self.retries,
		);
		self.log.retreat();
		trace!(
			undo_len = self.log.undo_len(),
			redo_len = self.log.redo_len(),
			"undo step applied"
		);
		true
	}

	/// Applies one redo step against the store and moves the cursor forward.
	///
	/// The mirror of [`undo`](Self::undo), replaying the entry's redo side.
	/// The physics-wake retry is not scheduled here; the quirk it compensates
	/// for has only been observed on the undo direction.
	pub fn redo<H>(&mut self, host: &mut H) -> bool
	where
		H: ObjectStore + Scheduler,
	{
		let Some(entry) = self.log.upcoming() else {
			trace!("redo: nothing to redo");
			return false;
		};
		replay_batch(&mut self.arena, &entry.redo, host, None, &mut self.retries);
		self.log.advance();
		trace!(
			undo_len = self.log.undo_len(),
			redo_len = self.log.redo_len(),
			"redo step applied"
		);
		true
	}

	/// Points every historical reference to `old` at `new` instead.
	///
	/// For callers whose own store interaction reassigned an object's id.
	/// O(1): entries reference objects through the identity arena, so a
	/// single rebind covers the whole log, past and future of the cursor.
	/// Unknown or null `old` ids are ignored.
	pub fn remap(&mut self, old: ObjectId, new: ObjectId) {
		if old == new || old.is_null() {
			return;
		}
		if let Some(r) = self.arena.lookup(old) {
			self.arena.rebind(r, new);
			trace!(%old, %new, "remapped object identity");
		}
	}

	/// Drops all committed and pending history and cancels scheduled retries.
	pub fn clear(&mut self, scheduler: &mut impl Scheduler) {
		for pair in &mut self.pending {
			let (undo, redo) = pair.take();
			undo.release(&mut self.arena);
			redo.release(&mut self.arena);
		}
		for entry in self.log.drain_all() {
			entry.undo.release(&mut self.arena);
			entry.redo.release(&mut self.arena);
		}
		for token in self.retries.drain(..) {
			scheduler.cancel_retry(token);
		}
		debug_assert!(self.arena.is_empty(), "dangling identity uses after clear");
		trace!("history cleared");
	}
}

/// Replays one side of an entry against the store.
fn replay_batch<H>(
	arena: &mut IdentityArena,
	batch: &CommandBatch,
	host: &mut H,
	wake_retry_delay: Option<Duration>,
	retries: &mut Vec<RetryToken>,
) where
	H: ObjectStore + Scheduler,
{
	for record in &batch.create_objects {
		let state = record.state.resolve(arena);
		match host.create_object(&state) {
			Ok(id) => {
				trace!(
					old = %arena.resolve(record.target),
					new = %id,
					"store assigned a new identity; rebinding"
				);
				arena.rebind(record.target, id);
			}
			Err(err) => warn!(%err, "create failed; command skipped"),
		}
	}
	for cmd in &batch.set_properties {
		let object = arena.resolve(cmd.target);
		let patch = cmd.patch.resolve(arena);
		match host.set_properties(object, &patch) {
			Ok(()) => {
				if let Some(delay) = wake_retry_delay {
					if restores_rest_under_gravity(&patch) {
						let token = host.schedule_retry(delay, object, patch.clone());
						retries.push(token);
						trace!(%object, ?delay, "scheduled wake retry for restored object");
					}
				}
			}
			Err(StoreError::UnknownObject(id)) => {
				trace!(%id, "set on a missing object ignored");
			}
			Err(err) => warn!(%err, "set failed; command skipped"),
		}
	}
	for record in &batch.delete_objects {
		let object = arena.resolve(record.target);
		match host.delete_object(object) {
			Ok(()) => {}
			Err(StoreError::UnknownObject(id)) => {
				trace!(%id, "delete of a missing object ignored");
			}
			Err(err) => warn!(%err, "delete failed; command skipped"),
		}
	}
}

/// Whether a patch leaves a gravity-affected object at exact rest.
///
/// Restoring such a state can strand the object in the physics engine's
/// sleep state; the caller schedules a deferred re-application to wake it.
fn restores_rest_under_gravity(patch: &PropertyPatch) -> bool {
	let gravity_on = matches!(patch.gravity, Some(g) if !g.is_zero());
	let at_rest = matches!(patch.velocity, Some(v) if v.is_zero());
	let no_spin = patch.angular_velocity.is_none_or(|w| w.is_zero());
	gravity_on && at_rest && no_spin
}
