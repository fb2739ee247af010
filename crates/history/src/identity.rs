//! The identity arena: stable internal indices for externally-owned objects.
//!
//! The store may assign a fresh [`ObjectId`] every time an object is
//! (re)created, so committed history cannot reference objects by external id
//! without every other entry that mentions the old id becoming a dangling
//! reference. Instead, each referenced object is interned once into a slab
//! slot and history stores the slot index ([`ObjectRef`]). Remapping an
//! identity is a single O(1) [`rebind`](IdentityArena::rebind); no entry is
//! ever rewritten.
//!
//! Slots are use-counted. Every stored occurrence of a reference (command
//! target or parent link) holds one use, and entries discarded by redo-tail
//! truncation, capacity eviction, or [`clear`] release theirs, so the arena
//! stays bounded by live history rather than by session lifetime.
//!
//! [`clear`]: crate::SessionHistory::clear


use carve_primitives::ObjectId;
use rustc_hash::FxHashMap;
use slab::Slab;

/// Stable internal index of an interned object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObjectRef(usize);

#[derive(Debug)]
struct Slot {
	id: ObjectId,
	uses: u32,
}

/// Use-counted map between external ids and stable internal indices.
#[derive(Debug, Default)]
pub(crate) struct IdentityArena {
	slots: Slab<Slot>,
	by_id: FxHashMap<ObjectId, ObjectRef>,
}

impl IdentityArena {
	pub fn new() -> Self {
		Self::default()
	}

	/// Interns `id`, or bumps the use count of its existing slot.
	pub fn acquire(&mut self, id: ObjectId) -> ObjectRef {
		debug_assert!(!id.is_null(), "the null id is never interned");
		if let Some(&existing) = self.by_id.get(&id) {
			self.slots[existing.0].uses += 1;
			return existing;
		}
		let key = self.slots.insert(Slot { id, uses: 1 });
		let r = ObjectRef(key);
		self.by_id.insert(id, r);
		r
	}

	/// Drops one use; frees the slot when the last use is gone.
	pub fn release(&mut self, r: ObjectRef) {
		let slot = &mut self.slots[r.0];
		slot.uses -= 1;
		if slot.uses == 0 {
			let id = slot.id;
			self.slots.remove(r.0);
			if self.by_id.get(&id) == Some(&r) {
				self.by_id.remove(&id);
			}
		}
	}

	/// Current external id of an interned object.
	pub fn resolve(&self, r: ObjectRef) -> ObjectId {
		self.slots[r.0].id
	}

	/// Looks up the slot currently bound to an external id.
	pub fn lookup(&self, id: ObjectId) -> Option<ObjectRef> {
		self.by_id.get(&id).copied()
	}

	/// Rebinds a slot to a new external id.
	///
	/// Every stored reference to `r` observes `new_id` on its next resolve.
	/// If `new_id` was bound to another slot, the newest binding wins the
	/// reverse lookup; the displaced slot still resolves to `new_id`.
	pub fn rebind(&mut self, r: ObjectRef, new_id: ObjectId) {
		let slot = &mut self.slots[r.0];
		let old = slot.id;
		if old == new_id {
			return;
		}
		slot.id = new_id;
		if self.by_id.get(&old) == Some(&r) {
			self.by_id.remove(&old);
		}
		self.by_id.insert(new_id, r);
	}

	/// Number of live slots.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Returns `true` when no slot is live.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}
}
