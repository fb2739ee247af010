//! Reversible command shapes and the batches that group them.
//!
//! Callers speak in external identifiers: an [`EditBatch`] references objects
//! by [`ObjectId`]. On intake the engine interns every reference into the
//! identity arena and stores [`CommandBatch`]es of arena-indexed commands, so
//! committed history never holds a raw external id.

use carve_primitives::{ObjectId, PropertyPatch};
use smallvec::SmallVec;

use crate::identity::{IdentityArena, ObjectRef};

/// A partial-property edit of one object, as captured by the caller.
///
/// Used on the undo side to restore pre-gesture state and on the redo side to
/// re-reach post-gesture state.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEdit {
	/// The edited object.
	pub object: ObjectId,
	/// The keys to restore and their values.
	pub patch: PropertyPatch,
}

/// A full captured object state, keyed by the id the caller saw.
///
/// Create records carry the state an object should be (re)created with; delete
/// records carry the state at deletion time so undoing the delete can recreate
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSnapshot {
	/// The object the snapshot was taken from.
	pub object: ObjectId,
	/// Full property state at capture time.
	pub state: PropertyPatch,
}

/// One side (undo or redo) of a caller-supplied batch.
#[derive(Debug, Clone, Default)]
pub struct EditBatch {
	/// Partial-property restorations.
	pub set_properties: Vec<PropertyEdit>,
	/// Objects to create when this side replays.
	pub create_objects: Vec<ObjectSnapshot>,
	/// Objects to delete when this side replays.
	pub delete_objects: Vec<ObjectSnapshot>,
}

impl EditBatch {
	/// A batch holding a single property edit.
	pub fn set(object: ObjectId, patch: PropertyPatch) -> Self {
		Self {
			set_properties: vec![PropertyEdit { object, patch }],
			..Self::default()
		}
	}

	/// A batch holding a single create record.
	pub fn create(object: ObjectId, state: PropertyPatch) -> Self {
		Self {
			create_objects: vec![ObjectSnapshot { object, state }],
			..Self::default()
		}
	}

	/// A batch holding a single delete record.
	pub fn delete(object: ObjectId, state: PropertyPatch) -> Self {
		Self {
			delete_objects: vec![ObjectSnapshot { object, state }],
			..Self::default()
		}
	}

	/// Returns `true` if the batch carries no commands.
	pub fn is_empty(&self) -> bool {
		self.set_properties.is_empty()
			&& self.create_objects.is_empty()
			&& self.delete_objects.is_empty()
	}
}

/// Parent reference of a stored patch, resolved through the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParentLink {
	/// Detach from any parent ([`ObjectId::NULL`] on the wire).
	Detach,
	/// Reparent under the referenced object.
	To(ObjectRef),
}

impl ParentLink {
	/// Releases the arena use held by a `To` link.
	pub fn release(self, arena: &mut IdentityArena) {
		if let ParentLink::To(parent) = self {
			arena.release(parent);
		}
	}
}

/// A [`PropertyPatch`] with its cross-reference key lifted into the arena.
///
/// `base.parent` is always `None`; the reference lives in `parent` so a
/// rebind of the referenced object is observed without touching the patch.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredPatch {
	pub base: PropertyPatch,
	pub parent: Option<ParentLink>,
}

impl StoredPatch {
	/// Interns a caller patch, acquiring a use of any referenced parent.
	pub fn intern(mut patch: PropertyPatch, arena: &mut IdentityArena) -> Self {
		let parent = patch.parent.take().map(|id| {
			if id.is_null() {
				ParentLink::Detach
			} else {
				ParentLink::To(arena.acquire(id))
			}
		});
		Self { base: patch, parent }
	}

	/// Produces the outgoing patch with the parent resolved to its current id.
	pub fn resolve(&self, arena: &IdentityArena) -> PropertyPatch {
		let mut out = self.base.clone();
		out.parent = self.parent.map(|link| match link {
			ParentLink::Detach => ObjectId::NULL,
			ParentLink::To(parent) => arena.resolve(parent),
		});
		out
	}

	/// Releases the parent use held by this patch.
	pub fn release(self, arena: &mut IdentityArena) {
		if let Some(link) = self.parent {
			link.release(arena);
		}
	}
}

/// A stored partial-property command.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SetProperties {
	pub target: ObjectRef,
	pub patch: StoredPatch,
}

/// A stored create or delete record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObjectRecord {
	pub target: ObjectRef,
	pub state: StoredPatch,
}

/// One side of a pending or committed history entry, arena-indexed.
///
/// Within a replay, creates run (and rebind their targets) before sets and
/// deletes; the three lists are otherwise independent of each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CommandBatch {
	pub set_properties: SmallVec<[SetProperties; 2]>,
	pub create_objects: SmallVec<[ObjectRecord; 1]>,
	pub delete_objects: SmallVec<[ObjectRecord; 1]>,
}

impl CommandBatch {
	/// Interns a caller batch, acquiring a use per stored reference.
	pub fn intern(batch: EditBatch, arena: &mut IdentityArena) -> Self {
		let set_properties = batch
			.set_properties
			.into_iter()
			.map(|edit| SetProperties {
				target: arena.acquire(edit.object),
				patch: StoredPatch::intern(edit.patch, arena),
			})
			.collect();
		let create_objects = batch
			.create_objects
			.into_iter()
			.map(|snapshot| ObjectRecord {
				target: arena.acquire(snapshot.object),
				state: StoredPatch::intern(snapshot.state, arena),
			})
			.collect();
		let delete_objects = batch
			.delete_objects
			.into_iter()
			.map(|snapshot| ObjectRecord {
				target: arena.acquire(snapshot.object),
				state: StoredPatch::intern(snapshot.state, arena),
			})
			.collect();
		Self {
			set_properties,
			create_objects,
			delete_objects,
		}
	}

	/// Returns `true` if the batch carries no commands.
	pub fn is_empty(&self) -> bool {
		self.set_properties.is_empty()
			&& self.create_objects.is_empty()
			&& self.delete_objects.is_empty()
	}

	/// Releases every arena use held by this batch.
	pub fn release(self, arena: &mut IdentityArena) {
		for cmd in self.set_properties {
			arena.release(cmd.target);
			cmd.patch.release(arena);
		}
		for record in self.create_objects {
			arena.release(record.target);
			record.state.release(arena);
		}
		for record in self.delete_objects {
			arena.release(record.target);
			record.state.release(arena);
		}
	}
}
