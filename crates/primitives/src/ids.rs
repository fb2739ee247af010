//! Identifier types for scene objects.

use std::fmt;

/// External identifier assigned by the object store.
///
/// The store owns identifier allocation and may assign a different id every
/// time an object is (re)created, even for "the same" logical object. Callers
/// must treat ids as opaque referents that can be invalidated by deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
	/// The reserved null identifier.
	///
	/// Used as a `parent` value to mean "no parent"; never identifies a live
	/// object.
	pub const NULL: ObjectId = ObjectId(0);

	/// Wraps a raw store-assigned identifier.
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw identifier value.
	pub const fn raw(self) -> u64 {
		self.0
	}

	/// Returns `true` for the reserved null identifier.
	pub const fn is_null(self) -> bool {
		self.0 == Self::NULL.0
	}
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}
