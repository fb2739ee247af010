//! Actor slot definitions for multi-actor editing.

use std::fmt;

/// One of the fixed set of independent edit sources.
///
/// Each slot accumulates its own uncommitted undo/redo data, so one actor's
/// in-flight gesture can never corrupt another's. The set is closed: a caller
/// cannot name a slot that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorSlot {
	/// The left-hand input actor.
	Left,
	/// The right-hand input actor.
	Right,
	/// Edits not attributed to either hand.
	Detached,
}

impl ActorSlot {
	/// Number of slots, for dense per-slot storage.
	pub const COUNT: usize = 3;

	/// All slots, in index order.
	pub const ALL: [ActorSlot; Self::COUNT] = [Self::Left, Self::Right, Self::Detached];

	/// Dense index of this slot in `0..COUNT`.
	pub const fn index(self) -> usize {
		match self {
			Self::Left => 0,
			Self::Right => 1,
			Self::Detached => 2,
		}
	}
}

impl fmt::Display for ActorSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Left => "left",
			Self::Right => "right",
			Self::Detached => "detached",
		};
		f.write_str(name)
	}
}
