//! Per-actor pending buffers and the pre-commit merge rules.
//!
//! A gesture emits many small edits before its commit boundary. Each actor
//! slot accumulates them in one undo/redo pair so they collapse into a single
//! history entry:
//!
//! * `set_properties` for a target already in the accumulator merge per key:
//!   the undo side keeps the first-seen value (undo restores the state from
//!   before the whole gesture), the redo side keeps the last-seen value (redo
//!   reaches the state after it).
//! * create and delete records accumulate as lists; there is no merge by key.
//!
//! Merging never fails and never touches the committed log.


use crate::command::{CommandBatch, StoredPatch};
use crate::identity::IdentityArena;

/// Key-merge rule for one side of the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeRule {
	/// First-seen value wins per key (undo side).
	KeepFirst,
	/// Last-seen value wins per key (redo side).
	LastWins,
}

/// One actor slot's not-yet-committed undo/redo pair.
#[derive(Debug, Default)]
pub(crate) struct PendingPair {
	undo: CommandBatch,
	redo: CommandBatch,
}

impl PendingPair {
	/// Returns `true` if both accumulators are empty.
	pub fn is_empty(&self) -> bool {
		self.undo.is_empty() && self.redo.is_empty()
	}

	/// Merges an interned undo/redo pair into the accumulators.
	pub fn merge(&mut self, arena: &mut IdentityArena, undo: CommandBatch, redo: CommandBatch) {
		merge_batch(arena, &mut self.undo, undo, MergeRule::KeepFirst);
		merge_batch(arena, &mut self.redo, redo, MergeRule::LastWins);
	}

	/// Takes the accumulated pair for commit, leaving the slot empty.
	pub fn take(&mut self) -> (CommandBatch, CommandBatch) {
		(
			std::mem::take(&mut self.undo),
			std::mem::take(&mut self.redo),
		)
	}
}

fn merge_batch(
	arena: &mut IdentityArena,
	acc: &mut CommandBatch,
	incoming: CommandBatch,
	rule: MergeRule,
) {
	for cmd in incoming.set_properties {
		match acc
			.set_properties
			.iter()
			.position(|existing| existing.target == cmd.target)
		{
			Some(at) => {
				merge_patch(arena, &mut acc.set_properties[at].patch, cmd.patch, rule);
				// The duplicate command collapsed into the existing one.
				arena.release(cmd.target);
			}
			None => acc.set_properties.push(cmd),
		}
	}
	acc.create_objects.extend(incoming.create_objects);
	acc.delete_objects.extend(incoming.delete_objects);
}

fn merge_patch(
	arena: &mut IdentityArena,
	existing: &mut StoredPatch,
	incoming: StoredPatch,
	rule: MergeRule,
) {
	match rule {
		MergeRule::KeepFirst => {
			existing.base.fill_from(&incoming.base);
			if existing.parent.is_none() {
				existing.parent = incoming.parent;
			} else {
				incoming.release(arena);
			}
		}
		MergeRule::LastWins => {
			existing.base.apply(&incoming.base);
			if incoming.parent.is_some() {
				if let Some(displaced) = std::mem::replace(&mut existing.parent, incoming.parent) {
					displaced.release(arena);
				}
			}
		}
	}
}
