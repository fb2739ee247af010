//! The closed property model for scene objects.
//!
//! A [`PropertyPatch`] is a partial view of an object's state: every known key
//! is optional, and `None` means "untouched". The same type serves as an edit
//! (a few keys set), as a full captured state (every relevant key set, taken
//! before a delete so the object can be recreated), and as the unit of
//! undo/redo merging.
//!
//! # Merge semantics
//!
//! Two merge directions exist, and both are total: duplicate keys never
//! conflict, they resolve deterministically.
//!
//! * [`fill_from`](PropertyPatch::fill_from): first-seen wins per key. Used to
//!   accumulate undo data over a gesture, so undoing restores the state from
//!   before the whole gesture.
//! * [`apply`](PropertyPatch::apply): last-seen wins per key. Used to
//!   accumulate redo data (redoing reaches the state after the whole gesture)
//!   and to overlay a patch onto a full state.


use crate::geometry::{Quat, Rgb, Vec3};
use crate::ids::ObjectId;

/// A partial-property patch over the closed set of known object keys.
///
/// `parent` is the one cross-reference key: its value names another object,
/// with [`ObjectId::NULL`] meaning "detach from parent".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyPatch {
	/// World position.
	pub position: Option<Vec3>,
	/// World rotation.
	pub rotation: Option<Quat>,
	/// Bounding dimensions.
	pub dimensions: Option<Vec3>,
	/// Surface color.
	pub color: Option<Rgb>,
	/// Gravity acceleration; a non-zero value makes the object dynamic.
	pub gravity: Option<Vec3>,
	/// Linear velocity.
	pub velocity: Option<Vec3>,
	/// Angular velocity.
	pub angular_velocity: Option<Vec3>,
	/// Parent object reference; [`ObjectId::NULL`] detaches.
	pub parent: Option<ObjectId>,
	/// Render visibility.
	pub visible: Option<bool>,
	/// Edit lock.
	pub locked: Option<bool>,
}

fn fill<T>(dst: &mut Option<T>, src: &Option<T>)
where
	T: Copy,
{
	if dst.is_none() {
		*dst = *src;
	}
}

fn overlay<T>(dst: &mut Option<T>, src: &Option<T>)
where
	T: Copy,
{
	if src.is_some() {
		*dst = *src;
	}
}

impl PropertyPatch {
	/// Returns `true` if no key is set.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	/// Adopts `other`'s values only for keys this patch does not set yet.
	///
	/// First-seen wins: merging successive undo captures with this keeps the
	/// earliest recorded value of every key.
	pub fn fill_from(&mut self, other: &PropertyPatch) {
		fill(&mut self.position, &other.position);
		fill(&mut self.rotation, &other.rotation);
		fill(&mut self.dimensions, &other.dimensions);
		fill(&mut self.color, &other.color);
		fill(&mut self.gravity, &other.gravity);
		fill(&mut self.velocity, &other.velocity);
		fill(&mut self.angular_velocity, &other.angular_velocity);
		fill(&mut self.parent, &other.parent);
		fill(&mut self.visible, &other.visible);
		fill(&mut self.locked, &other.locked);
	}

	/// Overwrites this patch with every key `other` sets.
	///
	/// Last-seen wins: merging successive redo captures with this keeps the
	/// final value of every key. Also the rule for overlaying a patch onto a
	/// full object state.
	pub fn apply(&mut self, other: &PropertyPatch) {
		overlay(&mut self.position, &other.position);
		overlay(&mut self.rotation, &other.rotation);
		overlay(&mut self.dimensions, &other.dimensions);
		overlay(&mut self.color, &other.color);
		overlay(&mut self.gravity, &other.gravity);
		overlay(&mut self.velocity, &other.velocity);
		overlay(&mut self.angular_velocity, &other.angular_velocity);
		overlay(&mut self.parent, &other.parent);
		overlay(&mut self.visible, &other.visible);
		overlay(&mut self.locked, &other.locked);
	}

	/// Sets the position key.
	pub fn with_position(mut self, position: Vec3) -> Self {
		self.position = Some(position);
		self
	}

	/// Sets the rotation key.
	pub fn with_rotation(mut self, rotation: Quat) -> Self {
		self.rotation = Some(rotation);
		self
	}

	/// Sets the dimensions key.
	pub fn with_dimensions(mut self, dimensions: Vec3) -> Self {
		self.dimensions = Some(dimensions);
		self
	}

	/// Sets the color key.
	pub fn with_color(mut self, color: Rgb) -> Self {
		self.color = Some(color);
		self
	}

	/// Sets the gravity key.
	pub fn with_gravity(mut self, gravity: Vec3) -> Self {
		self.gravity = Some(gravity);
		self
	}

	/// Sets the velocity key.
	pub fn with_velocity(mut self, velocity: Vec3) -> Self {
		self.velocity = Some(velocity);
		self
	}

	/// Sets the angular velocity key.
	pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
		self.angular_velocity = Some(angular_velocity);
		self
	}

	/// Sets the parent key; [`ObjectId::NULL`] detaches.
	pub fn with_parent(mut self, parent: ObjectId) -> Self {
		self.parent = Some(parent);
		self
	}

	/// Sets the visibility key.
	pub fn with_visible(mut self, visible: bool) -> Self {
		self.visible = Some(visible);
		self
	}

	/// Sets the lock key.
	pub fn with_locked(mut self, locked: bool) -> Self {
		self.locked = Some(locked);
		self
	}
}
