//! Core types for scene editing: object identities, actor slots, geometry, and properties.

/// Actor slot definitions for multi-actor editing.
pub mod actor;
/// Geometry value types: vectors, rotations, colors.
pub mod geometry;
/// Identifier types for scene objects.
pub mod ids;
/// The closed property model and per-key merge semantics.
pub mod properties;

pub use actor::ActorSlot;
pub use geometry::{Quat, Rgb, Vec3};
pub use ids::ObjectId;
pub use properties::PropertyPatch;
