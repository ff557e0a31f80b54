mod entity;
mod map;

pub use entity::{Entity, EntityId, EntityIdAllocator, EntityRole, Vec2, Velocity, World};
pub use map::{CellRef, MapDescription, MapError, MapGrid};
