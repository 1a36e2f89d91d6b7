//! CSG evaluation on top of the vcad kernel.

mod composer;
mod primitives;
mod solid;

pub use composer::{BooleanComposer, Operand};
pub use primitives::{apply_transform, build_world_part, create_part};
pub use solid::{extract_triangles, Aabb, Solid, Triangle};
