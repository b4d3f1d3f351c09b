pub mod loader;
pub mod model;
pub mod pick;
pub mod stl;

pub use loader::{LoadResult, MeshLoader};
pub use model::{Mesh, TriangleMesh};
pub use pick::{PickHit, Ray, pick};
