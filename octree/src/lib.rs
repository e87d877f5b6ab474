pub mod error;
pub mod jobs;
pub mod octree;
pub mod pool;

pub use error::{OctreeError, OctreeResult};
