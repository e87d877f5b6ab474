pub mod entity;
pub mod shapes;

pub use entity::Entity;
pub use glam::Vec3;
pub use shapes::Region;
