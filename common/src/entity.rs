use glam::Vec3;

/// A moving point owned by the simulation. The tree only ever reads it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Entity {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Entity {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    // Advance position by velocity over dt
    pub fn step(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}
