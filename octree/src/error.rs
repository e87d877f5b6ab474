use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OctreeError {
    #[error(
        "region must have a finite center and finite, positive extents (center: {center}, extent: {extent})"
    )]
    InvalidRegion { center: Vec3, extent: Vec3 },
    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    #[error("entity key is not present in the store")]
    UnknownEntity,
}

pub type OctreeResult<T> = Result<T, OctreeError>;
