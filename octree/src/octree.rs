mod api;
mod cell;
mod config;
mod diagnostics;
mod query;
mod rebalance;
mod rebalance_threaded;
mod types;

pub use common::{Entity, Region, Vec3};
pub use config::Config;
pub use diagnostics::{CellView, TreeStats};
pub use query::Query;
pub use types::{EntityKey, EntityStore, NodeRecord};

use crate::pool::WorkerPools;
use cell::{Cell, Children, OutsiderBlock};
use types::OutsiderVec;

/// Adaptive octree over entities that move every frame.
///
/// Entities live in an external [`EntityStore`]; the tree keeps a [`NodeRecord`] per entity
/// (key plus a position snapshot) in exactly one cell. Each frame the simulation queries the
/// tree built from the previous frame's positions, then calls [`Octree::rebalance`] or
/// [`Octree::rebalance_threaded`] to move records to the cells their new positions fall in.
pub struct Octree {
    root: Cell,
    config: Config,
    pools: Pools,
}

// Child blocks and rebalance scratch buffers, pooled per worker thread
pub(crate) struct Pools {
    children: WorkerPools<Children>,
    scratch: WorkerPools<OutsiderBlock>,
}

impl Pools {
    fn new(config: &Config) -> Self {
        Self {
            children: WorkerPools::new(config.pool_high_water_mark),
            scratch: WorkerPools::new(config.pool_high_water_mark),
        }
    }

    fn reserve_workers(&mut self, workers: usize) {
        self.children.reserve_workers(workers);
        self.scratch.reserve_workers(workers);
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Ctx<'a> {
    pub(crate) config: &'a Config,
    pub(crate) pools: &'a Pools,
}
