use super::*;
use crate::error::{OctreeError, OctreeResult};
use crate::jobs::JobSystem;
use crate::pool::PoolStats;
use log::{debug, warn};
use std::time::Instant;

impl Octree {
    pub fn new_with_config(area: Region, config: Config) -> OctreeResult<Self> {
        if !area.is_valid() {
            return Err(OctreeError::InvalidRegion {
                center: area.center,
                extent: area.extent,
            });
        }
        config.validate()?;
        let pools = Pools::new(&config);
        Ok(Self {
            root: Cell::new(area, 0),
            config,
            pools,
        })
    }

    pub fn new(area: Region) -> OctreeResult<Self> {
        Self::new_with_config(area, Config::default())
    }

    #[inline(always)]
    fn split(&mut self) -> (&mut Cell, Ctx<'_>) {
        let ctx = Ctx {
            config: &self.config,
            pools: &self.pools,
        };
        (&mut self.root, ctx)
    }

    /// Classifies a new entity. Inserting a key twice indexes it twice.
    pub fn insert(&mut self, store: &EntityStore, key: EntityKey) -> OctreeResult<()> {
        let Some(entity) = store.get(key) else {
            warn!("insert of {:?} which is not in the entity store", key);
            return Err(OctreeError::UnknownEntity);
        };
        let record = NodeRecord::new(key, *entity);
        let (root, ctx) = self.split();
        root.insert(record, &ctx);
        Ok(())
    }

    // Index every entity in the store
    pub fn insert_all(&mut self, store: &EntityStore) {
        let (root, ctx) = self.split();
        for (key, entity) in store.iter() {
            root.insert(NodeRecord::new(key, *entity), &ctx);
        }
    }

    pub fn rebalance(&mut self, store: &EntityStore) {
        let start = Instant::now();
        let before = self.element_count();
        let (root, ctx) = self.split();
        root.rebalance(&ctx, store, None);
        self.log_rebalance("rebalance", before, start);
    }

    pub fn rebalance_threaded<J: JobSystem>(&mut self, store: &EntityStore, jobs: &J) {
        let start = Instant::now();
        let before = self.element_count();
        self.pools.reserve_workers(jobs.threads());
        let (root, ctx) = self.split();
        root.rebalance_threaded(&ctx, store, jobs, None);
        self.log_rebalance("rebalance_threaded", before, start);
    }

    fn log_rebalance(&self, kind: &str, before: usize, start: Instant) {
        let after = self.element_count();
        debug!(
            "{}: {} records, {} dropped, {:.3}ms",
            kind,
            after,
            before.saturating_sub(after),
            start.elapsed().as_secs_f64() * 1000.0
        );
    }

    /// Drops every record and returns all child blocks to the pool. The region is kept.
    pub fn clear(&mut self) {
        let (root, ctx) = self.split();
        root.release(&ctx);
    }

    pub fn element_count(&self) -> usize {
        self.root.element_count()
    }

    pub fn area(&self) -> Region {
        self.root.region
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pools.children.stats()
    }

    pub fn scratch_pool_stats(&self) -> PoolStats {
        self.pools.scratch.stats()
    }
}
