use std::sync::{Mutex, MutexGuard, PoisonError};

/// Spare blocks a pool keeps before handing freed blocks back to the system allocator.
pub const DEFAULT_HIGH_WATER_MARK: usize = 16;

// Clears a block's contents before it is cached for reuse
pub trait Resettable {
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub system_allocations: usize,
    pub system_releases: usize,
    pub cached: usize,
    pub allocations: usize,
    pub deallocations: usize,
}

impl PoolStats {
    pub fn in_flight(&self) -> usize {
        self.allocations.saturating_sub(self.deallocations)
    }

    fn merge(self, other: PoolStats) -> PoolStats {
        PoolStats {
            system_allocations: self.system_allocations + other.system_allocations,
            system_releases: self.system_releases + other.system_releases,
            cached: self.cached + other.cached,
            allocations: self.allocations + other.allocations,
            deallocations: self.deallocations + other.deallocations,
        }
    }
}

/// Free-list pool of equally sized blocks.
///
/// Grows one block at a time when the free list is empty and returns blocks to the system
/// allocator once `high_water_mark` spares are already cached. Blocks come back holding
/// whatever the previous owner left after `reset`; callers initialize them.
pub struct BlockPool<T: Resettable> {
    free: Vec<Box<T>>,
    high_water_mark: usize,
    stats: PoolStats,
}

impl<T> BlockPool<T>
where
    T: Resettable + Default,
{
    pub fn new(high_water_mark: usize) -> Self {
        BlockPool {
            free: Vec::with_capacity(high_water_mark),
            high_water_mark,
            stats: PoolStats::default(),
        }
    }

    pub fn with_reserve(high_water_mark: usize, reserve: usize) -> Self {
        let mut pool = Self::new(high_water_mark);
        for _ in 0..reserve.min(high_water_mark) {
            let block = pool.expand();
            pool.free.push(block);
        }
        pool
    }

    pub fn allocate(&mut self) -> Box<T> {
        let block = match self.free.pop() {
            Some(block) => block,
            None => self.expand(),
        };
        self.stats.allocations += 1;
        block
    }

    pub fn deallocate(&mut self, mut block: Box<T>) {
        self.stats.deallocations += 1;
        if self.free.len() >= self.high_water_mark {
            self.stats.system_releases += 1;
            drop(block);
            return;
        }
        block.reset();
        self.free.push(block);
    }

    pub fn cached(&self) -> usize {
        self.free.len()
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            cached: self.free.len(),
            ..self.stats
        }
    }

    // Release every cached block back to the system
    pub fn clear(&mut self) {
        self.stats.system_releases += self.free.len();
        self.free.clear();
    }

    fn expand(&mut self) -> Box<T> {
        self.stats.system_allocations += 1;
        Box::default()
    }
}

/// One [`BlockPool`] per rayon worker thread, plus one shared by every thread outside the pool.
///
/// Slots are sized from the machine's parallelism so building one never starts a rayon pool.
/// Call [`WorkerPools::reserve_workers`] with the worker count of the pool that will run the
/// jobs; a worker then only ever locks its own slot.
pub struct WorkerPools<T: Resettable> {
    slots: Vec<Mutex<BlockPool<T>>>,
    high_water_mark: usize,
}

impl<T> WorkerPools<T>
where
    T: Resettable + Default,
{
    pub fn new(high_water_mark: usize) -> Self {
        let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
        let mut pools = WorkerPools {
            slots: Vec::new(),
            high_water_mark,
        };
        pools.reserve_workers(workers);
        pools
    }

    /// Grows to one slot per worker for a pool of `workers` threads. Never shrinks.
    pub fn reserve_workers(&mut self, workers: usize) {
        let count = workers.max(1) + 1;
        while self.slots.len() < count {
            self.slots.push(Mutex::new(BlockPool::new(self.high_water_mark)));
        }
    }

    pub fn workers(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn allocate(&self) -> Box<T> {
        self.local().allocate()
    }

    pub fn deallocate(&self, block: Box<T>) {
        self.local().deallocate(block);
    }

    pub fn stats(&self) -> PoolStats {
        self.slots
            .iter()
            .map(|slot| Self::lock(slot).stats())
            .fold(PoolStats::default(), PoolStats::merge)
    }

    pub fn clear(&self) {
        for slot in self.slots.iter() {
            Self::lock(slot).clear();
        }
    }

    fn local(&self) -> MutexGuard<'_, BlockPool<T>> {
        let workers = self.workers();
        let index = rayon::current_thread_index().map_or(0, |i| 1 + i % workers);
        Self::lock(&self.slots[index])
    }

    fn lock(slot: &Mutex<BlockPool<T>>) -> MutexGuard<'_, BlockPool<T>> {
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
