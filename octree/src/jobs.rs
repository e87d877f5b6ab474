use smallvec::SmallVec;

pub type Job<'a> = Box<dyn FnOnce() + Send + 'a>;

/// One fork/join level: at most 8 jobs, one per child cell.
pub type JobBatch<'a> = SmallVec<[Job<'a>; 8]>;

/// Fork/join facility used by the threaded rebalance.
///
/// `fork_join` schedules every job of the batch and returns only once all of them, and
/// everything they forked in turn, have completed. Work placed after the call is the
/// continuation of the batch and observes fully settled results. Jobs of one batch may run
/// in any order and must not touch each other's data.
pub trait JobSystem: Sync {
    fn fork_join<'a>(&self, jobs: JobBatch<'a>);

    /// Worker threads jobs may run on, used to size per-worker pools.
    fn threads(&self) -> usize;
}

/// Runs batches on rayon, in the global pool or in a dedicated one.
#[derive(Default)]
pub struct RayonJobs {
    pool: Option<rayon::ThreadPool>,
}

impl RayonJobs {
    pub fn new() -> Self {
        Self { pool: None }
    }

    pub fn with_threads(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("octree-worker-{}", i))
            .build()?;
        Ok(Self { pool: Some(pool) })
    }
}

impl JobSystem for RayonJobs {
    fn fork_join<'a>(&self, jobs: JobBatch<'a>) {
        let spawn_all = move |scope: &rayon::Scope<'a>| {
            for job in jobs {
                scope.spawn(move |_| job());
            }
        };
        match &self.pool {
            Some(pool) => pool.scope(spawn_all),
            None => rayon::scope(spawn_all),
        }
    }

    fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

/// Runs every job on the calling thread, in batch order.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineJobs;

impl JobSystem for InlineJobs {
    fn fork_join<'a>(&self, jobs: JobBatch<'a>) {
        for job in jobs {
            job();
        }
    }

    fn threads(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // Returns the number of leaf jobs run below this level.
    fn nested_batches<J: JobSystem>(jobs: &J, depth: u32) -> usize {
        if depth == 0 {
            return 1;
        }
        let finished = AtomicUsize::new(0);
        let mut batch = JobBatch::new();
        for _ in 0..8 {
            let finished = &finished;
            batch.push(Box::new(move || {
                finished.fetch_add(nested_batches(jobs, depth - 1), Ordering::SeqCst);
            }) as Job<'_>);
        }
        jobs.fork_join(batch);
        // Continuation: every job below this level has already run.
        let finished = finished.into_inner();
        assert_eq!(finished, 8usize.pow(depth));
        finished
    }

    #[test]
    fn rayon_batches_join_before_continuation() {
        assert_eq!(nested_batches(&RayonJobs::new(), 3), 512);
    }

    #[test]
    fn dedicated_pool_runs_batches() {
        let jobs = RayonJobs::with_threads(2).unwrap();
        assert_eq!(jobs.threads(), 2);
        assert_eq!(nested_batches(&jobs, 2), 64);
    }

    #[test]
    fn inline_runs_in_order() {
        let order = Mutex::new(Vec::new());
        let mut batch = JobBatch::new();
        for i in 0..8 {
            let order = &order;
            batch.push(Box::new(move || order.lock().unwrap().push(i)) as Job<'_>);
        }
        InlineJobs.fork_join(batch);
        assert_eq!(order.into_inner().unwrap(), (0..8).collect::<Vec<_>>());
    }
}
