use super::*;
use crate::jobs::{Job, JobBatch, JobSystem};

impl Cell {
    /// Same result as [`Cell::rebalance`], with the 8 children of each large branch rebalanced
    /// as one fork/join batch.
    ///
    /// Each child forwards its outsiders into its own slot of a pooled scratch block, so
    /// siblings never share a buffer. This cell's own reconciliation is the continuation of
    /// the batch and only starts after every child subtree has settled.
    pub(crate) fn rebalance_threaded<J: JobSystem>(
        &mut self,
        ctx: &Ctx<'_>,
        store: &EntityStore,
        jobs: &J,
        outsiders: Option<&mut OutsiderVec>,
    ) {
        if self.is_leaf()
            || self.should_collapse(ctx.config)
            || self.element_count() < ctx.config.parallel_threshold
        {
            self.rebalance(ctx, store, outsiders);
            return;
        }

        let mut scratch = ctx.pools.scratch.allocate();
        if let Some(children) = self.children.as_deref_mut() {
            let batch: JobBatch<'_> = children
                .iter_mut()
                .zip(scratch.iter_mut())
                .map(|(child, forwarded)| {
                    Box::new(move || {
                        child.rebalance_threaded(ctx, store, jobs, Some(forwarded));
                    }) as Job<'_>
                })
                .collect();
            jobs.fork_join(batch);
        }

        self.settle(
            ctx,
            store,
            outsiders,
            scratch.iter_mut().flat_map(|forwarded| forwarded.drain(..)),
        );
        ctx.pools.scratch.deallocate(scratch);
    }
}
