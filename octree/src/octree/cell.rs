use super::*;
use crate::pool::Resettable;
use log::trace;

/// 8 sibling cells, allocated and freed together as one pool block.
pub(crate) type Children = [Cell; 8];

/// Per-child outsider lists used by a parent while its children rebalance in parallel.
pub(crate) type OutsiderBlock = [OutsiderVec; 8];

/// One node of the tree. A leaf when `children` is `None`, a branch otherwise.
///
/// `local` holds the records that live in this cell: everything in a leaf; stragglers on a
/// child boundary and (at the root) entities outside the tree's region in a branch.
/// `descendant_count` is the number of records strictly below this cell.
#[derive(Default)]
pub(crate) struct Cell {
    pub(crate) region: Region,
    pub(crate) depth: u32,
    pub(crate) local: Vec<NodeRecord>,
    pub(crate) children: Option<Box<Children>>,
    pub(crate) descendant_count: usize,
}

impl Resettable for Cell {
    fn reset(&mut self) {
        self.region = Region::default();
        self.depth = 0;
        self.local.clear();
        self.children = None;
        self.descendant_count = 0;
    }
}

impl Resettable for Children {
    fn reset(&mut self) {
        for cell in self.iter_mut() {
            cell.reset();
        }
    }
}

impl Resettable for OutsiderBlock {
    fn reset(&mut self) {
        for outsiders in self.iter_mut() {
            outsiders.clear();
        }
    }
}

impl Cell {
    pub(crate) fn new(region: Region, depth: u32) -> Self {
        Self {
            region,
            depth,
            ..Self::default()
        }
    }

    // Prepare a recycled cell; keeps the local list's capacity
    pub(crate) fn initialize(&mut self, region: Region, depth: u32) {
        self.region = region;
        self.depth = depth;
        self.local.clear();
        self.children = None;
        self.descendant_count = 0;
    }

    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline(always)]
    pub(crate) fn element_count(&self) -> usize {
        self.local.len() + self.descendant_count
    }

    pub(crate) fn should_collapse(&self, config: &Config) -> bool {
        !self.is_leaf() && self.element_count() < config.collapse_threshold()
    }

    /// Entry point for new records: anything outside the region stays here as an outsider.
    pub(crate) fn insert(&mut self, record: NodeRecord, ctx: &Ctx<'_>) {
        if !self.region.contains(record.position()) {
            self.local.push(record);
            return;
        }
        self.insert_contained(record, ctx);
    }

    pub(crate) fn insert_contained(&mut self, record: NodeRecord, ctx: &Ctx<'_>) {
        if self.is_leaf() {
            let full = self.local.len() >= ctx.config.leaf_capacity;
            if !full || self.depth >= ctx.config.max_depth {
                if full {
                    trace!(
                        "leaf at max depth {} holds {} records (capacity {})",
                        self.depth,
                        self.local.len() + 1,
                        ctx.config.leaf_capacity
                    );
                }
                self.local.push(record);
                return;
            }
            self.subdivide(ctx);
        }

        if !self.insert_into_child(record, ctx) {
            self.local.push(record);
        }
    }

    /// Hands the record to the first child whose region strictly contains it.
    pub(crate) fn insert_into_child(&mut self, record: NodeRecord, ctx: &Ctx<'_>) -> bool {
        let Some(children) = self.children.as_deref_mut() else {
            return false;
        };
        let position = record.position();
        match children
            .iter_mut()
            .find(|child| child.region.contains(position))
        {
            Some(child) => {
                child.insert_contained(record, ctx);
                self.descendant_count += 1;
                true
            }
            None => false,
        }
    }

    fn subdivide(&mut self, ctx: &Ctx<'_>) {
        debug_assert!(self.is_leaf());
        let mut children = ctx.pools.children.allocate();
        for (i, child) in children.iter_mut().enumerate() {
            child.initialize(self.region.octant(i), self.depth + 1);
        }
        self.children = Some(children);
        trace!(
            "subdivide cell at {} depth {} ({} records)",
            self.region.center,
            self.depth,
            self.local.len()
        );

        // Re-home what fits in a child, stragglers stay
        let mut local = std::mem::take(&mut self.local);
        local.retain(|record| !self.insert_into_child(*record, ctx));
        self.local = local;
    }

    /// Pulls every descendant record into `local` and returns the child blocks to the pool.
    pub(crate) fn collapse(&mut self, ctx: &Ctx<'_>) {
        if let Some(mut children) = self.children.take() {
            trace!(
                "collapse cell at {} depth {} ({} records)",
                self.region.center,
                self.depth,
                self.element_count()
            );
            for child in children.iter_mut() {
                child.drain_into(&mut self.local, ctx);
            }
            ctx.pools.children.deallocate(children);
        }
        self.descendant_count = 0;
    }

    fn drain_into(&mut self, target: &mut Vec<NodeRecord>, ctx: &Ctx<'_>) {
        if let Some(mut children) = self.children.take() {
            for child in children.iter_mut() {
                child.drain_into(target, ctx);
            }
            ctx.pools.children.deallocate(children);
        }
        target.append(&mut self.local);
        self.descendant_count = 0;
    }

    // Drop every record and give all child blocks back
    pub(crate) fn release(&mut self, ctx: &Ctx<'_>) {
        if let Some(mut children) = self.children.take() {
            for child in children.iter_mut() {
                child.release(ctx);
            }
            ctx.pools.children.deallocate(children);
        }
        self.local.clear();
        self.descendant_count = 0;
    }
}
