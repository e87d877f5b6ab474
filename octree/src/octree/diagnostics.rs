use super::*;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    pub region: Region,
    pub depth: u32,
    pub is_leaf: bool,
    pub local: &'a [NodeRecord],
    pub element_count: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub cells: usize,
    pub leaves: usize,
    pub branches: usize,
    pub deepest: u32,
    pub records: usize,
}

impl Octree {
    /// Visits every cell depth-first, parents before children, children in octant order.
    pub fn for_each_cell<F>(&self, mut f: F)
    where
        F: FnMut(CellView<'_>),
    {
        let mut stack: SmallVec<[&Cell; 64]> = SmallVec::new();
        stack.push(&self.root);
        while let Some(cell) = stack.pop() {
            f(CellView {
                region: cell.region,
                depth: cell.depth,
                is_leaf: cell.is_leaf(),
                local: &cell.local,
                element_count: cell.element_count(),
            });
            if let Some(children) = cell.children.as_deref() {
                stack.extend(children.iter().rev());
            }
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.for_each_cell(|cell| {
            stats.cells += 1;
            if cell.is_leaf {
                stats.leaves += 1;
            } else {
                stats.branches += 1;
            }
            stats.deepest = stats.deepest.max(cell.depth);
            stats.records += cell.local.len();
        });
        stats
    }
}
