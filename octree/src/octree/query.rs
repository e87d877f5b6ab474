use super::*;
use smallvec::SmallVec;

type CellStack<'a> = SmallVec<[&'a Cell; 64]>;

/// Lazy traversal of every record whose cell's region overlaps the query area.
///
/// Every visited cell yields its whole local list, including stragglers and outsiders that
/// lie outside the area, so results over-approximate. Callers apply their exact test.
#[derive(Clone)]
pub struct Query<'a> {
    area: Region,
    stack: CellStack<'a>,
    current: std::slice::Iter<'a, NodeRecord>,
}

impl<'a> Query<'a> {
    pub(crate) fn new(root: &'a Cell, area: Region) -> Self {
        let mut stack = CellStack::new();
        stack.push(root);
        Self {
            area,
            stack,
            current: [].iter(),
        }
    }
}

impl<'a> Iterator for Query<'a> {
    type Item = &'a NodeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.current.next() {
                return Some(record);
            }
            let cell = self.stack.pop()?;
            if let Some(children) = cell.children.as_deref() {
                // Reversed so children come off the stack in octant order
                for child in children.iter().rev() {
                    if Region::overlaps(&child.region, &self.area) {
                        self.stack.push(child);
                    }
                }
            }
            self.current = cell.local.iter();
        }
    }
}

impl Octree {
    pub fn query(&self, area: Region) -> Query<'_> {
        Query::new(&self.root, area)
    }

    pub fn query_with<F>(&self, area: Region, mut f: F)
    where
        F: FnMut(&NodeRecord),
    {
        for record in self.query(area) {
            f(record);
        }
    }

    /// Visits every record whose snapshot lies strictly within `radius` of `center`,
    /// passing the squared distance along. The entity at `center` itself is included.
    /// A radius that is not finite and positive matches nothing.
    pub fn neighbors_with<F>(&self, center: Vec3, radius: f32, mut f: F)
    where
        F: FnMut(&NodeRecord, f32),
    {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let radius_sq = radius * radius;
        for record in self.query(Region::cube(center, radius * 2.0)) {
            let distance_sq = record.position().distance_squared(center);
            if distance_sq < radius_sq {
                f(record, distance_sq);
            }
        }
    }
}
