use super::*;

impl Cell {
    /// Re-validates every record in this subtree against its entity's live position.
    ///
    /// Records that left this cell's region go to `outsiders` for the parent to place.
    /// The root passes `None` and keeps such records in its own list.
    pub(crate) fn rebalance(
        &mut self,
        ctx: &Ctx<'_>,
        store: &EntityStore,
        outsiders: Option<&mut OutsiderVec>,
    ) {
        if self.should_collapse(ctx.config) {
            self.collapse(ctx);
        } else if let Some(children) = self.children.as_deref_mut() {
            let mut forwarded = OutsiderVec::new();
            for child in children.iter_mut() {
                child.rebalance(ctx, store, Some(&mut forwarded));
            }
            self.settle(ctx, store, outsiders, forwarded.drain(..));
            return;
        }
        self.settle(ctx, store, outsiders, std::iter::empty());
    }

    /// Runs once the children (if any) are rebalanced: refreshes the counts, then places this
    /// cell's own records and the records its children forwarded up.
    pub(crate) fn settle<I>(
        &mut self,
        ctx: &Ctx<'_>,
        store: &EntityStore,
        mut outsiders: Option<&mut OutsiderVec>,
        forwarded: I,
    ) where
        I: IntoIterator<Item = NodeRecord>,
    {
        if let Some(children) = self.children.as_deref() {
            self.descendant_count = children.iter().map(Cell::element_count).sum();
        }

        self.reconcile_local(ctx, store, outsiders.as_mut().map(|out| &mut **out));

        for record in forwarded {
            match outsiders.as_mut() {
                Some(out) if !self.region.contains(record.position()) => out.push(record),
                _ => self.insert_contained(record, ctx),
            }
        }
    }

    fn reconcile_local(
        &mut self,
        ctx: &Ctx<'_>,
        store: &EntityStore,
        mut outsiders: Option<&mut OutsiderVec>,
    ) {
        let mut i = 0;
        while i < self.local.len() {
            let mut record = self.local[i];
            if !record.refresh(store) {
                self.local.swap_remove(i);
                continue;
            }

            let keep = if !self.region.contains(record.position()) {
                match outsiders.as_mut() {
                    Some(out) => {
                        out.push(record);
                        false
                    }
                    None => true,
                }
            } else {
                !self.insert_into_child(record, ctx)
            };

            if keep {
                self.local[i] = record;
                i += 1;
            } else {
                self.local.swap_remove(i);
            }
        }
    }
}
