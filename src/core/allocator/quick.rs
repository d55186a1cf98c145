//! Quick Fit over exact free-run size classes
//!
//! Free runs are grouped by their exact length. Size classes are visited in
//! ascending order and the first run of the first class that can hold the
//! request wins. This is not the textbook Quick Fit with fixed request-size
//! buckets: the classes are rebuilt from the table on every call, which makes
//! the result "smallest sufficient size class, first occupant".

use crate::allocator::PlacementStrategy;
use crate::table::BlockTable;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct QuickFit;

impl QuickFit {
    /// Start indices of free runs, grouped by run length
    pub fn size_classes(table: &BlockTable) -> BTreeMap<usize, Vec<usize>> {
        let mut classes: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for run in table.free_runs() {
            classes.entry(run.length).or_default().push(run.start);
        }
        classes
    }
}

impl PlacementStrategy for QuickFit {
    fn find(&self, table: &BlockTable, size: usize, _cursor: &mut usize) -> Option<usize> {
        if size == 0 {
            return None;
        }

        Self::size_classes(table)
            .range(size..)
            .next()
            .and_then(|(_, starts)| starts.first().copied())
    }
}
