//! Sequential scanners: First Fit and Next Fit
//!
//! Both walk the table block by block and stop at the first position where
//! `size` consecutive free blocks begin. Neither compares candidates.

use crate::allocator::PlacementStrategy;
use crate::table::BlockTable;

/// Scan from index 0 and take the first region that fits
///
/// Never wraps past the end of memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementStrategy for FirstFit {
    fn find(&self, table: &BlockTable, size: usize, _cursor: &mut usize) -> Option<usize> {
        if size == 0 || size > table.capacity() {
            return None;
        }

        // The first window of `size` free blocks completes at the first index
        // where the running free count reaches `size`
        let mut free_streak = 0usize;
        for (index, block) in table.blocks().iter().enumerate() {
            if block.is_free() {
                free_streak += 1;
                if free_streak == size {
                    return Some(index + 1 - size);
                }
            } else {
                free_streak = 0;
            }
        }

        None
    }
}

/// Scan from the placement cursor, wrapping modulo capacity
///
/// Probes at most `capacity` start positions. A region may itself wrap past
/// the end of memory. On success the cursor moves to the block just after
/// the placed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextFit;

impl NextFit {
    /// Check `size` consecutive blocks from `start`, wrapping modulo capacity
    fn window_is_free(table: &BlockTable, start: usize, size: usize) -> bool {
        let capacity = table.capacity();
        (0..size).all(|offset| table.is_free((start + offset) % capacity))
    }
}

impl PlacementStrategy for NextFit {
    fn find(&self, table: &BlockTable, size: usize, cursor: &mut usize) -> Option<usize> {
        let capacity = table.capacity();
        if size == 0 || size > capacity {
            return None;
        }

        let origin = *cursor % capacity;
        for probe in 0..capacity {
            let index = (origin + probe) % capacity;
            if Self::window_is_free(table, index, size) {
                *cursor = (index + size) % capacity;
                return Some(index);
            }
        }

        None
    }
}
