//! Block table for the simulated memory space
//!
//! Memory is modeled as a fixed-length sequence of block units. Each unit is
//! either free or owned by exactly one process. The length is set once at
//! construction and never changes.

use crate::error::{FitError, ProcessId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single block unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockState {
    Free,
    Owned(ProcessId),
}

impl BlockState {
    pub fn is_free(&self) -> bool {
        matches!(self, BlockState::Free)
    }

    /// Owning process, if any
    pub fn owner(&self) -> Option<ProcessId> {
        match *self {
            BlockState::Free => None,
            BlockState::Owned(pid) => Some(pid),
        }
    }

    /// Numeric form used for display: 0 = free, otherwise the process ID
    pub fn as_id(&self) -> ProcessId {
        self.owner().unwrap_or(0)
    }
}

/// A maximal run of free block units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeRun {
    /// First block index of the run
    pub start: usize,
    /// Number of contiguous free blocks
    pub length: usize,
}

impl FreeRun {
    pub fn new(start: usize, length: usize) -> Self {
        FreeRun { start, length }
    }

    /// One past the last block of the run
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Check if this run contains a block index
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }

    /// Check if a request of `size` blocks fits in this run
    pub fn fits(&self, size: usize) -> bool {
        self.length >= size
    }
}

/// Authoritative sequence of block units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTable {
    blocks: Vec<BlockState>,
}

impl BlockTable {
    /// Create a table with `capacity` free blocks
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(FitError::InvalidCapacity(capacity));
        }

        Ok(BlockTable {
            blocks: vec![BlockState::Free; capacity],
        })
    }

    /// Total number of block units
    pub fn capacity(&self) -> usize {
        self.blocks.len()
    }

    /// State of the block at `index`
    pub fn state_at(&self, index: usize) -> Result<BlockState> {
        self.blocks
            .get(index)
            .copied()
            .ok_or(FitError::OutOfRange {
                index,
                capacity: self.capacity(),
            })
    }

    /// Check if the block at `index` is free
    ///
    /// Out-of-range indices are reported as not free.
    pub fn is_free(&self, index: usize) -> bool {
        self.blocks.get(index).map_or(false, BlockState::is_free)
    }

    /// Read-only view of every block in index order
    pub fn blocks(&self) -> &[BlockState] {
        &self.blocks
    }

    /// Block states with 0 for free blocks and the owner ID otherwise
    pub fn owner_ids(&self) -> Vec<ProcessId> {
        self.blocks.iter().map(BlockState::as_id).collect()
    }

    /// Write `value` to `length` consecutive blocks starting at `start`
    ///
    /// Indices wrap modulo capacity, so a run placed by Next Fit across the
    /// end of memory lands at `(start + j) % capacity`. Runs that do not
    /// cross the end are unaffected by the wrap.
    pub(crate) fn set_run(&mut self, start: usize, length: usize, value: BlockState) {
        let capacity = self.capacity();
        debug_assert!(start < capacity);
        debug_assert!(length <= capacity);

        for offset in 0..length {
            self.blocks[(start + offset) % capacity] = value;
        }
    }

    /// Free every block owned by `pid`, returning how many were released
    pub(crate) fn release(&mut self, pid: ProcessId) -> usize {
        let mut released = 0;
        for block in self.blocks.iter_mut() {
            if *block == BlockState::Owned(pid) {
                *block = BlockState::Free;
                released += 1;
            }
        }
        released
    }

    /// Reset every block to free
    pub(crate) fn clear(&mut self) {
        self.blocks.fill(BlockState::Free);
    }

    /// Partition the table into maximal free runs, in index order
    ///
    /// Runs never wrap: a free run touching the end of memory and another
    /// touching the start are reported separately. Best Fit, Worst Fit,
    /// Quick Fit and the fragmentation metric all share this partition.
    pub fn free_runs(&self) -> Vec<FreeRun> {
        let mut runs = Vec::new();
        let mut run_start: Option<usize> = None;

        for (index, block) in self.blocks.iter().enumerate() {
            match (block.is_free(), run_start) {
                (true, None) => run_start = Some(index),
                (false, Some(start)) => {
                    runs.push(FreeRun::new(start, index - start));
                    run_start = None;
                }
                _ => {}
            }
        }

        if let Some(start) = run_start {
            runs.push(FreeRun::new(start, self.capacity() - start));
        }

        runs
    }

    /// Number of blocks owned by `pid`
    pub fn count_owned(&self, pid: ProcessId) -> usize {
        self.blocks
            .iter()
            .filter(|block| **block == BlockState::Owned(pid))
            .count()
    }

    /// Number of free blocks
    pub fn free_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_free()).count()
    }
}

impl fmt::Display for BlockTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", block.as_id())?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
pub(crate) fn table_from_ids(ids: &[ProcessId]) -> BlockTable {
    BlockTable {
        blocks: ids
            .iter()
            .map(|&id| {
                if id == 0 {
                    BlockState::Free
                } else {
                    BlockState::Owned(id)
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_creation() {
        let table = BlockTable::new(10).unwrap();
        assert_eq!(table.capacity(), 10);
        assert_eq!(table.free_count(), 10);
        assert!(table.blocks().iter().all(BlockState::is_free));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = BlockTable::new(0);
        assert!(matches!(result, Err(FitError::InvalidCapacity(0))));
    }

    #[test]
    fn test_state_at_out_of_range() {
        let table = BlockTable::new(4).unwrap();
        assert_eq!(table.state_at(3).unwrap(), BlockState::Free);

        let result = table.state_at(4);
        assert!(matches!(
            result,
            Err(FitError::OutOfRange {
                index: 4,
                capacity: 4
            })
        ));
    }

    #[test]
    fn test_set_run_plain() {
        let mut table = BlockTable::new(10).unwrap();
        table.set_run(2, 3, BlockState::Owned(7));
        assert_eq!(table.owner_ids(), vec![0, 0, 7, 7, 7, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_set_run_wraps() {
        let mut table = BlockTable::new(6).unwrap();
        table.set_run(4, 4, BlockState::Owned(3));
        assert_eq!(table.owner_ids(), vec![3, 3, 0, 0, 3, 3]);
    }

    #[test]
    fn test_release() {
        let mut table = table_from_ids(&[1, 1, 2, 2, 0, 1]);
        assert_eq!(table.release(1), 3);
        assert_eq!(table.owner_ids(), vec![0, 0, 2, 2, 0, 0]);
        assert_eq!(table.release(9), 0);
    }

    #[test]
    fn test_free_runs_partition() {
        let table = table_from_ids(&[0, 0, 1, 0, 2, 2, 0, 0, 0]);
        assert_eq!(
            table.free_runs(),
            vec![FreeRun::new(0, 2), FreeRun::new(3, 1), FreeRun::new(6, 3)]
        );
    }

    #[test]
    fn test_free_runs_full_and_empty() {
        let empty = BlockTable::new(5).unwrap();
        assert_eq!(empty.free_runs(), vec![FreeRun::new(0, 5)]);

        let full = table_from_ids(&[1, 1, 2]);
        assert!(full.free_runs().is_empty());
    }

    #[test]
    fn test_free_runs_split_by_adjacent_owners() {
        // Two different owners side by side do not create a free run between them
        let table = table_from_ids(&[1, 2, 0, 3]);
        assert_eq!(table.free_runs(), vec![FreeRun::new(2, 1)]);
    }

    #[test]
    fn test_free_run_helpers() {
        let run = FreeRun::new(4, 3);
        assert_eq!(run.end(), 7);
        assert!(!run.contains(3));
        assert!(run.contains(4));
        assert!(run.contains(6));
        assert!(!run.contains(7));
        assert!(run.fits(3));
        assert!(!run.fits(4));
    }

    #[test]
    fn test_display() {
        let table = table_from_ids(&[1, 0, 12]);
        assert_eq!(table.to_string(), "[1, 0, 12]");
    }
}
