//! Allocator engine
//!
//! Owns the block table and the Next Fit cursor, and applies placement
//! decisions. Allocate and deallocate either fully succeed or leave the
//! table untouched.

use crate::allocator::{PlacementStrategy, Strategy};
use crate::error::{FitError, ProcessId, Result};
use crate::table::{BlockState, BlockTable, FreeRun};
use serde::Serialize;
use tracing::{debug, warn};

/// Memory space with pluggable placement
#[derive(Debug, Clone)]
pub struct Engine {
    table: BlockTable,

    /// Next Fit placement cursor: block after the last Next Fit allocation
    cursor: usize,
}

impl Engine {
    /// Create an engine with `capacity` free blocks and the cursor at 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Engine {
            table: BlockTable::new(capacity)?,
            cursor: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn table(&self) -> &BlockTable {
        &self.table
    }

    /// State of the block at `index`
    pub fn state_at(&self, index: usize) -> Result<BlockState> {
        self.table.state_at(index)
    }

    /// Copy of every block state in index order
    pub fn snapshot(&self) -> Vec<BlockState> {
        self.table.blocks().to_vec()
    }

    /// Current Next Fit cursor
    pub fn strategy_cursor(&self) -> usize {
        self.cursor
    }

    /// Allocate `size` contiguous blocks to `pid` using `strategy`
    ///
    /// Returns the start index of the new run. A run placed by Next Fit may
    /// wrap past the end of memory.
    ///
    /// # Errors
    ///
    /// - `InvalidProcessId` if `pid` is 0
    /// - `ProcessAlreadyResident` if `pid` already owns blocks
    /// - `AllocationFailed` if `size` is 0, exceeds capacity, or no region fits
    pub fn allocate(&mut self, pid: ProcessId, size: usize, strategy: Strategy) -> Result<usize> {
        let start = self.allocate_with(pid, size, &strategy)?;
        debug!(
            "Allocated process {} ({} blocks) at index {} via {}",
            pid, size, start, strategy
        );
        Ok(start)
    }

    /// Allocate using any placement strategy implementation
    pub fn allocate_with<S: PlacementStrategy + ?Sized>(
        &mut self,
        pid: ProcessId,
        size: usize,
        strategy: &S,
    ) -> Result<usize> {
        if pid == 0 {
            return Err(FitError::InvalidProcessId(pid));
        }

        if size == 0 || size > self.capacity() {
            warn!(
                "Process {} requested {} blocks (capacity {})",
                pid,
                size,
                self.capacity()
            );
            return Err(FitError::AllocationFailed { pid, size });
        }

        if self.contains(pid) {
            return Err(FitError::ProcessAlreadyResident(pid));
        }

        // Strategies only touch the cursor on success
        let mut cursor = self.cursor;
        let start = match strategy.find(&self.table, size, &mut cursor) {
            Some(start) => start,
            None => {
                warn!("No free region for process {} ({} blocks)", pid, size);
                return Err(FitError::AllocationFailed { pid, size });
            }
        };

        self.table.set_run(start, size, BlockState::Owned(pid));
        self.cursor = cursor;

        Ok(start)
    }

    /// Free every block owned by `pid`
    ///
    /// Returns the number of blocks released.
    pub fn deallocate(&mut self, pid: ProcessId) -> Result<usize> {
        let released = self.table.release(pid);
        if released == 0 {
            warn!("Process {} not found for deallocation", pid);
            return Err(FitError::ProcessNotFound(pid));
        }

        debug!("Deallocated process {} ({} blocks)", pid, released);
        Ok(released)
    }

    /// Count free runs shorter than `min_size`
    ///
    /// `min_size` is the smallest request the caller expects; any free run
    /// below it can never be used and counts as external fragmentation.
    pub fn fragmentation_count(&self, min_size: usize) -> usize {
        self.table
            .free_runs()
            .iter()
            .filter(|run| run.length > 0 && run.length < min_size)
            .count()
    }

    /// Maximal free runs in index order
    pub fn free_runs(&self) -> Vec<FreeRun> {
        self.table.free_runs()
    }

    /// Check if `pid` owns any block
    pub fn contains(&self, pid: ProcessId) -> bool {
        self.table.blocks().contains(&BlockState::Owned(pid))
    }

    /// Run owned by `pid` as `(start, length)`
    ///
    /// For a run that wraps past the end of memory, `start` is where the run
    /// begins in wrap order, not the lowest index.
    pub fn run_of(&self, pid: ProcessId) -> Option<(usize, usize)> {
        let blocks = self.table.blocks();
        let capacity = blocks.len();
        let owned = BlockState::Owned(pid);

        let length = self.table.count_owned(pid);
        if length == 0 {
            return None;
        }
        if length == capacity {
            return Some((0, length));
        }

        // The run starts at the owned block whose predecessor is not owned
        (0..capacity)
            .find(|&index| {
                blocks[index] == owned && blocks[(index + capacity - 1) % capacity] != owned
            })
            .map(|start| (start, length))
    }

    pub fn free_units(&self) -> usize {
        self.table.free_count()
    }

    pub fn used_units(&self) -> usize {
        self.capacity() - self.free_units()
    }

    /// Summary of current occupancy
    pub fn stats(&self) -> MemoryStats {
        let runs = self.table.free_runs();
        MemoryStats {
            capacity: self.capacity(),
            used: self.used_units(),
            free: self.free_units(),
            free_runs: runs.len(),
            largest_free_run: runs.iter().map(|run| run.length).max().unwrap_or(0),
        }
    }

    /// Free every block and move the cursor back to 0
    pub fn reset(&mut self) {
        self.table.clear();
        self.cursor = 0;
    }
}

/// Occupancy summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub capacity: usize,
    pub used: usize,
    pub free: usize,
    pub free_runs: usize,
    pub largest_free_run: usize,
}
