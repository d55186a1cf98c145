//! Run-comparing strategies: Best Fit and Worst Fit
//!
//! Both partition the table into maximal free runs and pick one run among
//! those large enough for the request. Allocation always starts at the
//! beginning of the chosen run.

use crate::allocator::PlacementStrategy;
use crate::table::{BlockTable, FreeRun};

/// Smallest free run that fits; ties go to the lowest index
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl PlacementStrategy for BestFit {
    fn find(&self, table: &BlockTable, size: usize, _cursor: &mut usize) -> Option<usize> {
        if size == 0 {
            return None;
        }

        // min_by_key keeps the first of equal minimums
        table
            .free_runs()
            .into_iter()
            .filter(|run| run.fits(size))
            .min_by_key(|run| run.length)
            .map(|run| run.start)
    }
}

/// Largest free run that fits; ties go to the lowest index
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementStrategy for WorstFit {
    fn find(&self, table: &BlockTable, size: usize, _cursor: &mut usize) -> Option<usize> {
        if size == 0 {
            return None;
        }

        // max_by_key would keep the last of equal maximums, so replace only
        // on a strictly larger run
        table
            .free_runs()
            .into_iter()
            .filter(|run| run.fits(size))
            .fold(None, |worst: Option<FreeRun>, run| match worst {
                Some(current) if current.length >= run.length => Some(current),
                _ => Some(run),
            })
            .map(|run| run.start)
    }
}
