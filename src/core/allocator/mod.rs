//! Placement strategies for the block table
//!
//! Every strategy answers one question: given the current table and a request
//! size, where should the run start? The engine applies the answer.
//!
//! - First Fit and Next Fit scan block by block (`sequential`)
//! - Best Fit and Worst Fit compare the free runs of the table (`extent`)
//! - Quick Fit groups free runs by size class (`quick`)

pub mod extent;
pub mod quick;
pub mod sequential;

pub use extent::{BestFit, WorstFit};
pub use quick::QuickFit;
pub use sequential::{FirstFit, NextFit};

use crate::error::FitError;
use crate::table::BlockTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placement strategy trait
///
/// `cursor` is the Next Fit placement cursor owned by the engine. Stateless
/// strategies ignore it; Next Fit reads it and advances it on success.
pub trait PlacementStrategy {
    /// Find the start index of a region able to hold `size` blocks
    ///
    /// Returns `None` when no region is large enough. Must not mutate the table.
    fn find(&self, table: &BlockTable, size: usize, cursor: &mut usize) -> Option<usize>;
}

/// Closed set of placement strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    FirstFit,
    NextFit,
    BestFit,
    WorstFit,
    QuickFit,
}

impl Strategy {
    /// All strategies, in reporting order
    pub const ALL: [Strategy; 5] = [
        Strategy::FirstFit,
        Strategy::NextFit,
        Strategy::BestFit,
        Strategy::WorstFit,
        Strategy::QuickFit,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::FirstFit => "First Fit",
            Strategy::NextFit => "Next Fit",
            Strategy::BestFit => "Best Fit",
            Strategy::WorstFit => "Worst Fit",
            Strategy::QuickFit => "Quick Fit",
        }
    }

    /// Whether placements may wrap past the end of memory
    pub fn wraps(&self) -> bool {
        matches!(self, Strategy::NextFit)
    }
}

impl PlacementStrategy for Strategy {
    fn find(&self, table: &BlockTable, size: usize, cursor: &mut usize) -> Option<usize> {
        match self {
            Strategy::FirstFit => FirstFit.find(table, size, cursor),
            Strategy::NextFit => NextFit.find(table, size, cursor),
            Strategy::BestFit => BestFit.find(table, size, cursor),
            Strategy::WorstFit => WorstFit.find(table, size, cursor),
            Strategy::QuickFit => QuickFit.find(table, size, cursor),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = FitError;

    /// Accepts "first-fit", "first_fit", "First Fit", "firstfit" or "first"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "firstfit" | "first" => Ok(Strategy::FirstFit),
            "nextfit" | "next" => Ok(Strategy::NextFit),
            "bestfit" | "best" => Ok(Strategy::BestFit),
            "worstfit" | "worst" => Ok(Strategy::WorstFit),
            "quickfit" | "quick" => Ok(Strategy::QuickFit),
            _ => Err(FitError::UnknownStrategy(s.to_string())),
        }
    }
}
