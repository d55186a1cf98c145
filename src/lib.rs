//! # blockfit - Placement Strategy Simulator
//!
//! `blockfit` models a fixed-size linear memory of block units and places
//! variable-length process runs using five classic strategies:
//!
//! - **First Fit**: first region that fits, scanning from the start
//! - **Next Fit**: like First Fit but resumes from where the last allocation ended
//! - **Best Fit**: smallest free run that fits
//! - **Worst Fit**: largest free run that fits
//! - **Quick Fit**: first run of the smallest sufficient free-run size class
//!
//! It is a teaching and benchmarking tool for comparing fragmentation behavior,
//! not a real allocator.
//!
//! ## Quick Start
//!
//! ```rust
//! use blockfit::{Engine, Result, Strategy};
//!
//! # fn main() -> Result<()> {
//! let mut engine = Engine::new(10)?;
//!
//! let start = engine.allocate(1, 5, Strategy::FirstFit)?;
//! assert_eq!(start, 0);
//!
//! let start = engine.allocate(2, 3, Strategy::BestFit)?;
//! assert_eq!(start, 5);
//! assert_eq!(engine.table().to_string(), "[1, 1, 1, 1, 1, 2, 2, 2, 0, 0]");
//!
//! engine.deallocate(1)?;
//!
//! // Free runs: 5 blocks at 0 and 2 blocks at 8
//! assert_eq!(engine.fragmentation_count(3), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Comparing Strategies
//!
//! ```rust
//! use blockfit::{Simulation, Workload};
//!
//! # fn main() -> blockfit::Result<()> {
//! let simulation = Simulation::new(Workload::default().with_seed(7))?;
//!
//! for report in simulation.run_all()? {
//!     println!(
//!         "{}: {} failures, final fragmentation {}",
//!         report.strategy, report.failures, report.final_fragmentation
//!     );
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use self::core::{allocator, engine, error, simulation, table, workload};

pub use crate::core::{
    allocator::{PlacementStrategy, Strategy},
    engine::{Engine, MemoryStats},
    error::{FitError, ProcessId, Result},
    simulation::{Simulation, StepAction, StepReport, StrategyReport},
    table::{BlockState, BlockTable, FreeRun},
    workload::{ProcessSpec, Workload},
};
