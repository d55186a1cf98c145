//! Randomised workload driver
//!
//! Each run starts from a fresh engine and performs `operations` steps. A step
//! picks a process at random: if it is resident it is deallocated, otherwise
//! it is allocated with the strategy under test. Every strategy in a
//! simulation replays the same seed, so all of them see the same sequence of
//! picked processes.

use crate::allocator::Strategy;
use crate::engine::{Engine, MemoryStats};
use crate::error::{FitError, ProcessId, Result};
use crate::workload::Workload;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepAction {
    Allocated {
        pid: ProcessId,
        size: usize,
        start: usize,
    },
    AllocationFailed {
        pid: ProcessId,
        size: usize,
    },
    Deallocated {
        pid: ProcessId,
        size: usize,
    },
}

/// State after one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// 1-based step number
    pub step: usize,
    pub action: StepAction,
    /// Block owners after the step, 0 = free
    pub memory: Vec<ProcessId>,
    /// Free runs smaller than the smallest process
    pub fragmentation: usize,
}

/// Full record of one strategy run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub seed: u64,
    pub steps: Vec<StepReport>,
    pub allocations: usize,
    pub failures: usize,
    pub deallocations: usize,
    pub final_fragmentation: usize,
    pub final_stats: MemoryStats,
}

impl StrategyReport {
    /// Fraction of allocation attempts that failed
    pub fn failure_rate(&self) -> f64 {
        let attempts = self.allocations + self.failures;
        if attempts == 0 {
            return 0.0;
        }
        self.failures as f64 / attempts as f64
    }

    /// Mean fragmentation over all steps
    pub fn mean_fragmentation(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let total: usize = self.steps.iter().map(|step| step.fragmentation).sum();
        total as f64 / self.steps.len() as f64
    }
}

/// Driver comparing strategies on one workload
#[derive(Debug, Clone)]
pub struct Simulation {
    workload: Workload,
    seed: u64,
}

impl Simulation {
    /// Create a simulation, drawing a seed from entropy if the workload has none
    pub fn new(workload: Workload) -> Result<Self> {
        workload.validate()?;
        let seed = workload
            .seed
            .unwrap_or_else(|| StdRng::from_entropy().gen());

        Ok(Simulation { workload, seed })
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Seed shared by every strategy run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run every strategy in reporting order
    pub fn run_all(&self) -> Result<Vec<StrategyReport>> {
        Strategy::ALL
            .iter()
            .map(|&strategy| self.run(strategy))
            .collect()
    }

    /// Run the workload against a single strategy
    pub fn run(&self, strategy: Strategy) -> Result<StrategyReport> {
        info!(
            "Running {} on {} blocks for {} operations (seed {})",
            strategy, self.workload.capacity, self.workload.operations, self.seed
        );

        let mut engine = Engine::new(self.workload.capacity)?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let min_size = self.workload.min_process_size();

        let mut steps = Vec::with_capacity(self.workload.operations);
        let mut allocations = 0;
        let mut failures = 0;
        let mut deallocations = 0;

        for step in 1..=self.workload.operations {
            let process = *self
                .workload
                .processes
                .choose(&mut rng)
                .ok_or_else(|| FitError::InvalidWorkload("workload lists no processes".into()))?;

            let action = if engine.contains(process.pid) {
                let released = engine.deallocate(process.pid)?;
                deallocations += 1;
                StepAction::Deallocated {
                    pid: process.pid,
                    size: released,
                }
            } else {
                match engine.allocate(process.pid, process.size, strategy) {
                    Ok(start) => {
                        allocations += 1;
                        StepAction::Allocated {
                            pid: process.pid,
                            size: process.size,
                            start,
                        }
                    }
                    Err(FitError::AllocationFailed { pid, size }) => {
                        failures += 1;
                        StepAction::AllocationFailed { pid, size }
                    }
                    Err(err) => return Err(err),
                }
            };

            steps.push(StepReport {
                step,
                action,
                memory: engine.table().owner_ids(),
                fragmentation: engine.fragmentation_count(min_size),
            });
        }

        Ok(StrategyReport {
            strategy,
            seed: self.seed,
            steps,
            allocations,
            failures,
            deallocations,
            final_fragmentation: engine.fragmentation_count(min_size),
            final_stats: engine.stats(),
        })
    }
}
