//! Simulation workload configuration
//!
//! A workload describes the memory size, how many random operations to run,
//! and the fixed set of processes the driver draws from. Workloads load from
//! TOML (default) or JSON:
//!
//! ```toml
//! capacity = 32
//! operations = 30
//! seed = 7
//!
//! [[processes]]
//! pid = 1
//! size = 5
//! ```

use crate::error::{FitError, ProcessId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A process the driver may allocate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub pid: ProcessId,
    /// Blocks requested on every allocation
    pub size: usize,
}

impl ProcessSpec {
    pub fn new(pid: ProcessId, size: usize) -> Self {
        ProcessSpec { pid, size }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Memory size in blocks
    pub capacity: usize,

    /// Number of random steps per strategy
    pub operations: usize,

    /// RNG seed; a fresh entropy seed is drawn when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    pub processes: Vec<ProcessSpec>,
}

impl Default for Workload {
    /// 32 blocks, 30 operations, ten processes of 2 to 8 blocks
    fn default() -> Self {
        let processes = [
            (1, 5),
            (2, 4),
            (3, 2),
            (4, 5),
            (5, 8),
            (6, 3),
            (7, 5),
            (8, 8),
            (9, 2),
            (10, 6),
        ]
        .into_iter()
        .map(|(pid, size)| ProcessSpec::new(pid, size))
        .collect();

        Workload {
            capacity: 32,
            operations: 30,
            seed: None,
            processes,
        }
    }
}

impl Workload {
    /// Parse and validate a TOML workload
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let workload: Workload = toml::from_str(source)?;
        workload.validate()?;
        Ok(workload)
    }

    /// Parse and validate a JSON workload
    pub fn from_json_str(source: &str) -> Result<Self> {
        let workload: Workload = serde_json::from_str(source)?;
        workload.validate()?;
        Ok(workload)
    }

    /// Load a workload file; `.json` files are read as JSON, anything else as TOML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_toml_str(&source)
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of operations
    pub fn with_operations(mut self, operations: usize) -> Self {
        self.operations = operations;
        self
    }

    /// Set the memory size
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Validate all fields
    ///
    /// Checks:
    /// - Capacity is at least one block
    /// - At least one process is listed
    /// - Process IDs are non-zero and unique
    /// - Process sizes are non-zero
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(FitError::InvalidCapacity(self.capacity));
        }

        if self.processes.is_empty() {
            return Err(FitError::InvalidWorkload(
                "workload lists no processes".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for process in &self.processes {
            if process.pid == 0 {
                return Err(FitError::InvalidProcessId(process.pid));
            }
            if process.size == 0 {
                return Err(FitError::InvalidWorkload(format!(
                    "process {} has size 0",
                    process.pid
                )));
            }
            if !seen.insert(process.pid) {
                return Err(FitError::InvalidWorkload(format!(
                    "process {} listed more than once",
                    process.pid
                )));
            }
        }

        Ok(())
    }

    /// Smallest request size in the workload
    ///
    /// Free runs below this size are counted as external fragmentation.
    pub fn min_process_size(&self) -> usize {
        self.processes
            .iter()
            .map(|process| process.size)
            .min()
            .unwrap_or(1)
    }

    /// Size requested by `pid`, if listed
    pub fn size_of(&self, pid: ProcessId) -> Option<usize> {
        self.processes
            .iter()
            .find(|process| process.pid == pid)
            .map(|process| process.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_workload() {
        let workload = Workload::default();
        assert_eq!(workload.capacity, 32);
        assert_eq!(workload.operations, 30);
        assert_eq!(workload.processes.len(), 10);
        assert_eq!(workload.min_process_size(), 2);
        assert_eq!(workload.size_of(5), Some(8));
        assert!(workload.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() -> Result<()> {
        let workload = Workload::from_toml_str(
            r#"
            capacity = 16
            operations = 12
            seed = 42

            [[processes]]
            pid = 1
            size = 3

            [[processes]]
            pid = 2
            size = 7
            "#,
        )?;

        assert_eq!(workload.capacity, 16);
        assert_eq!(workload.seed, Some(42));
        assert_eq!(
            workload.processes,
            vec![ProcessSpec::new(1, 3), ProcessSpec::new(2, 7)]
        );
        assert_eq!(workload.min_process_size(), 3);

        Ok(())
    }

    #[test]
    fn test_parse_json() -> Result<()> {
        let workload = Workload::from_json_str(
            r#"{"capacity": 8, "operations": 4, "processes": [{"pid": 3, "size": 2}]}"#,
        )?;

        assert_eq!(workload.seed, None);
        assert_eq!(workload.size_of(3), Some(2));

        Ok(())
    }

    #[test]
    fn test_toml_round_trip() -> Result<()> {
        let workload = Workload::default().with_seed(9);
        let text = workload.to_toml_string()?;
        assert_eq!(Workload::from_toml_str(&text)?, workload);
        Ok(())
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let workload = Workload::default().with_capacity(0);
        assert!(matches!(
            workload.validate(),
            Err(FitError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_rejects_empty_process_list() {
        let workload = Workload {
            processes: Vec::new(),
            ..Workload::default()
        };
        assert!(matches!(
            workload.validate(),
            Err(FitError::InvalidWorkload(_))
        ));
    }

    #[test]
    fn test_rejects_bad_processes() {
        let zero_pid = Workload {
            processes: vec![ProcessSpec::new(0, 2)],
            ..Workload::default()
        };
        assert!(matches!(
            zero_pid.validate(),
            Err(FitError::InvalidProcessId(0))
        ));

        let zero_size = Workload {
            processes: vec![ProcessSpec::new(1, 0)],
            ..Workload::default()
        };
        assert!(matches!(
            zero_size.validate(),
            Err(FitError::InvalidWorkload(_))
        ));

        let duplicate = Workload {
            processes: vec![ProcessSpec::new(1, 2), ProcessSpec::new(1, 3)],
            ..Workload::default()
        };
        assert!(matches!(
            duplicate.validate(),
            Err(FitError::InvalidWorkload(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Workload::from_toml_str("capacity = \"many\"");
        assert!(matches!(result, Err(FitError::Toml(_))));
    }
}
