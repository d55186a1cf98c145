use thiserror::Error;

/// Process identifier as stored in the block table
pub type ProcessId = u32;

#[derive(Error, Debug)]
pub enum FitError {
    #[error("Invalid capacity: {0} (memory must hold at least one block)")]
    InvalidCapacity(usize),

    #[error("Allocation failed: process {pid} ({size} blocks) does not fit")]
    AllocationFailed { pid: ProcessId, size: usize },

    #[error("Process not found: {0}")]
    ProcessNotFound(ProcessId),

    #[error("Block index {index} out of range (capacity {capacity})")]
    OutOfRange { index: usize, capacity: usize },

    #[error("Invalid process ID: {0} (0 is reserved for free blocks)")]
    InvalidProcessId(ProcessId),

    #[error("Process already resident: {0}")]
    ProcessAlreadyResident(ProcessId),

    #[error("Unknown placement strategy: {0}")]
    UnknownStrategy(String),

    #[error("Invalid workload: {0}")]
    InvalidWorkload(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FitError>;
