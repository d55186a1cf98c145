//! Allocator engine internals

pub mod allocator;
pub mod engine;
pub mod error;
pub mod simulation;
pub mod table;
pub mod workload;
