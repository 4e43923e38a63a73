//! Persisted record models. Each one is a protobuf message implementing
//! `Versioner`, so it can pass through the envelope.

pub mod cell_presence;
pub mod task;

pub use cell_presence::{CellCapacity, CellPresence, Provider};
pub use task::{Task, TaskDefinition, TaskState};
