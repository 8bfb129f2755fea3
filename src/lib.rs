//! # fragment-engine
//!
//! Task graph execution engine for asynchronous fragment processing.
//!
//! ## Architecture
//!
//! A [Task] names a graph of [Node]s applied to one [Fragment]. [TaskEngine]
//! traverses the graph: a single node invokes one [FragmentOperation] and
//! routes on the returned transition; a composite node forks its children,
//! joins them and merges their results in declaration order. Every node visit
//! is recorded in an append-only [EventLog]. [FragmentsEngine] batches many
//! independent fragments and returns their terminal [FragmentEvent]s in
//! submission order.

pub mod fragments_engine;
pub mod operation;
#[cfg(test)]
mod operation_test;
pub mod task_engine;
pub mod types;

pub use fragments_engine::{FragmentsEngine, TaskedFragment};
pub use operation::{FragmentContext, FragmentOperation, OperationError, operation_fn};
pub use task_engine::{TaskEngine, TaskFatalError};
pub use types::{
  ClientRequest, CompositeNode, ERROR_TRANSITION, EventLog, EventLogEntry, EventStatus, Fragment,
  FragmentEvent, FragmentResult, Node, NodeStatus, Payload, SUCCESS_TRANSITION, SingleNode, Task,
};
