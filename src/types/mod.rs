//! Data model of the fragment task engine.
//!
//! Graph structures ([Task], [Node]) are immutable and shared across concurrent
//! executions; [FragmentEvent] and [EventLog] are created fresh per fragment
//! per execution.

mod client_request;
mod event_log;
#[cfg(test)]
mod event_log_test;
mod fragment;
#[cfg(test)]
mod fragment_test;
mod fragment_event;
mod fragment_result;
mod node;

pub use client_request::ClientRequest;
pub use event_log::{EventLog, EventLogEntry, NodeStatus};
pub use fragment::{Fragment, Payload};
pub use fragment_event::{EventStatus, FragmentEvent};
pub use fragment_result::{ERROR_TRANSITION, FragmentResult, SUCCESS_TRANSITION};
pub use node::{CompositeNode, Node, SingleNode, Task};
