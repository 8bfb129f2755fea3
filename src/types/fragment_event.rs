//! Per-fragment execution accumulator: fragment, status and event log.

use serde::{Deserialize, Serialize};

use super::fragment_result::{ERROR_TRANSITION, SUCCESS_TRANSITION};
use super::{EventLog, Fragment};

/// Terminal status of one fragment's task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
  Unprocessed,
  Success,
  Failure,
}

impl EventStatus {
  /// Transition a composite node routes with after its children merged.
  pub(crate) fn default_transition(self) -> &'static str {
    match self {
      EventStatus::Failure => ERROR_TRANSITION,
      _ => SUCCESS_TRANSITION,
    }
  }
}

/// Accumulator carried through one task's execution. Created fresh per
/// fragment per [TaskEngine::start](crate::task_engine::TaskEngine::start) and
/// handed to the caller once the graph terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentEvent {
  /// Current fragment, possibly replaced by operations along the graph.
  pub fragment: Fragment,
  pub status: EventStatus,
  pub log: EventLog,
}

impl FragmentEvent {
  pub fn new(task_name: impl Into<String>, fragment: Fragment) -> Self {
    Self {
      fragment,
      status: EventStatus::Unprocessed,
      log: EventLog::new(task_name),
    }
  }

  /// Event for a fragment that had no applicable task.
  pub fn unprocessed(fragment: Fragment) -> Self {
    Self::new("", fragment)
  }
}
