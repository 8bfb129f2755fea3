//! Append-only audit trail of node visits and their outcomes.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FragmentResult;

/// Status recorded for one node execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
  Unprocessed,
  Success,
  Error,
  UnsupportedTransition,
  Timeout,
}

/// One recorded node execution attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
  /// Name of the task the node belongs to.
  pub task: String,
  /// Id of the visited node.
  pub node: String,
  pub status: NodeStatus,
  /// Transition the node resolved to, when one was delivered.
  pub transition: Option<String>,
  /// Opaque per-node debug payload delivered by the operation.
  pub node_log: Option<Value>,
  /// Milliseconds since the Unix epoch.
  pub timestamp: i64,
}

/// Ordered, append-only record of node visits. Owned by exactly one
/// [FragmentEvent](super::FragmentEvent); merging copies entries, storage is
/// never shared across branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
  task_name: String,
  entries: Vec<EventLogEntry>,
}

impl EventLog {
  pub fn new(task_name: impl Into<String>) -> Self {
    Self {
      task_name: task_name.into(),
      entries: Vec::new(),
    }
  }

  pub fn task_name(&self) -> &str {
    &self.task_name
  }

  /// Recorded entries in creation order.
  pub fn entries(&self) -> &[EventLogEntry] {
    &self.entries
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub(crate) fn node_started(&mut self, node: &str) {
    self.push(node, NodeStatus::Unprocessed, None, None);
  }

  pub(crate) fn success(&mut self, node: &str, result: &FragmentResult) {
    self.push(
      node,
      NodeStatus::Success,
      Some(result.transition.clone()),
      result.node_log.clone(),
    );
  }

  pub(crate) fn error(&mut self, node: &str, transition: &str, node_log: Option<Value>) {
    self.push(node, NodeStatus::Error, Some(transition.to_string()), node_log);
  }

  pub(crate) fn timeout(&mut self, node: &str) {
    self.push(node, NodeStatus::Timeout, None, None);
  }

  pub(crate) fn unsupported(&mut self, node: &str, transition: &str) {
    self.push(
      node,
      NodeStatus::UnsupportedTransition,
      Some(transition.to_string()),
      None,
    );
  }

  pub(crate) fn composite_success(&mut self, node: &str, transition: &str) {
    self.push(node, NodeStatus::Success, Some(transition.to_string()), None);
  }

  pub(crate) fn composite_error(&mut self, node: &str, transition: &str) {
    self.push(node, NodeStatus::Error, Some(transition.to_string()), None);
  }

  /// Copies all of `other`'s entries to the end of this log.
  pub(crate) fn append_all(&mut self, other: &EventLog) {
    self.entries.extend(other.entries.iter().cloned());
  }

  fn push(
    &mut self,
    node: &str,
    status: NodeStatus,
    transition: Option<String>,
    node_log: Option<Value>,
  ) {
    self.entries.push(EventLogEntry {
      task: self.task_name.clone(),
      node: node.to_string(),
      status,
      transition,
      node_log,
      timestamp: Utc::now().timestamp_millis(),
    });
  }
}
