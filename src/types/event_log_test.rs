//! Tests for `event_log`.

use serde_json::json;

use crate::types::{
  EventLog, Fragment, FragmentResult, NodeStatus, Payload, SUCCESS_TRANSITION,
};

fn sample_result() -> FragmentResult {
  FragmentResult::success(Fragment::new("snippet", Payload::new(), "body"))
}

#[test]
fn entries_are_recorded_in_append_order() {
  let mut log = EventLog::new("task");
  log.node_started("a");
  log.success("a", &sample_result());
  log.node_started("b");

  let nodes: Vec<&str> = log.entries().iter().map(|e| e.node.as_str()).collect();
  assert_eq!(nodes, vec!["a", "a", "b"]);
  assert_eq!(log.entries()[0].status, NodeStatus::Unprocessed);
  assert_eq!(log.entries()[1].status, NodeStatus::Success);
}

#[test]
fn success_entry_records_transition_and_node_log() {
  let mut log = EventLog::new("task");
  let result = sample_result().with_node_log(json!({"debug": "ok"}));
  log.success("a", &result);

  let entry = &log.entries()[0];
  assert_eq!(entry.task, "task");
  assert_eq!(entry.transition.as_deref(), Some(SUCCESS_TRANSITION));
  assert_eq!(entry.node_log, Some(json!({"debug": "ok"})));
  assert!(entry.timestamp > 0);
}

#[test]
fn timeout_entry_carries_no_transition() {
  let mut log = EventLog::new("task");
  log.timeout("slow");
  let entry = &log.entries()[0];
  assert_eq!(entry.status, NodeStatus::Timeout);
  assert!(entry.transition.is_none());
}

#[test]
fn append_all_copies_entries_instead_of_sharing_storage() {
  let mut branch = EventLog::new("task");
  branch.node_started("child");

  let mut parent = EventLog::new("task");
  parent.node_started("composite");
  parent.append_all(&branch);
  branch.node_started("late");

  assert_eq!(parent.entries().len(), 2);
  assert_eq!(branch.entries().len(), 2);
  assert_eq!(parent.entries()[1].node, "child");
}

#[test]
fn log_round_trips_through_json() {
  let mut log = EventLog::new("task");
  log.node_started("a");
  log.success("a", &sample_result());
  log.unsupported("a", "custom");
  log.error("b", "_error", Some(json!({"cause": "boom"})));

  let json = serde_json::to_string(&log).unwrap();
  let parsed: EventLog = serde_json::from_str(&json).unwrap();

  let tuples = |log: &EventLog| -> Vec<(String, String, NodeStatus, Option<String>)> {
    log
      .entries()
      .iter()
      .map(|e| (e.task.clone(), e.node.clone(), e.status, e.transition.clone()))
      .collect()
  };
  assert_eq!(tuples(&parsed), tuples(&log));
  assert_eq!(parsed, log);
}

#[test]
fn statuses_serialize_in_screaming_snake_case() {
  let mut log = EventLog::new("task");
  log.unsupported("a", "custom");
  let value = serde_json::to_value(&log).unwrap();
  assert_eq!(value["entries"][0]["status"], json!("UNSUPPORTED_TRANSITION"));
}
