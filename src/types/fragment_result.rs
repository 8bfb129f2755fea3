//! Result of one operation invocation: updated fragment plus the selected transition.

use serde_json::Value;

use super::Fragment;

/// Default transition: continue along the success edge.
pub const SUCCESS_TRANSITION: &str = "_success";

/// Conventional failure signal, routed through the graph's error edge.
pub const ERROR_TRANSITION: &str = "_error";

/// What a [FragmentOperation](crate::operation::FragmentOperation) delivers:
/// the updated fragment, the transition selecting the next node and an optional
/// opaque debug payload recorded in the event log.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentResult {
  pub fragment: Fragment,
  pub transition: String,
  pub node_log: Option<Value>,
}

impl FragmentResult {
  pub fn new(fragment: Fragment, transition: impl Into<String>) -> Self {
    Self {
      fragment,
      transition: transition.into(),
      node_log: None,
    }
  }

  /// Result continuing along the default success edge.
  pub fn success(fragment: Fragment) -> Self {
    Self::new(fragment, SUCCESS_TRANSITION)
  }

  pub fn with_node_log(mut self, node_log: Value) -> Self {
    self.node_log = Some(node_log);
    self
  }
}
