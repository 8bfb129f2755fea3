//! Task graph nodes: single operation steps and parallel composites.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::operation::FragmentOperation;

use super::fragment_result::{ERROR_TRANSITION, SUCCESS_TRANSITION};

/// One step of a task graph.
///
/// Graphs are built once, hold no execution-local state and are shared across
/// concurrent executions behind [Arc].
pub enum Node {
  /// One operation with a transition table selecting the next node.
  Single(SingleNode),
  /// Parallel sub-graphs joined before an optional continuation.
  Composite(CompositeNode),
}

impl Node {
  pub fn id(&self) -> &str {
    match self {
      Node::Single(node) => &node.id,
      Node::Composite(node) => &node.id,
    }
  }

  /// Looks up the node the given transition routes to.
  pub fn next(&self, transition: &str) -> Option<&Arc<Node>> {
    match self {
      Node::Single(node) => node.transitions.get(transition),
      Node::Composite(node) => match transition {
        SUCCESS_TRANSITION => node.on_success.as_ref(),
        ERROR_TRANSITION => node.on_error.as_ref(),
        _ => None,
      },
    }
  }
}

impl fmt::Debug for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Node::Single(node) => node.fmt(f),
      Node::Composite(node) => node.fmt(f),
    }
  }
}

/// A node owning one asynchronous operation.
pub struct SingleNode {
  pub id: String,
  pub operation: Arc<dyn FragmentOperation>,
  pub transitions: HashMap<String, Arc<Node>>,
}

impl SingleNode {
  pub fn new(id: impl Into<String>, operation: Arc<dyn FragmentOperation>) -> Self {
    Self {
      id: id.into(),
      operation,
      transitions: HashMap::new(),
    }
  }

  /// Adds one outgoing edge: `transition` routes to `next`.
  pub fn with_transition(mut self, transition: impl Into<String>, next: Arc<Node>) -> Self {
    self.transitions.insert(transition.into(), next);
    self
  }

  pub fn node(self) -> Arc<Node> {
    Arc::new(Node::Single(self))
  }
}

impl fmt::Debug for SingleNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SingleNode")
      .field("id", &self.id)
      .field("transitions", &self.transitions)
      .finish_non_exhaustive()
  }
}

/// A node running its children concurrently, then merging their results before
/// routing to the optional `on_success`/`on_error` continuation.
#[derive(Debug)]
pub struct CompositeNode {
  pub id: String,
  /// Parallel branches, in declaration order. Declaration order also decides
  /// the merge, not completion order.
  pub children: Vec<Arc<Node>>,
  pub on_success: Option<Arc<Node>>,
  pub on_error: Option<Arc<Node>>,
}

impl CompositeNode {
  pub fn new(id: impl Into<String>, children: Vec<Arc<Node>>) -> Self {
    Self {
      id: id.into(),
      children,
      on_success: None,
      on_error: None,
    }
  }

  pub fn with_on_success(mut self, next: Arc<Node>) -> Self {
    self.on_success = Some(next);
    self
  }

  pub fn with_on_error(mut self, next: Arc<Node>) -> Self {
    self.on_error = Some(next);
    self
  }

  pub fn node(self) -> Arc<Node> {
    Arc::new(Node::Composite(self))
  }
}

/// A named, reusable graph applied to one fragment.
#[derive(Debug, Clone)]
pub struct Task {
  name: String,
  root: Option<Arc<Node>>,
}

impl Task {
  pub fn new(name: impl Into<String>, root: Arc<Node>) -> Self {
    Self {
      name: name.into(),
      root: Some(root),
    }
  }

  /// Task with no graph; running it leaves the fragment unprocessed.
  pub fn empty(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      root: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn root(&self) -> Option<&Arc<Node>> {
    self.root.as_ref()
  }
}
