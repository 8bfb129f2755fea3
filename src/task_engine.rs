//! Task graph interpreter: traverses one task's node graph for one fragment.
//!
//! Recoverable operation failures are resolved through the graph's own error
//! edges; only fatal failures reject the returned future, carrying the partial
//! [FragmentEvent] for diagnostics.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use thiserror::Error;
use tracing::{error, instrument, trace, warn};

use crate::operation::{FragmentContext, OperationError};
use crate::types::{
  ClientRequest, CompositeNode, ERROR_TRANSITION, EventStatus, FragmentEvent, FragmentResult,
  Node, SUCCESS_TRANSITION, SingleNode, Task,
};

/// Unrecoverable task failure.
///
/// Carries the partially processed event (fragment, status and the log entries
/// recorded up to the abort) and every fatal cause observed; parallel branches
/// can contribute more than one.
#[derive(Debug, Error)]
#[error("task '{task}' aborted by fatal node error")]
pub struct TaskFatalError {
  /// Name of the aborted task.
  pub task: String,
  /// Event at the time of the abort.
  pub event: FragmentEvent,
  /// All fatal causes observed.
  pub causes: Vec<OperationError>,
}

/// Traverses a task graph for one fragment, producing a terminal
/// [FragmentEvent].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskEngine;

impl TaskEngine {
  pub fn new() -> Self {
    Self
  }

  /// Runs `task` against one fragment context until the graph terminates.
  ///
  /// A task without a root node yields an `UNPROCESSED` event with an empty
  /// log. Errs only when a node raises a fatal error.
  #[instrument(level = "trace", skip(self, context), fields(task = task.name()))]
  pub async fn start(
    &self,
    task: &Task,
    context: FragmentContext,
  ) -> Result<FragmentEvent, TaskFatalError> {
    let mut execution = TaskExecution {
      task_name: task.name().to_string(),
      client_request: context.client_request,
      event: FragmentEvent::new(task.name(), context.fragment),
    };
    let Some(root) = task.root() else {
      return Ok(execution.event);
    };
    match self.process_node(&mut execution, Arc::clone(root)).await {
      Ok(()) => Ok(execution.event),
      Err(causes) => {
        error!(
          task = %execution.task_name,
          causes = causes.len(),
          "task aborted by fatal node error"
        );
        Err(TaskFatalError {
          task: execution.task_name,
          event: execution.event,
          causes,
        })
      }
    }
  }

  /// Processes `node` and every successor its transitions route to, until a
  /// branch terminates. Boxed because composite children re-enter it.
  fn process_node<'a>(
    &'a self,
    execution: &'a mut TaskExecution,
    node: Arc<Node>,
  ) -> BoxFuture<'a, Result<(), Vec<OperationError>>> {
    async move {
      let mut current = Some(node);
      while let Some(node) = current.take() {
        trace!(task = %execution.task_name, node = node.id(), "processing graph node");
        let transition = match &*node {
          Node::Single(single) => self.execute_single(execution, single).await?,
          Node::Composite(composite) => {
            match self.execute_composite(execution, composite).await? {
              Some(transition) => transition,
              // Empty parallel group: terminal, no edges followed.
              None => break,
            }
          }
        };
        current = execution.route(&node, &transition);
      }
      Ok(())
    }
    .boxed()
  }

  async fn execute_single(
    &self,
    execution: &mut TaskExecution,
    node: &SingleNode,
  ) -> Result<String, Vec<OperationError>> {
    execution.event.log.node_started(&node.id);
    let context = FragmentContext::new(
      execution.event.fragment.clone(),
      execution.client_request.clone(),
    );
    match node.operation.apply(context).await {
      Ok(result) => Ok(execution.handle_success(&node.id, result)),
      Err(error) => execution.handle_error(&node.id, error),
    }
  }

  /// Fork/join: runs all children concurrently on isolated event copies, then
  /// merges fragment, status and logs in declaration order.
  async fn execute_composite(
    &self,
    execution: &mut TaskExecution,
    node: &CompositeNode,
  ) -> Result<Option<String>, Vec<OperationError>> {
    execution.event.log.node_started(&node.id);
    if node.children.is_empty() {
      execution.event.status = EventStatus::Unprocessed;
      return Ok(None);
    }

    let engine = *self;
    let pre_fork_body = execution.event.fragment.body.clone();
    let mut handles = Vec::with_capacity(node.children.len());
    for child in &node.children {
      let child = Arc::clone(child);
      let mut branch = TaskExecution {
        task_name: execution.task_name.clone(),
        client_request: execution.client_request.clone(),
        event: FragmentEvent::new(&execution.task_name, execution.event.fragment.clone()),
      };
      handles.push(tokio::spawn(async move {
        let outcome = engine.process_node(&mut branch, child).await;
        (branch.event, outcome)
      }));
    }

    let mut branch_events = Vec::with_capacity(node.children.len());
    let mut fatal_events = Vec::new();
    let mut fatal_causes = Vec::new();
    for joined in join_all(handles).await {
      match joined {
        Ok((event, Ok(()))) => branch_events.push(event),
        Ok((event, Err(causes))) => {
          fatal_events.push(event);
          fatal_causes.extend(causes);
        }
        Err(join_error) => {
          fatal_causes.push(OperationError::Fatal(format!(
            "parallel branch terminated abnormally: {join_error}"
          )));
        }
      }
    }
    if !fatal_causes.is_empty() {
      // Sibling results are discarded; fatal branches keep their log entries
      // so the abort stays diagnosable.
      for event in &fatal_events {
        execution.event.log.append_all(&event.log);
      }
      execution.event.status = EventStatus::Failure;
      return Err(fatal_causes);
    }

    let mut merged_status = EventStatus::Unprocessed;
    for event in &branch_events {
      execution
        .event
        .fragment
        .merge_in_payload(&event.fragment.payload);
      if event.fragment.body != pre_fork_body {
        execution.event.fragment.body = event.fragment.body.clone();
      }
      merged_status = reduce_status(merged_status, event.status);
      execution.event.log.append_all(&event.log);
    }
    execution.event.status = merged_status;

    let transition = merged_status.default_transition();
    if merged_status == EventStatus::Failure {
      execution.event.log.composite_error(&node.id, transition);
    } else {
      execution.event.log.composite_success(&node.id, transition);
    }
    Ok(Some(transition.to_string()))
  }
}

/// Reduces two branch statuses into one composite status: any failure fails the
/// composite, otherwise any success makes it successful.
pub(crate) fn reduce_status(left: EventStatus, right: EventStatus) -> EventStatus {
  use EventStatus::{Failure, Success, Unprocessed};
  match (left, right) {
    (Failure, _) | (_, Failure) => Failure,
    (Unprocessed, Unprocessed) => Unprocessed,
    _ => Success,
  }
}

/// Mutable state of one task execution: the accumulated event plus the request
/// shared by all operation invocations.
struct TaskExecution {
  task_name: String,
  client_request: ClientRequest,
  event: FragmentEvent,
}

impl TaskExecution {
  /// Consumes a delivered result: the event takes the returned fragment, the
  /// node's completion is logged and the returned transition drives routing.
  fn handle_success(&mut self, node_id: &str, result: FragmentResult) -> String {
    self.event.status = EventStatus::Success;
    if result.transition == ERROR_TRANSITION {
      self
        .event
        .log
        .error(node_id, ERROR_TRANSITION, result.node_log.clone());
    } else {
      self.event.log.success(node_id, &result);
    }
    self.event.fragment = result.fragment;
    result.transition
  }

  /// Classifies an operation failure: fatal aborts the task, anything else is
  /// re-routed as if the operation had returned the `_error` transition with an
  /// unchanged fragment.
  fn handle_error(
    &mut self,
    node_id: &str,
    error: OperationError,
  ) -> Result<String, Vec<OperationError>> {
    self.event.status = EventStatus::Failure;
    match &error {
      OperationError::Timeout(_) => self.event.log.timeout(node_id),
      _ => self.event.log.error(node_id, ERROR_TRANSITION, None),
    }
    if error.is_fatal() {
      return Err(vec![error]);
    }
    warn!(
      task = %self.task_name,
      node = node_id,
      %error,
      "node failed, resolving via the error transition"
    );
    Ok(ERROR_TRANSITION.to_string())
  }

  /// Looks up the successor for `transition`. A missing edge terminates the
  /// branch; a missing edge for a non-success transition is a failure, logged
  /// as `UNSUPPORTED_TRANSITION`.
  fn route(&mut self, node: &Node, transition: &str) -> Option<Arc<Node>> {
    match node.next(transition) {
      Some(next) => Some(Arc::clone(next)),
      None => {
        if transition != SUCCESS_TRANSITION {
          self.event.status = EventStatus::Failure;
          self.event.log.unsupported(node.id(), transition);
        }
        None
      }
    }
  }
}
