//! Map-reduce orchestrator: runs many per-fragment task graphs concurrently
//! and reassembles the results in submission order.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{instrument, trace};

use crate::operation::FragmentContext;
use crate::task_engine::{TaskEngine, TaskFatalError};
use crate::types::{EventStatus, FragmentEvent, Task};

/// One unit of work for [FragmentsEngine::execute]: a fragment context and the
/// task graph assigned to it, if any.
#[derive(Debug, Clone)]
pub struct TaskedFragment {
  pub task: Option<Task>,
  pub context: FragmentContext,
}

impl TaskedFragment {
  pub fn new(task: Task, context: FragmentContext) -> Self {
    Self {
      task: Some(task),
      context,
    }
  }

  /// Fragment with no applicable task; it passes through unprocessed.
  pub fn without_task(context: FragmentContext) -> Self {
    Self {
      task: None,
      context,
    }
  }
}

/// Runs independent per-fragment task graphs concurrently.
///
/// Fragments never share data or control flow; a fatal failure is reported for
/// its own fragment only and does not disturb siblings in the same batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentsEngine {
  task_engine: TaskEngine,
}

impl FragmentsEngine {
  pub fn new() -> Self {
    Self {
      task_engine: TaskEngine::new(),
    }
  }

  /// Processes all fragments concurrently. The result list matches the input
  /// order by fragment id, regardless of completion order.
  ///
  /// Panics if a terminal event's fragment id cannot be matched to any input
  /// fragment; operations must keep fragment ids stable, so this is an internal
  /// invariant violation and not a user-facing failure.
  #[instrument(level = "trace", skip_all, fields(fragments = fragments.len()))]
  pub async fn execute(
    &self,
    fragments: Vec<TaskedFragment>,
  ) -> Vec<Result<FragmentEvent, TaskFatalError>> {
    let incoming_order: Vec<String> = fragments
      .iter()
      .map(|item| item.context.fragment.id.clone())
      .collect();

    let engine = self.task_engine;
    let results = join_all(fragments.into_iter().map(|item| async move {
      match item.task {
        Some(task) => engine.start(&task, item.context).await,
        None => Ok(FragmentEvent::unprocessed(item.context.fragment)),
      }
    }))
    .await;
    trace!(
      processed = results
        .iter()
        .filter(|r| !matches!(r, Ok(event) if event.status == EventStatus::Unprocessed))
        .count(),
      "task engine processed fragments"
    );

    restore_order(results, &incoming_order)
  }
}

/// Re-projects results into the submission order, keyed by fragment id.
/// Duplicate ids resolve in completion order within the duplicate group.
fn restore_order(
  results: Vec<Result<FragmentEvent, TaskFatalError>>,
  incoming_order: &[String],
) -> Vec<Result<FragmentEvent, TaskFatalError>> {
  let mut by_id: HashMap<String, Vec<Result<FragmentEvent, TaskFatalError>>> = HashMap::new();
  for result in results {
    let id = match &result {
      Ok(event) => event.fragment.id.clone(),
      Err(fatal) => fatal.event.fragment.id.clone(),
    };
    by_id.entry(id).or_default().push(result);
  }
  incoming_order
    .iter()
    .map(|id| {
      by_id
        .get_mut(id)
        .filter(|slot| !slot.is_empty())
        .map(|slot| slot.remove(0))
        .unwrap_or_else(|| panic!("could not find result for fragment with id: {id}"))
    })
    .collect()
}
