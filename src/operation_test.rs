//! Tests for `operation`.

use serde_json::json;

use crate::operation::{FragmentContext, FragmentOperation, OperationError, operation_fn};
use crate::types::{ClientRequest, Fragment, FragmentResult, Payload};

fn context() -> FragmentContext {
  FragmentContext::new(
    Fragment::new("snippet", Payload::new(), "body"),
    ClientRequest::new("/content/page.html"),
  )
}

#[test]
fn only_fatal_errors_classify_as_fatal() {
  assert!(OperationError::Fatal("broken contract".to_string()).is_fatal());
  assert!(!OperationError::Timeout("after 100 ms".to_string()).is_fatal());
  assert!(!OperationError::Recoverable("upstream 503".to_string()).is_fatal());
}

#[test]
fn operation_fn_applies_the_closure() {
  let operation = operation_fn(|mut context: FragmentContext| async move {
    context.fragment.append_payload("answer", json!(42));
    Ok(FragmentResult::success(context.fragment))
  });

  let result = tokio_test::block_on(operation.apply(context())).unwrap();
  assert_eq!(result.fragment.payload.get("answer"), Some(&json!(42)));
}

#[test]
fn operation_errors_render_their_cause() {
  let error = OperationError::Timeout("no response after 100 ms".to_string());
  assert_eq!(error.to_string(), "operation timed out: no response after 100 ms");
}
