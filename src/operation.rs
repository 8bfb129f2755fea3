//! The pluggable unit of work a single node invokes.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ClientRequest, Fragment, FragmentResult};

/// Immutable input of one operation invocation. The engine hands every
/// invocation its own fragment copy, so operations can never mutate the live
/// fragment observably; only the returned
/// [FragmentResult](crate::types::FragmentResult) is honored.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentContext {
  pub fragment: Fragment,
  pub client_request: ClientRequest,
}

impl FragmentContext {
  pub fn new(fragment: Fragment, client_request: ClientRequest) -> Self {
    Self {
      fragment,
      client_request,
    }
  }
}

/// Failure of one operation invocation.
///
/// Fatal errors abort the whole task. Everything else is resolved through the
/// graph's `_error` edge; timeouts are only kept apart for the event log.
#[derive(Debug, Clone, Error)]
pub enum OperationError {
  /// Unrecoverable; aborts the owning task and, inside a composite node, the
  /// siblings' results.
  #[error("fatal node error: {0}")]
  Fatal(String),
  /// The operation did not deliver its result in time.
  #[error("operation timed out: {0}")]
  Timeout(String),
  /// Any other failure.
  #[error("operation failed: {0}")]
  Recoverable(String),
}

impl OperationError {
  /// The classification the engine consults: fatal errors are never routed
  /// through the graph's error edge.
  pub fn is_fatal(&self) -> bool {
    matches!(self, OperationError::Fatal(_))
  }
}

/// An asynchronous unit of work attached to a single node.
#[async_trait]
pub trait FragmentOperation: Send + Sync {
  async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, OperationError>;
}

/// Wraps an async closure as a [FragmentOperation].
pub fn operation_fn<F, Fut>(f: F) -> Arc<dyn FragmentOperation>
where
  F: Fn(FragmentContext) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<FragmentResult, OperationError>> + Send + 'static,
{
  Arc::new(FnOperation(f))
}

struct FnOperation<F>(F);

#[async_trait]
impl<F, Fut> FragmentOperation for FnOperation<F>
where
  F: Fn(FragmentContext) -> Fut + Send + Sync,
  Fut: Future<Output = Result<FragmentResult, OperationError>> + Send,
{
  async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, OperationError> {
    (self.0)(context).await
  }
}
