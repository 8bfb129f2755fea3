//! Immutable description of the client request a fragment belongs to.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The HTTP request the processed fragments were requested for. The engine
/// passes it through to operations untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRequest {
  pub path: String,
  pub method: String,
  pub headers: HashMap<String, String>,
  pub params: HashMap<String, String>,
}

impl ClientRequest {
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      ..Self::default()
    }
  }
}
