//! Fragment: the content unit flowing through a task graph.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// JSON object carried by a fragment. Keys are unique, insertion order is kept.
pub type Payload = Map<String, Value>;

/// The content unit processed by a task graph: a body plus a JSON payload.
///
/// The engine never looks inside `body` or `payload`; only operations read and
/// write fragment content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
  /// Stable identity, used to restore request order after concurrent processing.
  pub id: String,
  /// Fragment type, e.g. `snippet`.
  #[serde(rename = "type")]
  pub fragment_type: String,
  /// Read-mostly configuration fixed when the fragment was created.
  pub configuration: Payload,
  /// Raw content.
  pub body: String,
  /// Data produced by operations along the graph.
  pub payload: Payload,
}

impl Fragment {
  pub fn new(
    fragment_type: impl Into<String>,
    configuration: Payload,
    body: impl Into<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      fragment_type: fragment_type.into(),
      configuration,
      body: body.into(),
      payload: Payload::new(),
    }
  }

  /// Inserts one payload entry, replacing any previous value under the key.
  pub fn append_payload(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
    self.payload.insert(key.into(), value);
    self
  }

  /// Copies all entries of `other` into this payload. Last writer wins per key.
  pub fn merge_in_payload(&mut self, other: &Payload) -> &mut Self {
    for (key, value) in other {
      self.payload.insert(key.clone(), value.clone());
    }
    self
  }

  pub fn set_body(&mut self, body: impl Into<String>) -> &mut Self {
    self.body = body.into();
    self
  }
}
