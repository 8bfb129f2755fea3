//! Tests for `fragment`.

use serde_json::json;

use crate::types::{Fragment, Payload};

fn snippet(body: &str) -> Fragment {
  Fragment::new("snippet", Payload::new(), body)
}

#[test]
fn new_fragments_get_unique_ids() {
  let first = snippet("a");
  let second = snippet("a");
  assert_ne!(first.id, second.id);
  assert!(first.payload.is_empty());
}

#[test]
fn append_payload_replaces_value_under_existing_key() {
  let mut fragment = snippet("body");
  fragment.append_payload("key", json!(1));
  fragment.append_payload("key", json!(2));
  assert_eq!(fragment.payload.get("key"), Some(&json!(2)));
}

#[test]
fn merge_in_payload_is_last_writer_wins() {
  let mut fragment = snippet("body");
  fragment.append_payload("a", json!("mine"));

  let mut other = Payload::new();
  other.insert("a".to_string(), json!("theirs"));
  other.insert("b".to_string(), json!("new"));
  fragment.merge_in_payload(&other);

  assert_eq!(fragment.payload.get("a"), Some(&json!("theirs")));
  assert_eq!(fragment.payload.get("b"), Some(&json!("new")));
}

#[test]
fn merge_in_payload_keeps_insertion_order() {
  let mut fragment = snippet("body");
  fragment.append_payload("z", json!(1));
  let mut other = Payload::new();
  other.insert("a".to_string(), json!(2));
  fragment.merge_in_payload(&other);

  let keys: Vec<&str> = fragment.payload.keys().map(String::as_str).collect();
  assert_eq!(keys, vec!["z", "a"]);
}

#[test]
fn clone_is_isolated_from_the_original() {
  let original = snippet("body");
  let mut copy = original.clone();
  copy.set_body("changed");
  copy.append_payload("key", json!("value"));

  assert_eq!(original.body, "body");
  assert!(original.payload.is_empty());
  assert_eq!(copy.id, original.id);
}

#[test]
fn fragment_round_trips_through_json_with_type_field() {
  let mut fragment = snippet("body");
  fragment.append_payload("key", json!({"nested": true}));

  let value = serde_json::to_value(&fragment).unwrap();
  assert_eq!(value["type"], json!("snippet"));

  let parsed: Fragment = serde_json::from_value(value).unwrap();
  assert_eq!(parsed, fragment);
}
