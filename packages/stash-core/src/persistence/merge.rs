//! Merge decoding: overlay decoded fields onto a destination's current value.
//!
//! Both the JSON config store and the snapshot store decode through a
//! dynamic value tree. The destination is serialized into the same tree,
//! the source tree is laid over it key by key, and the merged tree is
//! deserialized back into the destination type. Keys missing from the
//! source keep the destination's value; keys unknown to the destination
//! type are dropped by its `Deserialize` impl.

use ciborium::Value as CborValue;
use serde_json::Value as JsonValue;

/// Lays `source` over `target`, recursing into objects present on both sides.
pub fn merge_json(target: &mut JsonValue, source: JsonValue) {
    match (target, source) {
        (JsonValue::Object(target), JsonValue::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Lays `source` over `target`, recursing into maps present on both sides.
pub fn merge_cbor(target: &mut CborValue, source: CborValue) {
    match (target, source) {
        (CborValue::Map(target), CborValue::Map(source)) => {
            for (key, value) in source {
                match target.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, existing)) => merge_cbor(existing, value),
                    None => target.push((key, value)),
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Returns false when both sides are non-empty maps without a single key in common.
pub fn shares_any_field(target: &CborValue, source: &CborValue) -> bool {
    match (target, source) {
        (CborValue::Map(target), CborValue::Map(source))
            if !target.is_empty() && !source.is_empty() =>
        {
            source
                .iter()
                .any(|(key, _)| target.iter().any(|(k, _)| k == key))
        }
        _ => true,
    }
}
