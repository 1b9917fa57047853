//! Deep merging of configuration fragments.

use serde_json::{Map, Value};
use tracing::warn;

/// Merge primitive used to fold fragments into one configuration object.
pub trait ConfigMerge: Send + Sync {
    /// Overlay `source` onto `target`; values from `source` win on conflict.
    fn merge(&self, target: &mut Value, source: Value);
}

/// The default [`ConfigMerge`]: see [`merge_value`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DeepMerge;

impl ConfigMerge for DeepMerge {
    fn merge(&self, target: &mut Value, source: Value) {
        merge_value(target, source);
    }
}

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// - Merging an object into a non-object target first replaces the target
///   with `{}`.
/// - Objects merge recursively: keys are added or overwritten and nested
///   objects are overlaid.
/// - Arrays and scalars replace `target` wholesale.
///
/// # Examples
///
/// ```rust
/// use module_config::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// merge_value(&mut acc, json!({"b": [1, 2, 3]}));
/// assert_eq!(acc["b"], json!([1, 2, 3]));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => merge_object(target, map),
        _ => *target = layer,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

/// Fold `fragments` left to right into an empty object using `merger`.
///
/// `null` fragments contribute nothing. Other non-object fragments are
/// skipped so the result is always an object.
pub(crate) fn merge_fragments<I>(merger: &dyn ConfigMerge, module_id: &str, fragments: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut merged = Value::Object(Map::new());
    for fragment in fragments {
        match fragment {
            Value::Null => {}
            Value::Object(_) => merger.merge(&mut merged, fragment),
            other => warn!(
                module = module_id,
                fragment = %other,
                "skipping configuration fragment that is not an object"
            ),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn later_fragments_override_earlier_ones() {
        let merged = merge_fragments(
            &DeepMerge,
            "m",
            [json!({"x": 1, "y": 1}), json!({"y": 2})],
        );
        assert_eq!(merged, json!({"x": 1, "y": 2}));
    }

    #[test]
    fn nested_objects_merge_and_arrays_replace() {
        let merged = merge_fragments(
            &DeepMerge,
            "m",
            [
                json!({"nested": {"a": 1, "list": [1, 2]}}),
                json!({"nested": {"b": 2, "list": [3]}}),
            ],
        );
        assert_eq!(merged, json!({"nested": {"a": 1, "b": 2, "list": [3]}}));
    }

    #[test]
    fn no_fragments_yield_an_empty_object() {
        assert_eq!(merge_fragments(&DeepMerge, "m", Vec::new()), json!({}));
    }

    #[test]
    fn non_object_fragments_are_skipped() {
        let merged = merge_fragments(
            &DeepMerge,
            "m",
            [json!({"a": 1}), Value::Null, json!(42), json!(["x"]), json!({"b": 2})],
        );
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn object_replaces_scalar_target() {
        let mut target = json!({"a": 1});
        merge_value(&mut target, json!({"a": {"deep": true}}));
        assert_eq!(target, json!({"a": {"deep": true}}));
    }
}
