//! Specificity-sorted rule lists keyed by module and annotation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::rule::RegisteredRule;
use crate::specificity;

/// Build the store key for `module_id`, optionally scoped to `annotation_id`.
#[must_use]
pub fn store_key(module_id: &str, annotation_id: Option<&str>) -> String {
    match annotation_id {
        Some(annotation) => format!("{module_id}|{annotation}"),
        None => module_id.to_owned(),
    }
}

/// Rules filed by module (and annotation) in ascending specificity.
#[derive(Debug, Default)]
pub struct RuleStore {
    entries: HashMap<String, Vec<Arc<RegisteredRule>>>,
    annotations: HashMap<String, Vec<String>>,
}

impl RuleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File `rule` under `module_id`, keeping the list sorted.
    ///
    /// The rule's own annotation, if any, scopes the key and is recorded in
    /// the module-annotation index.
    pub fn insert(&mut self, module_id: &str, rule: Arc<RegisteredRule>) {
        let annotation = rule.selector().annotation_id();
        if let Some(name) = annotation {
            let known = self.annotations.entry(module_id.to_owned()).or_default();
            if !known.iter().any(|id| id == name) {
                known.push(name.to_owned());
            }
        }

        let list = self
            .entries
            .entry(store_key(module_id, annotation))
            .or_default();
        let position =
            list.partition_point(|existing| specificity::compare(existing, &rule) != Ordering::Greater);
        list.insert(position, rule);
    }

    /// Rules filed under the composite key, least specific first.
    #[must_use]
    pub fn rules(&self, module_id: &str, annotation_id: Option<&str>) -> Option<&[Arc<RegisteredRule>]> {
        self.entries
            .get(&store_key(module_id, annotation_id))
            .map(Vec::as_slice)
    }

    /// Annotation ids with at least one rule for `module_id`.
    #[must_use]
    pub fn annotation_ids(&self, module_id: &str) -> Option<&[String]> {
        self.annotations.get(module_id).map(Vec::as_slice)
    }

    /// Whether `module_id` has rules for `annotation_id`.
    ///
    /// Returns `None` when the module has no annotation rules at all.
    #[must_use]
    pub fn has_annotation(&self, module_id: &str, annotation_id: &str) -> Option<bool> {
        self.annotations
            .get(module_id)
            .map(|known| known.iter().any(|id| id == annotation_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Criterion;
    use crate::rule::ConfigSource;
    use crate::selector::Selector;
    use serde_json::json;

    fn rule(ordinal: u64, select: Selector) -> Arc<RegisteredRule> {
        Arc::new(RegisteredRule {
            ordinal,
            priority: 0,
            select,
            source: ConfigSource::Constant(json!({ "ordinal": ordinal })),
        })
    }

    fn ordinals(store: &RuleStore, module: &str, annotation: Option<&str>) -> Vec<u64> {
        store
            .rules(module, annotation)
            .map(|rules| rules.iter().map(|r| r.ordinal()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn keys_join_module_and_annotation() {
        assert_eq!(store_key("m", None), "m");
        assert_eq!(store_key("m", Some("a")), "m|a");
    }

    #[test]
    fn insertion_keeps_lists_sorted() {
        let mut store = RuleStore::new();
        store.insert("m", rule(0, Selector::module("m").with(Criterion::Application, "x")));
        store.insert("m", rule(1, Selector::module("m")));
        store.insert("m", rule(2, Selector::module("m").with(Criterion::Locale, "en")));
        store.insert("m", rule(3, Selector::module("m")));

        assert_eq!(ordinals(&store, "m", None), vec![1, 3, 2, 0]);
    }

    #[test]
    fn annotation_rules_are_filed_separately_and_indexed() {
        let mut store = RuleStore::new();
        store.insert("m", rule(0, Selector::module("m")));
        store.insert("m", rule(1, Selector::module("m").annotation("ann")));
        store.insert("m", rule(2, Selector::module("m").annotation("ann")));
        store.insert("m", rule(3, Selector::module("m").annotation("other")));

        assert_eq!(ordinals(&store, "m", None), vec![0]);
        assert_eq!(ordinals(&store, "m", Some("ann")), vec![1, 2]);
        assert_eq!(
            store.annotation_ids("m").map(<[String]>::to_vec),
            Some(vec![String::from("ann"), String::from("other")])
        );
        assert_eq!(store.has_annotation("m", "ann"), Some(true));
        assert_eq!(store.has_annotation("m", "missing"), Some(false));
        assert_eq!(store.has_annotation("n", "ann"), None);
        assert!(store.annotation_ids("n").is_none());
    }

    #[test]
    fn unknown_keys_have_no_rules() {
        let store = RuleStore::new();
        assert!(store.rules("m", None).is_none());
    }
}
