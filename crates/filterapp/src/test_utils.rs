use crate::error::{FilterError, Result};
use crate::model::{
    ActiveFilter, FilterDefinition, FilterOption, FilterValue, LinkedFilterConfig,
    OperatorConfig, ValueType,
};
use crate::registry::{DefinitionSource, FilterRegistry};
use async_trait::async_trait;
use std::collections::BTreeMap;

fn ops(ids: &[&str]) -> Vec<OperatorConfig> {
    ids.iter()
        .map(|id| OperatorConfig {
            id: id.to_string(),
            label: id.replace('_', " "),
            color: "blue".to_string(),
        })
        .collect()
}

fn options(ids: &[&str]) -> Vec<FilterOption> {
    ids.iter()
        .map(|id| FilterOption {
            id: id.to_string(),
            label: id.to_uppercase(),
        })
        .collect()
}

fn linked(target: &str, map: &[(&str, &[&str])]) -> Option<LinkedFilterConfig> {
    let parent_value_map: BTreeMap<String, Vec<String>> = map
        .iter()
        .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
        .collect();
    Some(LinkedFilterConfig {
        filter_id: target.to_string(),
        parent_value_map,
    })
}

fn def(id: &str, value_type: ValueType) -> FilterDefinition {
    FilterDefinition {
        id: id.to_string(),
        name: id.to_uppercase(),
        value_type,
        operators: match value_type {
            ValueType::Text => ops(&["contains", "equals"]),
            ValueType::SingleSelect => ops(&["is", "is_not"]),
            ValueType::MultiSelect => ops(&["in", "not_in"]),
        },
        options: Vec::new(),
        placeholder: None,
        linked_filter: None,
        child_only: false,
    }
}

/// A small catalog:
///
/// - `a`: text, no link
/// - `b`: single-select (`x`, `y`), linked to `c`
/// - `c`: multi-select (`c1`, `c2`, `c3`)
/// - `d`: single-select (`p`, `q`), linked to `e`
/// - `e`: single-select (`e1`, `e2`)
/// - `broken`: single-select linked to a definition that does not exist
pub fn definitions() -> Vec<FilterDefinition> {
    let a = def("a", ValueType::Text);

    let mut b = def("b", ValueType::SingleSelect);
    b.options = options(&["x", "y"]);
    b.linked_filter = linked("c", &[("x", &["c1", "c2"]), ("y", &["c3"])]);

    let mut c = def("c", ValueType::MultiSelect);
    c.options = options(&["c1", "c2", "c3"]);

    let mut d = def("d", ValueType::SingleSelect);
    d.options = options(&["p", "q"]);
    d.linked_filter = linked("e", &[("p", &["e1"]), ("q", &["e2"])]);

    let mut e = def("e", ValueType::SingleSelect);
    e.options = options(&["e1", "e2"]);

    let mut broken = def("broken", ValueType::SingleSelect);
    broken.options = options(&["z"]);
    broken.linked_filter = linked("missing", &[("z", &["m1"])]);

    vec![a, b, c, d, e, broken]
}

/// A registry over [`definitions`] that is ready without a fetch.
pub fn ready_registry() -> FilterRegistry {
    FilterRegistry::with_definitions(definitions()).expect("fixture catalog is valid")
}

/// A configured, enabled filter of the given type.
pub fn filter_of(filter_id: &str, value: FilterValue) -> ActiveFilter {
    let registry = ready_registry();
    let definition = registry
        .get_filter_definition(filter_id)
        .expect("fixture definition exists");
    ActiveFilter::of(definition).with_value(value)
}

pub fn single(value: &str) -> FilterValue {
    FilterValue::Single(value.to_string())
}

pub fn multi(values: &[&str]) -> FilterValue {
    FilterValue::Multi(values.iter().map(|v| v.to_string()).collect())
}

/// A source whose fetch always fails.
pub struct FailingSource;

#[async_trait]
impl DefinitionSource for FailingSource {
    async fn fetch(&self) -> Result<Vec<FilterDefinition>> {
        Err(FilterError::Registry("catalog endpoint unavailable".to_string()))
    }

    fn describe(&self) -> String {
        "failing source".to_string()
    }
}
