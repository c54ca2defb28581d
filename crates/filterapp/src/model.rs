//! # Domain Model
//!
//! Two families of types live here:
//!
//! - **Definitions** ([`FilterDefinition`] and its parts): the immutable schema of a
//!   filter type, loaded once from the registry. Their serde shape is the catalog
//!   wire format (camelCase keys, kebab-case value types).
//! - **Instances** ([`ActiveFilter`], [`FilterValue`]): what the user has built in
//!   the bar. They live only in the panel machine's context.
//!
//! ## Catalog Format
//!
//! ```json
//! {
//!   "id": "category",
//!   "name": "Category",
//!   "valueType": "single-select",
//!   "operators": [{ "id": "is", "label": "is", "color": "blue" }],
//!   "options": [{ "id": "hardware", "label": "Hardware" }],
//!   "linkedFilter": {
//!     "filterId": "subcategory",
//!     "parentValueMap": { "hardware": ["laptops", "monitors"] }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

const LINKED_ID_SUFFIX: &str = "-linked";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Text,
    SingleSelect,
    MultiSelect,
}

impl ValueType {
    /// The empty value for this type: `[]` for multi-select, `""` otherwise.
    pub fn empty_value(self) -> FilterValue {
        match self {
            ValueType::MultiSelect => FilterValue::Multi(Vec::new()),
            ValueType::Text | ValueType::SingleSelect => FilterValue::Single(String::new()),
        }
    }

    pub fn is_select(self) -> bool {
        matches!(self, ValueType::SingleSelect | ValueType::MultiSelect)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Text => write!(f, "text"),
            ValueType::SingleSelect => write!(f, "single-select"),
            ValueType::MultiSelect => write!(f, "multi-select"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub id: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
}

/// Declares that instances of a definition own a dependent child filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedFilterConfig {
    /// Definition id of the child filter.
    pub filter_id: String,
    /// Parent value → child option ids available for that value.
    #[serde(default)]
    pub parent_value_map: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefinition {
    pub id: String,
    pub name: String,
    pub value_type: ValueType,
    /// Non-empty; the first entry is the default operator.
    pub operators: Vec<OperatorConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FilterOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_filter: Option<LinkedFilterConfig>,
    /// Only reachable as a linked child, never offered for top-level selection.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub child_only: bool,
}

impl FilterDefinition {
    pub fn default_operator(&self) -> Option<&OperatorConfig> {
        self.operators.first()
    }

    pub fn operator(&self, id: &str) -> Option<&OperatorConfig> {
        self.operators.iter().find(|op| op.id == id)
    }

    pub fn option(&self, id: &str) -> Option<&FilterOption> {
        self.options.iter().find(|opt| opt.id == id)
    }

    pub fn has_linked_filter(&self) -> bool {
        self.linked_filter.is_some()
    }
}

/// The value held by a filter instance.
///
/// Text and single-select filters hold one string, multi-select filters hold a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Multi(Vec<String>),
}

impl Default for FilterValue {
    fn default() -> Self {
        FilterValue::Single(String::new())
    }
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Single(s) => s.is_empty(),
            FilterValue::Multi(values) => values.is_empty(),
        }
    }

    /// The selected values as a list (a non-empty single value is a list of one).
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Single(s) if s.is_empty() => Vec::new(),
            FilterValue::Single(s) => vec![s.as_str()],
            FilterValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// An empty value with the same shape as this one.
    pub fn cleared(&self) -> FilterValue {
        match self {
            FilterValue::Single(_) => FilterValue::Single(String::new()),
            FilterValue::Multi(_) => FilterValue::Multi(Vec::new()),
        }
    }

    /// Whether this value has the shape the given value type expects.
    pub fn fits(&self, value_type: ValueType) -> bool {
        match (self, value_type) {
            (FilterValue::Multi(_), ValueType::MultiSelect) => true,
            (FilterValue::Single(_), ValueType::Text | ValueType::SingleSelect) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn toggled(self) -> Self {
        match self {
            LogicalOperator::And => LogicalOperator::Or,
            LogicalOperator::Or => LogicalOperator::And,
        }
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "and"),
            LogicalOperator::Or => write!(f, "or"),
        }
    }
}

/// A filter the user has added to the bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    pub id: String,
    /// `None` until the user picks a filter type.
    pub filter_id: Option<String>,
    pub operator: String,
    pub value: FilterValue,
    pub enabled: bool,
    /// Id of the dependent child filter, if this filter owns one.
    pub linked_filter_id: Option<String>,
}

impl ActiveFilter {
    /// A new, not yet configured filter.
    pub fn empty() -> Self {
        Self {
            id: new_filter_id(),
            filter_id: None,
            operator: String::new(),
            value: FilterValue::default(),
            enabled: true,
            linked_filter_id: None,
        }
    }

    /// A filter of the given definition with its default operator and an empty value.
    pub fn of(definition: &FilterDefinition) -> Self {
        Self {
            id: new_filter_id(),
            filter_id: Some(definition.id.clone()),
            operator: definition
                .default_operator()
                .map(|op| op.id.clone())
                .unwrap_or_default(),
            value: definition.value_type.empty_value(),
            enabled: true,
            linked_filter_id: None,
        }
    }

    pub fn with_value(mut self, value: FilterValue) -> Self {
        self.value = value;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.filter_id.is_some()
    }
}

pub fn new_filter_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn new_linked_filter_id() -> String {
    format!("{}{}", Uuid::new_v4(), LINKED_ID_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_follows_value_type() {
        assert_eq!(
            ValueType::MultiSelect.empty_value(),
            FilterValue::Multi(vec![])
        );
        assert_eq!(
            ValueType::SingleSelect.empty_value(),
            FilterValue::Single(String::new())
        );
        assert_eq!(ValueType::Text.empty_value(), FilterValue::Single(String::new()));
    }

    #[test]
    fn values_treats_empty_single_as_nothing() {
        assert!(FilterValue::Single(String::new()).values().is_empty());
        assert_eq!(FilterValue::Single("a".into()).values(), vec!["a"]);
        assert_eq!(
            FilterValue::Multi(vec!["a".into(), "b".into()]).values(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn value_shape_must_fit_type() {
        assert!(FilterValue::Multi(vec![]).fits(ValueType::MultiSelect));
        assert!(!FilterValue::Multi(vec![]).fits(ValueType::Text));
        assert!(FilterValue::Single("x".into()).fits(ValueType::SingleSelect));
        assert!(!FilterValue::Single("x".into()).fits(ValueType::MultiSelect));
    }

    #[test]
    fn logical_operator_toggles() {
        assert_eq!(LogicalOperator::default(), LogicalOperator::And);
        assert_eq!(LogicalOperator::And.toggled(), LogicalOperator::Or);
        assert_eq!(LogicalOperator::Or.toggled(), LogicalOperator::And);
    }

    #[test]
    fn linked_ids_are_suffixed_and_unique() {
        let a = new_linked_filter_id();
        let b = new_linked_filter_id();
        assert!(a.ends_with("-linked"));
        assert_ne!(a, b);
    }

    #[test]
    fn empty_filter_is_enabled_and_unconfigured() {
        let filter = ActiveFilter::empty();
        assert!(filter.enabled);
        assert!(!filter.is_configured());
        assert!(filter.value.is_empty());
    }

    #[test]
    fn definition_parses_catalog_shape() {
        let json = r#"{
            "id": "category",
            "name": "Category",
            "valueType": "single-select",
            "operators": [{"id": "is", "label": "is", "color": "blue"}],
            "options": [{"id": "hardware", "label": "Hardware"}],
            "linkedFilter": {
                "filterId": "subcategory",
                "parentValueMap": {"hardware": ["laptops"]}
            }
        }"#;
        let def: FilterDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.value_type, ValueType::SingleSelect);
        assert_eq!(def.default_operator().unwrap().id, "is");
        let linked = def.linked_filter.unwrap();
        assert_eq!(linked.filter_id, "subcategory");
        assert_eq!(linked.parent_value_map["hardware"], vec!["laptops"]);
        assert!(!def.child_only);
        assert!(def.placeholder.is_none());
    }
}
