//! Built-in filter catalog served by [`super::source::MockSource`].

use crate::model::{FilterDefinition, FilterOption, LinkedFilterConfig, OperatorConfig, ValueType};
use std::collections::BTreeMap;

fn op(id: &str, label: &str, color: &str) -> OperatorConfig {
    OperatorConfig {
        id: id.to_string(),
        label: label.to_string(),
        color: color.to_string(),
    }
}

fn opt(id: &str, label: &str) -> FilterOption {
    FilterOption {
        id: id.to_string(),
        label: label.to_string(),
    }
}

fn select_ops() -> Vec<OperatorConfig> {
    vec![op("is", "is", "blue"), op("is_not", "is not", "red")]
}

fn multi_ops() -> Vec<OperatorConfig> {
    vec![op("in", "is any of", "blue"), op("not_in", "is none of", "red")]
}

fn value_map(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(parent, children)| {
            (
                parent.to_string(),
                children.iter().map(|c| c.to_string()).collect(),
            )
        })
        .collect()
}

fn definition(id: &str, name: &str, value_type: ValueType) -> FilterDefinition {
    FilterDefinition {
        id: id.to_string(),
        name: name.to_string(),
        value_type,
        operators: match value_type {
            ValueType::Text => vec![
                op("contains", "contains", "blue"),
                op("equals", "equals", "green"),
                op("not_contains", "does not contain", "red"),
            ],
            ValueType::SingleSelect => select_ops(),
            ValueType::MultiSelect => multi_ops(),
        },
        options: Vec::new(),
        placeholder: None,
        linked_filter: None,
        child_only: false,
    }
}

/// The catalog the mock registry serves.
pub fn builtin_definitions() -> Vec<FilterDefinition> {
    let mut title = definition("title", "Title", ValueType::Text);
    title.placeholder = Some("Search titles...".to_string());

    let mut status = definition("status", "Status", ValueType::SingleSelect);
    status.options = vec![
        opt("open", "Open"),
        opt("in_progress", "In progress"),
        opt("blocked", "Blocked"),
        opt("done", "Done"),
    ];

    let mut priority = definition("priority", "Priority", ValueType::SingleSelect);
    priority.options = vec![
        opt("low", "Low"),
        opt("medium", "Medium"),
        opt("high", "High"),
        opt("urgent", "Urgent"),
    ];

    let mut assignee = definition("assignee", "Assignee", ValueType::MultiSelect);
    assignee.options = vec![
        opt("ana", "Ana"),
        opt("ben", "Ben"),
        opt("chen", "Chen"),
        opt("dara", "Dara"),
    ];

    let mut category = definition("category", "Category", ValueType::SingleSelect);
    category.options = vec![
        opt("hardware", "Hardware"),
        opt("software", "Software"),
        opt("services", "Services"),
    ];
    category.linked_filter = Some(LinkedFilterConfig {
        filter_id: "subcategory".to_string(),
        parent_value_map: value_map(&[
            ("hardware", &["laptops", "monitors", "peripherals"]),
            ("software", &["licenses", "saas"]),
            ("services", &["support", "training"]),
        ]),
    });

    let mut subcategory = definition("subcategory", "Subcategory", ValueType::MultiSelect);
    subcategory.options = vec![
        opt("laptops", "Laptops"),
        opt("monitors", "Monitors"),
        opt("peripherals", "Peripherals"),
        opt("licenses", "Licenses"),
        opt("saas", "SaaS"),
        opt("support", "Support"),
        opt("training", "Training"),
    ];

    let mut region = definition("region", "Region", ValueType::SingleSelect);
    region.options = vec![
        opt("emea", "EMEA"),
        opt("amer", "Americas"),
        opt("apac", "APAC"),
    ];
    region.linked_filter = Some(LinkedFilterConfig {
        filter_id: "country".to_string(),
        parent_value_map: value_map(&[
            ("emea", &["de", "fr", "uk"]),
            ("amer", &["us", "ca", "br"]),
            ("apac", &["jp", "au", "in"]),
        ]),
    });

    let mut country = definition("country", "Country", ValueType::SingleSelect);
    country.options = vec![
        opt("de", "Germany"),
        opt("fr", "France"),
        opt("uk", "United Kingdom"),
        opt("us", "United States"),
        opt("ca", "Canada"),
        opt("br", "Brazil"),
        opt("jp", "Japan"),
        opt("au", "Australia"),
        opt("in", "India"),
    ];

    vec![
        title,
        status,
        priority,
        assignee,
        category,
        subcategory,
        region,
        country,
    ]
}
