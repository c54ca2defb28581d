//! Derived views over a flat list of filters.
//!
//! The machine stores filters as a flat `Vec<ActiveFilter>`; a linked child sits in
//! that list like any other filter. Everything a UI renders goes through
//! [`get_filter_groups`], which nests each child under the primary that owns it and
//! keeps primaries in list order. UIs never iterate the raw list.

use crate::model::{ActiveFilter, FilterDefinition, FilterOption};
use std::collections::HashSet;

/// A primary filter and its optional linked child: the unit of rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterGroup<'a> {
    pub primary: &'a ActiveFilter,
    pub linked: Option<&'a ActiveFilter>,
}

impl FilterGroup<'_> {
    /// Effective enabled state of the linked child.
    ///
    /// Derived from the primary; the child's own `enabled` flag is never consulted.
    pub fn linked_enabled(&self) -> bool {
        linked_enabled_for(self.primary)
    }
}

fn linked_enabled_for(parent: &ActiveFilter) -> bool {
    parent.enabled && !parent.value.is_empty()
}

/// True iff at least one filter is enabled and has a type.
pub fn calculate_can_apply(filters: &[ActiveFilter]) -> bool {
    filters.iter().any(|f| f.enabled && f.filter_id.is_some())
}

/// True iff the filter has a type and a non-empty value.
pub fn is_filter_valid(filter: &ActiveFilter) -> bool {
    filter.filter_id.is_some() && !filter.value.is_empty()
}

fn linked_ids(filters: &[ActiveFilter]) -> HashSet<&str> {
    filters
        .iter()
        .filter_map(|f| f.linked_filter_id.as_deref())
        .collect()
}

/// Filters not referenced as any other filter's linked child, in list order.
pub fn get_primary_filters(filters: &[ActiveFilter]) -> Vec<&ActiveFilter> {
    let linked = linked_ids(filters);
    filters
        .iter()
        .filter(|f| !linked.contains(f.id.as_str()))
        .collect()
}

pub fn get_filter_groups(filters: &[ActiveFilter]) -> Vec<FilterGroup<'_>> {
    get_primary_filters(filters)
        .into_iter()
        .map(|primary| FilterGroup {
            primary,
            linked: primary
                .linked_filter_id
                .as_deref()
                .and_then(|id| filters.iter().find(|f| f.id == id)),
        })
        .collect()
}

pub fn find_filter<'a>(filters: &'a [ActiveFilter], id: &str) -> Option<&'a ActiveFilter> {
    filters.iter().find(|f| f.id == id)
}

/// The filter that owns `child_id` as its linked child.
pub fn find_parent<'a>(filters: &'a [ActiveFilter], child_id: &str) -> Option<&'a ActiveFilter> {
    filters
        .iter()
        .find(|f| f.linked_filter_id.as_deref() == Some(child_id))
}

pub fn is_linked_child(filters: &[ActiveFilter], id: &str) -> bool {
    find_parent(filters, id).is_some()
}

/// Enabled state as rendered: derived from the parent for linked children.
pub fn effective_enabled(filters: &[ActiveFilter], filter: &ActiveFilter) -> bool {
    match find_parent(filters, &filter.id) {
        Some(parent) => linked_enabled_for(parent),
        None => filter.enabled,
    }
}

/// Number of groups whose primary is enabled and valid.
pub fn count_active_filters(filters: &[ActiveFilter]) -> usize {
    get_primary_filters(filters)
        .into_iter()
        .filter(|f| f.enabled && is_filter_valid(f))
        .count()
}

/// Child options selectable for the parent's current value.
///
/// Each selected parent value contributes its mapped option ids; the result keeps the
/// child definition's option order. A parent without a value, or whose values are not
/// in the map, yields nothing.
pub fn available_linked_options<'a>(
    parent_definition: &FilterDefinition,
    parent: &ActiveFilter,
    child_definition: &'a FilterDefinition,
) -> Vec<&'a FilterOption> {
    let Some(linked) = &parent_definition.linked_filter else {
        return Vec::new();
    };

    let allowed: HashSet<&str> = parent
        .value
        .values()
        .into_iter()
        .filter_map(|v| linked.parent_value_map.get(v))
        .flatten()
        .map(String::as_str)
        .collect();

    child_definition
        .options
        .iter()
        .filter(|opt| allowed.contains(opt.id.as_str()))
        .collect()
}
