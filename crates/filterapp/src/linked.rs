//! # Linked Filter Service
//!
//! Decides what happens to a filter's dependent child when the filter's type changes,
//! and builds new children. Nothing here touches the panel machine: callers dispatch
//! the results themselves (see [`crate::bar::FilterBar::change_filter_type`]).
//!
//! ## Decisions
//!
//! | old type has link | new type has link | transition |
//! |---|---|---|
//! | yes | no  | [`LinkedTransition::Remove`] |
//! | no  | yes | [`LinkedTransition::Create`] |
//! | yes | yes | [`LinkedTransition::Replace`] |
//! | no  | no  | [`LinkedTransition::None`] |
//!
//! An unset or unknown definition id counts as "no link". The three predicates are
//! mutually exclusive; [`LinkedFilterService::linked_transition`] checks them in the
//! order remove, create, replace.

use crate::model::{new_linked_filter_id, ActiveFilter};
use crate::registry::FilterRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedTransition {
    Remove,
    Create,
    Replace,
    None,
}

pub struct LinkedFilterService<'a> {
    registry: &'a FilterRegistry,
}

impl<'a> LinkedFilterService<'a> {
    pub fn new(registry: &'a FilterRegistry) -> Self {
        Self { registry }
    }

    fn has_link(&self, filter_id: Option<&str>) -> bool {
        filter_id
            .and_then(|id| self.registry.get_filter_definition(id))
            .is_some_and(|def| def.has_linked_filter())
    }

    /// A new child for `target_definition_id`: default operator, empty value, disabled.
    ///
    /// Returns `None` when the target or its default operator cannot be resolved.
    pub fn create_linked_filter(&self, target_definition_id: &str) -> Option<ActiveFilter> {
        let definition = self.registry.get_filter_definition(target_definition_id)?;
        let operator = definition.default_operator()?;
        Some(ActiveFilter {
            id: new_linked_filter_id(),
            filter_id: Some(definition.id.clone()),
            operator: operator.id.clone(),
            value: definition.value_type.empty_value(),
            enabled: false,
            linked_filter_id: None,
        })
    }

    pub fn should_create_linked_filter(&self, old: Option<&str>, new: Option<&str>) -> bool {
        !self.has_link(old) && self.has_link(new)
    }

    pub fn should_remove_linked_filter(&self, old: Option<&str>, new: Option<&str>) -> bool {
        self.has_link(old) && !self.has_link(new)
    }

    pub fn should_replace_linked_filter(&self, old: Option<&str>, new: Option<&str>) -> bool {
        self.has_link(old) && self.has_link(new)
    }

    pub fn linked_transition(&self, old: Option<&str>, new: Option<&str>) -> LinkedTransition {
        if self.should_remove_linked_filter(old, new) {
            LinkedTransition::Remove
        } else if self.should_create_linked_filter(old, new) {
            LinkedTransition::Create
        } else if self.should_replace_linked_filter(old, new) {
            LinkedTransition::Replace
        } else {
            LinkedTransition::None
        }
    }
}
