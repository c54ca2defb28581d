//! # Filter Bar
//!
//! [`FilterBar`] is the single entry point for UI clients. It owns the registry, the
//! panel machine, the viewport and the apply callback, and turns each user gesture
//! into one or more [`PanelEvent`]s.
//!
//! ## What the Bar Does
//!
//! - **Gates** gestures: nothing mutates while the catalog is loading
//!   ([`FilterError::NotReady`]) or while an apply is settling ([`FilterError::Applying`])
//! - **Validates** gestures against the catalog (operators, value shapes, options)
//! - **Runs the linked lifecycle**: type changes create, remove or replace a child;
//!   value changes reset it; deleting a parent deletes its child first
//! - **Tracks layout**: add-button placement and the pending scroll request
//!
//! ## What the Bar Does NOT Do
//!
//! - Render anything. Clients read [`FilterBar::groups`] and draw it.
//! - Retry a failed catalog load. A failed [`FilterBar::mount`] is logged and the bar
//!   stays loading.
//!
//! ## Type Change Lifecycle
//!
//! Changing a primary filter from definition `old` to `new` (only when they differ):
//!
//! 1. The filter is replaced with one of type `new`: default operator, empty value.
//! 2. If `old` had a linked filter and `new` does not, the child is deleted.
//! 3. If `new` has a linked filter and `old` did not, a child is built and attached.
//! 4. If both have one, the old child is deleted and a new one attached.
//!
//! Child ids are generated before dispatch, so attaching is a single
//! [`PanelEvent::AttachLinkedFilter`].

use crate::config::FilterBarConfig;
use crate::error::{FilterError, Result};
use crate::filters::{
    available_linked_options, calculate_can_apply, count_active_filters, effective_enabled,
    find_filter, find_parent, get_filter_groups, FilterGroup,
};
use crate::layout::{placement, AddButtonPlacement, ScrollRequest, Viewport};
use crate::linked::{LinkedFilterService, LinkedTransition};
use crate::machine::{FilterPanelMachine, Outcome, PanelEvent};
use crate::model::{
    ActiveFilter, FilterDefinition, FilterOption, FilterValue, LogicalOperator,
};
use crate::registry::FilterRegistry;

pub type ApplyCallback = Box<dyn FnMut(&[ActiveFilter], LogicalOperator) + Send>;

pub struct FilterBar {
    registry: FilterRegistry,
    machine: FilterPanelMachine,
    mounted: bool,
    viewport: Viewport,
    scroll_request: Option<ScrollRequest>,
    on_apply: Option<ApplyCallback>,
}

impl std::fmt::Debug for FilterBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterBar")
            .field("registry", &self.registry)
            .field("machine", &self.machine)
            .field("viewport", &self.viewport)
            .field("scroll_request", &self.scroll_request)
            .finish_non_exhaustive()
    }
}

impl FilterBar {
    pub fn new(registry: FilterRegistry, config: &FilterBarConfig) -> Self {
        Self {
            registry,
            machine: FilterPanelMachine::new(config.apply_settle()),
            mounted: false,
            viewport: Viewport::new(0, config.visible_rows),
            scroll_request: None,
            on_apply: None,
        }
    }

    /// Register the callback invoked with the full filter list on every successful apply.
    pub fn on_apply<F>(&mut self, callback: F)
    where
        F: FnMut(&[ActiveFilter], LogicalOperator) + Send + 'static,
    {
        self.on_apply = Some(Box::new(callback));
    }

    /// Load the catalog. Only the first call fetches.
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        if self.registry.is_ready() {
            return;
        }
        if let Err(e) = self.registry.fetch_filter_definitions().await {
            tracing::error!(
                error = %e,
                source = %self.registry.describe_source(),
                "failed to load filter definitions"
            );
        }
    }

    // --- Reading ---

    pub fn is_loading(&self) -> bool {
        !self.registry.is_ready()
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn filters(&self) -> &[ActiveFilter] {
        self.machine.filters()
    }

    pub fn logical_operator(&self) -> LogicalOperator {
        self.machine.logical_operator()
    }

    pub fn groups(&self) -> Vec<FilterGroup<'_>> {
        get_filter_groups(self.filters())
    }

    pub fn can_apply(&self) -> bool {
        calculate_can_apply(self.filters())
    }

    pub fn is_applying(&self) -> bool {
        self.machine.is_applying()
    }

    pub fn active_count(&self) -> usize {
        count_active_filters(self.filters())
    }

    pub fn placement(&self) -> AddButtonPlacement {
        placement(!self.filters().is_empty(), self.viewport)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The host reports how many rows it can show.
    pub fn resize(&mut self, visible_height: usize) {
        self.viewport.visible_height = visible_height;
        self.refresh_layout();
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll_request.take()
    }

    /// Options currently selectable for a linked child, narrowed by its parent's value.
    pub fn linked_options(&self, child_id: &str) -> Result<Vec<&FilterOption>> {
        let filters = self.filters();
        let child = find_filter(filters, child_id)
            .ok_or_else(|| FilterError::FilterNotFound(child_id.to_string()))?;
        let parent = find_parent(filters, child_id)
            .ok_or_else(|| FilterError::LinkedFilter(format!("{} is not a linked filter", child_id)))?;
        let parent_def = self.definition_of(parent)?;
        let child_def = self.definition_of(child)?;
        Ok(available_linked_options(parent_def, parent, child_def))
    }

    /// Options currently selectable for any filter.
    pub fn options_for(&self, id: &str) -> Result<Vec<&FilterOption>> {
        let filter = self.find(id)?;
        if find_parent(self.filters(), id).is_some() {
            return self.linked_options(id);
        }
        Ok(self.definition_of(filter)?.options.iter().collect())
    }

    // --- Gestures ---

    /// Append an empty filter and request that the host scroll to it.
    pub fn add_filter(&mut self) -> Result<String> {
        self.ensure_ready()?;
        let filter = ActiveFilter::empty();
        let id = filter.id.clone();
        self.dispatch(PanelEvent::AddFilter { filter })?;
        self.scroll_request = Some(ScrollRequest {
            filter_id: id.clone(),
        });
        self.refresh_layout();
        tracing::debug!(filter = %id, placement = ?self.placement(), "filter added");
        Ok(id)
    }

    pub fn change_filter_type(&mut self, id: &str, definition_id: &str) -> Result<()> {
        self.ensure_ready()?;
        let filter = self.find(id)?.clone();
        if find_parent(self.filters(), id).is_some() {
            return Err(FilterError::LinkedFilter(
                "the type of a linked filter is set by its parent".to_string(),
            ));
        }
        let definition = self
            .registry
            .get_filter_definition(definition_id)
            .ok_or_else(|| FilterError::DefinitionNotFound(definition_id.to_string()))?;
        if definition.child_only {
            return Err(FilterError::InvalidDefinition {
                id: definition_id.to_string(),
                reason: "only available as a linked filter".to_string(),
            });
        }
        if filter.filter_id.as_deref() == Some(definition_id) {
            return Ok(());
        }

        let service = LinkedFilterService::new(&self.registry);
        let transition = service.linked_transition(filter.filter_id.as_deref(), Some(definition_id));
        let new_child = match transition {
            LinkedTransition::Create | LinkedTransition::Replace => definition
                .linked_filter
                .as_ref()
                .and_then(|linked| service.create_linked_filter(&linked.filter_id)),
            LinkedTransition::Remove | LinkedTransition::None => None,
        };
        let old_child = match transition {
            LinkedTransition::Remove | LinkedTransition::Replace => filter.linked_filter_id.clone(),
            LinkedTransition::Create | LinkedTransition::None => None,
        };

        let mut updated = ActiveFilter::of(definition);
        updated.id = filter.id.clone();
        updated.enabled = filter.enabled;
        updated.linked_filter_id = if old_child.is_some() {
            None
        } else {
            filter.linked_filter_id.clone()
        };

        tracing::debug!(
            filter = %id,
            from = ?filter.filter_id,
            to = %definition_id,
            transition = ?transition,
            "changing filter type"
        );

        self.dispatch(PanelEvent::UpdateFilter {
            id: id.to_string(),
            filter: updated,
        })?;
        if let Some(child_id) = old_child {
            self.dispatch(PanelEvent::DeleteFilter { id: child_id })?;
        }
        match new_child {
            Some(child) => {
                let outcome = self.dispatch(PanelEvent::AttachLinkedFilter {
                    parent_id: id.to_string(),
                    child,
                })?;
                if outcome == Outcome::Rejected {
                    tracing::warn!(filter = %id, "linked filter was not attached");
                }
            }
            None if matches!(
                transition,
                LinkedTransition::Create | LinkedTransition::Replace
            ) =>
            {
                tracing::debug!(
                    definition = %definition_id,
                    "linked filter target could not be resolved, skipping child"
                );
            }
            None => {}
        }
        self.refresh_layout();
        Ok(())
    }

    pub fn set_operator(&mut self, id: &str, operator: &str) -> Result<()> {
        self.ensure_ready()?;
        let filter = self.find(id)?;
        self.ensure_usable(filter)?;
        let definition = self.definition_of(filter)?;
        if definition.operator(operator).is_none() {
            return Err(FilterError::InvalidOperator {
                definition: definition.id.clone(),
                operator: operator.to_string(),
            });
        }
        if filter.operator == operator {
            return Ok(());
        }

        let mut updated = filter.clone();
        updated.operator = operator.to_string();
        self.dispatch(PanelEvent::UpdateFilter {
            id: id.to_string(),
            filter: updated,
        })?;
        Ok(())
    }

    /// Set a filter's value. A changed parent value resets its child.
    pub fn set_value(&mut self, id: &str, value: FilterValue) -> Result<()> {
        self.ensure_ready()?;
        let filter = self.find(id)?;
        self.ensure_usable(filter)?;
        let definition = self.definition_of(filter)?;

        if !value.fits(definition.value_type) {
            return Err(FilterError::InvalidValue(format!(
                "{} expects a {} value",
                definition.name, definition.value_type
            )));
        }
        if definition.value_type.is_select() {
            let allowed = self.options_for(id)?;
            if let Some(bad) = value
                .values()
                .into_iter()
                .find(|v| !allowed.iter().any(|opt| opt.id == *v))
            {
                return Err(FilterError::InvalidValue(format!(
                    "'{}' is not an available option of {}",
                    bad, definition.name
                )));
            }
        }
        if filter.value == value {
            return Ok(());
        }

        let mut updated = filter.clone();
        updated.value = value;
        let child_reset = filter
            .linked_filter_id
            .as_deref()
            .and_then(|child_id| find_filter(self.filters(), child_id))
            .map(|child| {
                let mut reset = child.clone();
                reset.value = self
                    .registry
                    .get_filter_definition(child.filter_id.as_deref().unwrap_or_default())
                    .map(|def| def.value_type.empty_value())
                    .unwrap_or_else(|| child.value.cleared());
                reset
            });

        self.dispatch(PanelEvent::UpdateFilter {
            id: id.to_string(),
            filter: updated,
        })?;
        if let Some(reset) = child_reset {
            tracing::debug!(parent = %id, child = %reset.id, "parent value changed, resetting child");
            self.dispatch(PanelEvent::UpdateFilter {
                id: reset.id.clone(),
                filter: reset,
            })?;
        }
        Ok(())
    }

    pub fn toggle_filter(&mut self, id: &str) -> Result<()> {
        self.ensure_ready()?;
        self.find(id)?;
        self.reject_child(id, "linked filters follow their parent's enabled state")?;
        self.dispatch(PanelEvent::ToggleFilterEnabled { id: id.to_string() })?;
        Ok(())
    }

    /// Delete a filter. A parent's child is deleted first.
    pub fn delete_filter(&mut self, id: &str) -> Result<()> {
        self.ensure_ready()?;
        let filter = self.find(id)?;
        let child_id = filter.linked_filter_id.clone();
        self.reject_child(id, "linked filters are deleted with their parent")?;

        if let Some(child_id) = child_id {
            if find_filter(self.filters(), &child_id).is_some() {
                self.dispatch(PanelEvent::DeleteFilter { id: child_id })?;
            }
        }
        self.dispatch(PanelEvent::DeleteFilter { id: id.to_string() })?;
        if self
            .scroll_request
            .as_ref()
            .is_some_and(|req| req.filter_id == id)
        {
            self.scroll_request = None;
        }
        self.refresh_layout();
        Ok(())
    }

    pub fn toggle_logical_operator(&mut self) -> Result<LogicalOperator> {
        self.ensure_ready()?;
        self.dispatch(PanelEvent::ToggleLogicalOperator)?;
        Ok(self.logical_operator())
    }

    /// Apply the current filters.
    ///
    /// Returns `false` when nothing is applicable. On success the apply callback runs
    /// once, before this returns.
    pub fn apply(&mut self) -> Result<bool> {
        self.ensure_ready()?;
        match self.dispatch(PanelEvent::ApplyFilters)? {
            Outcome::Handled => {
                tracing::info!(
                    filters = self.filters().len(),
                    active = self.active_count(),
                    operator = %self.logical_operator(),
                    "applying filters"
                );
                if let Some(callback) = self.on_apply.as_mut() {
                    callback(self.machine.filters(), self.machine.logical_operator());
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.dispatch(PanelEvent::ClearFilters)?;
        self.scroll_request = None;
        self.refresh_layout();
        Ok(())
    }

    // --- Internals ---

    fn ensure_ready(&self) -> Result<()> {
        if self.is_loading() {
            return Err(FilterError::NotReady);
        }
        if self.machine.is_applying() {
            return Err(FilterError::Applying);
        }
        Ok(())
    }

    fn dispatch(&mut self, event: PanelEvent) -> Result<Outcome> {
        match self.machine.send(event) {
            Outcome::Dropped => Err(FilterError::Applying),
            outcome => Ok(outcome),
        }
    }

    fn find(&self, id: &str) -> Result<&ActiveFilter> {
        find_filter(self.filters(), id).ok_or_else(|| FilterError::FilterNotFound(id.to_string()))
    }

    fn definition_of(&self, filter: &ActiveFilter) -> Result<&FilterDefinition> {
        let definition_id = filter
            .filter_id
            .as_deref()
            .ok_or_else(|| FilterError::Unconfigured(filter.id.clone()))?;
        self.registry
            .get_filter_definition(definition_id)
            .ok_or_else(|| FilterError::DefinitionNotFound(definition_id.to_string()))
    }

    fn reject_child(&self, id: &str, reason: &str) -> Result<()> {
        if find_parent(self.filters(), id).is_some() {
            return Err(FilterError::LinkedFilter(reason.to_string()));
        }
        Ok(())
    }

    /// A linked child is only editable while its parent is enabled and has a value.
    fn ensure_usable(&self, filter: &ActiveFilter) -> Result<()> {
        let filters = self.filters();
        if find_parent(filters, &filter.id).is_some() && !effective_enabled(filters, filter) {
            return Err(FilterError::LinkedFilter(
                "linked filter is disabled until its parent has a value".to_string(),
            ));
        }
        Ok(())
    }

    fn refresh_layout(&mut self) {
        self.viewport.content_height = self.machine.filters().len();
    }
}
