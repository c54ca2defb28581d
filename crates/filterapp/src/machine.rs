//! # Filter Panel State Machine
//!
//! The authoritative container for the filters in a bar. Two states:
//!
//! ```text
//!            ApplyFilters [can apply]
//!   ┌──────┐ ───────────────────────▶ ┌──────────┐
//!   │ Idle │                          │ Applying │
//!   └──────┘ ◀─────────────────────── └──────────┘
//!            settle delay elapsed
//! ```
//!
//! `Idle` accepts every event. `Applying` only marks "in flight" for UI feedback: it
//! has no handlers, so events that arrive before its deadline are dropped, not queued.
//! The first event at or after the deadline settles the machine back to `Idle` and is
//! then handled normally.
//!
//! ## Reducer
//!
//! [`reduce`] is a pure function `(snapshot, event, now) -> (snapshot, outcome)`.
//! [`FilterPanelMachine`] owns a snapshot and is the single mutation entry point.
//!
//! The machine knows nothing about linked-filter delete semantics: `DeleteFilter`
//! removes exactly one filter, and cascading to a child is the caller's job.

use crate::filters::{calculate_can_apply, find_filter, is_linked_child};
use crate::model::{ActiveFilter, LogicalOperator};
use std::time::{Duration, Instant};

pub const DEFAULT_APPLY_SETTLE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    Applying { until: Instant },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelContext {
    pub filters: Vec<ActiveFilter>,
    pub logical_operator: LogicalOperator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    AddFilter { filter: ActiveFilter },
    /// Full replace of the filter with `id`.
    UpdateFilter { id: String, filter: ActiveFilter },
    DeleteFilter { id: String },
    ToggleFilterEnabled { id: String },
    ToggleLogicalOperator,
    ApplyFilters,
    ClearFilters,
    /// Append `child` and point the parent's `linked_filter_id` at it, in one step.
    AttachLinkedFilter { parent_id: String, child: ActiveFilter },
}

impl PanelEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PanelEvent::AddFilter { .. } => "ADD_FILTER",
            PanelEvent::UpdateFilter { .. } => "UPDATE_FILTER",
            PanelEvent::DeleteFilter { .. } => "DELETE_FILTER",
            PanelEvent::ToggleFilterEnabled { .. } => "TOGGLE_FILTER_ENABLED",
            PanelEvent::ToggleLogicalOperator => "TOGGLE_LOGICAL_OPERATOR",
            PanelEvent::ApplyFilters => "APPLY_FILTERS",
            PanelEvent::ClearFilters => "CLEAR_FILTERS",
            PanelEvent::AttachLinkedFilter { .. } => "ATTACH_LINKED_FILTER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    /// A guard refused the event.
    Rejected,
    /// The machine was applying; the event was discarded.
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: PanelState,
    pub context: PanelContext,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            state: PanelState::Idle,
            context: PanelContext::default(),
        }
    }
}

impl Snapshot {
    /// The state as observed at `now`, with an elapsed apply settled to `Idle`.
    pub fn state_at(&self, now: Instant) -> PanelState {
        match self.state {
            PanelState::Applying { until } if now >= until => PanelState::Idle,
            state => state,
        }
    }
}

pub fn reduce(
    snapshot: &Snapshot,
    event: &PanelEvent,
    now: Instant,
    settle: Duration,
) -> (Snapshot, Outcome) {
    if let PanelState::Applying { .. } = snapshot.state_at(now) {
        return (snapshot.clone(), Outcome::Dropped);
    }

    let mut next = Snapshot {
        state: PanelState::Idle,
        context: snapshot.context.clone(),
    };
    let ctx = &mut next.context;

    let outcome = match event {
        PanelEvent::AddFilter { filter } => {
            ctx.filters.push(filter.clone());
            Outcome::Handled
        }
        PanelEvent::UpdateFilter { id, filter } => {
            if let Some(slot) = ctx.filters.iter_mut().find(|f| &f.id == id) {
                *slot = filter.clone();
            }
            Outcome::Handled
        }
        PanelEvent::DeleteFilter { id } => {
            ctx.filters.retain(|f| &f.id != id);
            Outcome::Handled
        }
        PanelEvent::ToggleFilterEnabled { id } => {
            if let Some(filter) = ctx.filters.iter_mut().find(|f| &f.id == id) {
                filter.enabled = !filter.enabled;
            }
            Outcome::Handled
        }
        PanelEvent::ToggleLogicalOperator => {
            ctx.logical_operator = ctx.logical_operator.toggled();
            Outcome::Handled
        }
        PanelEvent::ApplyFilters => {
            if calculate_can_apply(&ctx.filters) {
                next.state = PanelState::Applying {
                    until: now + settle,
                };
                Outcome::Handled
            } else {
                Outcome::Rejected
            }
        }
        PanelEvent::ClearFilters => {
            *ctx = PanelContext::default();
            Outcome::Handled
        }
        PanelEvent::AttachLinkedFilter { parent_id, child } => {
            if can_attach(&ctx.filters, parent_id, child) {
                if let Some(parent) = ctx.filters.iter_mut().find(|f| &f.id == parent_id) {
                    parent.linked_filter_id = Some(child.id.clone());
                }
                ctx.filters.push(child.clone());
                Outcome::Handled
            } else {
                Outcome::Rejected
            }
        }
    };

    if outcome == Outcome::Rejected {
        return (
            Snapshot {
                state: PanelState::Idle,
                context: snapshot.context.clone(),
            },
            outcome,
        );
    }
    (next, outcome)
}

/// A child has exactly one owner: the parent must be a childless primary and the
/// child id must be new.
fn can_attach(filters: &[ActiveFilter], parent_id: &str, child: &ActiveFilter) -> bool {
    let Some(parent) = find_filter(filters, parent_id) else {
        return false;
    };
    parent.linked_filter_id.is_none()
        && child.linked_filter_id.is_none()
        && child.id != parent.id
        && !is_linked_child(filters, parent_id)
        && find_filter(filters, &child.id).is_none()
}

/// Owns the panel snapshot; every mutation goes through [`FilterPanelMachine::send`].
#[derive(Debug, Clone)]
pub struct FilterPanelMachine {
    snapshot: Snapshot,
    settle: Duration,
}

impl Default for FilterPanelMachine {
    fn default() -> Self {
        Self::new(DEFAULT_APPLY_SETTLE)
    }
}

impl FilterPanelMachine {
    pub fn new(settle: Duration) -> Self {
        Self {
            snapshot: Snapshot::default(),
            settle,
        }
    }

    pub fn send(&mut self, event: PanelEvent) -> Outcome {
        self.send_at(event, Instant::now())
    }

    pub fn send_at(&mut self, event: PanelEvent, now: Instant) -> Outcome {
        let (next, outcome) = reduce(&self.snapshot, &event, now, self.settle);
        match outcome {
            Outcome::Handled => tracing::trace!(event = event.name(), "panel event handled"),
            Outcome::Rejected => tracing::debug!(event = event.name(), "panel event rejected"),
            Outcome::Dropped => {
                tracing::debug!(event = event.name(), "panel event dropped while applying")
            }
        }
        self.snapshot = next;
        outcome
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn context(&self) -> &PanelContext {
        &self.snapshot.context
    }

    pub fn filters(&self) -> &[ActiveFilter] {
        &self.snapshot.context.filters
    }

    pub fn logical_operator(&self) -> LogicalOperator {
        self.snapshot.context.logical_operator
    }

    pub fn state_at(&self, now: Instant) -> PanelState {
        self.snapshot.state_at(now)
    }

    pub fn is_applying_at(&self, now: Instant) -> bool {
        matches!(self.state_at(now), PanelState::Applying { .. })
    }

    pub fn is_applying(&self) -> bool {
        self.is_applying_at(Instant::now())
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::get_filter_groups;
    use crate::test_utils::{filter_of, single};

    const SETTLE: Duration = Duration::from_millis(500);

    fn machine() -> FilterPanelMachine {
        FilterPanelMachine::new(SETTLE)
    }

    fn baseline() -> PanelContext {
        PanelContext {
            filters: vec![],
            logical_operator: LogicalOperator::And,
        }
    }

    #[test]
    fn add_toggle_delete_returns_to_baseline() {
        let mut m = machine();
        let f1 = filter_of("a", single("q"));

        assert_eq!(m.send(PanelEvent::AddFilter { filter: f1.clone() }), Outcome::Handled);
        assert_eq!(m.filters().len(), 1);

        m.send(PanelEvent::ToggleFilterEnabled { id: f1.id.clone() });
        assert!(!m.filters()[0].enabled);

        m.send(PanelEvent::DeleteFilter { id: f1.id.clone() });
        assert_eq!(m.context(), &baseline());
    }

    #[test]
    fn clear_resets_filters_and_operator() {
        let mut m = machine();
        m.send(PanelEvent::AddFilter {
            filter: filter_of("a", single("q")),
        });
        m.send(PanelEvent::AddFilter {
            filter: ActiveFilter::empty(),
        });
        m.send(PanelEvent::ToggleLogicalOperator);
        assert_eq!(m.logical_operator(), LogicalOperator::Or);

        m.send(PanelEvent::ClearFilters);
        assert_eq!(m.context(), &baseline());
    }

    #[test]
    fn update_is_full_replace() {
        let mut m = machine();
        let original = filter_of("a", single("q"));
        m.send(PanelEvent::AddFilter {
            filter: original.clone(),
        });

        let mut replacement = filter_of("b", single("x"));
        replacement.id = original.id.clone();
        replacement.enabled = false;
        m.send(PanelEvent::UpdateFilter {
            id: original.id.clone(),
            filter: replacement.clone(),
        });
        assert_eq!(m.filters(), &[replacement]);
    }

    #[test]
    fn update_and_toggle_unknown_id_change_nothing() {
        let mut m = machine();
        m.send(PanelEvent::AddFilter {
            filter: filter_of("a", single("q")),
        });
        let before = m.context().clone();

        m.send(PanelEvent::UpdateFilter {
            id: "ghost".into(),
            filter: ActiveFilter::empty(),
        });
        m.send(PanelEvent::ToggleFilterEnabled { id: "ghost".into() });
        m.send(PanelEvent::DeleteFilter { id: "ghost".into() });
        assert_eq!(m.context(), &before);
    }

    #[test]
    fn delete_does_not_cascade() {
        let mut m = machine();
        let parent = filter_of("b", single("x"));
        let child = filter_of("c", crate::test_utils::multi(&[]));
        m.send(PanelEvent::AddFilter {
            filter: parent.clone(),
        });
        m.send(PanelEvent::AttachLinkedFilter {
            parent_id: parent.id.clone(),
            child: child.clone(),
        });
        m.send(PanelEvent::DeleteFilter {
            id: parent.id.clone(),
        });
        assert_eq!(m.filters().len(), 1);
        assert_eq!(m.filters()[0].id, child.id);
    }

    #[test]
    fn attach_links_parent_and_appends_child() {
        let mut m = machine();
        let parent = filter_of("b", single("x"));
        let child = filter_of("c", crate::test_utils::multi(&[]));
        m.send(PanelEvent::AddFilter {
            filter: parent.clone(),
        });

        let outcome = m.send(PanelEvent::AttachLinkedFilter {
            parent_id: parent.id.clone(),
            child: child.clone(),
        });
        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(m.filters()[0].linked_filter_id.as_deref(), Some(child.id.as_str()));
        assert_eq!(m.filters()[1].id, child.id);
    }

    #[test]
    fn attach_to_missing_parent_is_rejected() {
        let mut m = machine();
        let outcome = m.send(PanelEvent::AttachLinkedFilter {
            parent_id: "ghost".into(),
            child: ActiveFilter::empty(),
        });
        assert_eq!(outcome, Outcome::Rejected);
        assert!(m.filters().is_empty());
    }

    fn attached_pair(m: &mut FilterPanelMachine) -> (ActiveFilter, ActiveFilter) {
        let parent = filter_of("b", single("x"));
        let child = filter_of("c", crate::test_utils::multi(&[]));
        m.send(PanelEvent::AddFilter {
            filter: parent.clone(),
        });
        m.send(PanelEvent::AttachLinkedFilter {
            parent_id: parent.id.clone(),
            child: child.clone(),
        });
        (parent, child)
    }

    #[test]
    fn second_attach_to_same_parent_is_rejected() {
        let mut m = machine();
        let (parent, _) = attached_pair(&mut m);
        let before = m.context().clone();

        let outcome = m.send(PanelEvent::AttachLinkedFilter {
            parent_id: parent.id.clone(),
            child: filter_of("c", crate::test_utils::multi(&[])),
        });
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(m.context(), &before);
        assert_eq!(get_filter_groups(m.filters()).len(), 1);
    }

    #[test]
    fn attach_under_a_child_is_rejected() {
        let mut m = machine();
        let (_, child) = attached_pair(&mut m);
        let before = m.context().clone();

        let outcome = m.send(PanelEvent::AttachLinkedFilter {
            parent_id: child.id.clone(),
            child: filter_of("c", crate::test_utils::multi(&[])),
        });
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(m.context(), &before);
    }

    #[test]
    fn attach_with_existing_child_id_is_rejected() {
        let mut m = machine();
        let (_, child) = attached_pair(&mut m);
        let other = filter_of("a", single("q"));
        m.send(PanelEvent::AddFilter {
            filter: other.clone(),
        });
        let before = m.context().clone();

        let outcome = m.send(PanelEvent::AttachLinkedFilter {
            parent_id: other.id.clone(),
            child: child.clone(),
        });
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(m.context(), &before);

        // A filter already in the list cannot be re-attached as its own child either.
        let outcome = m.send(PanelEvent::AttachLinkedFilter {
            parent_id: other.id.clone(),
            child: other.clone(),
        });
        assert_eq!(outcome, Outcome::Rejected);
    }

    #[test]
    fn apply_is_guarded() {
        let mut m = machine();
        let now = Instant::now();
        assert_eq!(m.send_at(PanelEvent::ApplyFilters, now), Outcome::Rejected);
        assert_eq!(m.state_at(now), PanelState::Idle);

        m.send_at(
            PanelEvent::AddFilter {
                filter: ActiveFilter::empty(),
            },
            now,
        );
        assert_eq!(m.send_at(PanelEvent::ApplyFilters, now), Outcome::Rejected);
    }

    #[test]
    fn apply_settles_back_to_idle() {
        let mut m = machine();
        let now = Instant::now();
        m.send_at(
            PanelEvent::AddFilter {
                filter: filter_of("a", single("q")),
            },
            now,
        );

        assert_eq!(m.send_at(PanelEvent::ApplyFilters, now), Outcome::Handled);
        assert!(m.is_applying_at(now));
        assert!(m.is_applying_at(now + SETTLE / 2));
        assert!(!m.is_applying_at(now + SETTLE));
        // Context is untouched by the apply round trip.
        assert_eq!(m.filters().len(), 1);
    }

    #[test]
    fn events_while_applying_are_dropped() {
        let mut m = machine();
        let now = Instant::now();
        let f1 = filter_of("a", single("q"));
        m.send_at(PanelEvent::AddFilter { filter: f1.clone() }, now);
        m.send_at(PanelEvent::ApplyFilters, now);

        let mid = now + Duration::from_millis(100);
        assert_eq!(
            m.send_at(PanelEvent::DeleteFilter { id: f1.id.clone() }, mid),
            Outcome::Dropped
        );
        assert_eq!(m.send_at(PanelEvent::ClearFilters, mid), Outcome::Dropped);
        assert_eq!(m.filters().len(), 1);

        let after = now + SETTLE;
        assert_eq!(
            m.send_at(PanelEvent::DeleteFilter { id: f1.id.clone() }, after),
            Outcome::Handled
        );
        assert!(m.filters().is_empty());
        assert_eq!(m.state_at(after), PanelState::Idle);
    }

    #[test]
    fn reduce_is_pure() {
        let snapshot = Snapshot::default();
        let now = Instant::now();
        let (next, outcome) = reduce(&snapshot, &PanelEvent::ToggleLogicalOperator, now, SETTLE);
        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(next.context.logical_operator, LogicalOperator::Or);
        assert_eq!(snapshot.context.logical_operator, LogicalOperator::And);
    }
}
