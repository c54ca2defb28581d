//! # Row Addressing
//!
//! Filter ids are UUIDs, which nobody wants to type. Text clients address rows by a
//! display index derived from the canonical group view ([`crate::filters::get_filter_groups`]):
//!
//! - `1`, `2`, ...: the primary filter of group N (1-based, in group order)
//! - `l1`, `l2`, ...: the linked child of group N
//!
//! Indexes are positional. Deleting group 2 renumbers every group after it.

use crate::error::{FilterError, Result};
use crate::filters::FilterGroup;
use crate::model::ActiveFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterIndex {
    Primary(usize),
    Linked(usize),
}

impl FilterIndex {
    pub fn group(&self) -> usize {
        match self {
            FilterIndex::Primary(n) | FilterIndex::Linked(n) => *n,
        }
    }
}

impl std::fmt::Display for FilterIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterIndex::Primary(n) => write!(f, "{}", n),
            FilterIndex::Linked(n) => write!(f, "l{}", n),
        }
    }
}

impl std::str::FromStr for FilterIndex {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (linked, digits) = match s.strip_prefix('l') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        match digits.parse::<usize>() {
            Ok(n) if n > 0 && linked => Ok(FilterIndex::Linked(n)),
            Ok(n) if n > 0 => Ok(FilterIndex::Primary(n)),
            _ => Err(FilterError::Api(format!("Invalid index format: {}", s))),
        }
    }
}

/// Resolve a display index against the current group view.
pub fn resolve<'a>(groups: &[FilterGroup<'a>], index: FilterIndex) -> Result<&'a ActiveFilter> {
    let group = index
        .group()
        .checked_sub(1)
        .and_then(|i| groups.get(i))
        .ok_or_else(|| FilterError::FilterNotFound(index.to_string()))?;

    match index {
        FilterIndex::Primary(_) => Ok(group.primary),
        FilterIndex::Linked(_) => group
            .linked
            .ok_or_else(|| FilterError::FilterNotFound(index.to_string())),
    }
}

/// The display index of a filter id within the group view.
pub fn index_of(groups: &[FilterGroup<'_>], filter_id: &str) -> Option<FilterIndex> {
    groups.iter().enumerate().find_map(|(i, group)| {
        if group.primary.id == filter_id {
            Some(FilterIndex::Primary(i + 1))
        } else if group.linked.is_some_and(|l| l.id == filter_id) {
            Some(FilterIndex::Linked(i + 1))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::get_filter_groups;
    use crate::test_utils::{filter_of, multi, single};

    #[test]
    fn parses_primary_and_linked() {
        assert_eq!("3".parse::<FilterIndex>().unwrap(), FilterIndex::Primary(3));
        assert_eq!("l2".parse::<FilterIndex>().unwrap(), FilterIndex::Linked(2));
        assert_eq!(FilterIndex::Linked(2).to_string(), "l2");
        assert_eq!(FilterIndex::Primary(7).to_string(), "7");
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "0", "l0", "l", "x1", "-1", "p1"] {
            assert!(
                matches!(input.parse::<FilterIndex>(), Err(FilterError::Api(_))),
                "{input} should not parse"
            );
        }
    }

    #[test]
    fn resolves_against_groups() {
        let first = filter_of("a", single("q"));
        let mut parent = filter_of("b", single("x"));
        let child = filter_of("c", multi(&[]));
        parent.linked_filter_id = Some(child.id.clone());
        let filters = vec![first.clone(), parent.clone(), child.clone()];
        let groups = get_filter_groups(&filters);

        assert_eq!(resolve(&groups, FilterIndex::Primary(1)).unwrap().id, first.id);
        assert_eq!(resolve(&groups, FilterIndex::Primary(2)).unwrap().id, parent.id);
        assert_eq!(resolve(&groups, FilterIndex::Linked(2)).unwrap().id, child.id);
        assert!(resolve(&groups, FilterIndex::Linked(1)).is_err());
        assert!(resolve(&groups, FilterIndex::Primary(3)).is_err());

        assert_eq!(index_of(&groups, &child.id), Some(FilterIndex::Linked(2)));
        assert_eq!(index_of(&groups, &first.id), Some(FilterIndex::Primary(1)));
        assert_eq!(index_of(&groups, "ghost"), None);
    }
}
