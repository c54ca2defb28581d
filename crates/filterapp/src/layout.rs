//! Add-button placement.
//!
//! With no filters the bar shows an empty-state prompt. Once filters exist the add
//! button sits inline after the last row, unless the rows overflow the visible area,
//! in which case it sticks to the bottom edge so it stays reachable.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddButtonPlacement {
    EmptyState,
    Inline,
    Sticky,
}

/// Heights are in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub content_height: usize,
    pub visible_height: usize,
}

impl Viewport {
    pub fn new(content_height: usize, visible_height: usize) -> Self {
        Self {
            content_height,
            visible_height,
        }
    }

    pub fn overflowing(&self) -> bool {
        self.content_height > self.visible_height
    }
}

pub fn placement(has_filters: bool, viewport: Viewport) -> AddButtonPlacement {
    if !has_filters {
        AddButtonPlacement::EmptyState
    } else if viewport.overflowing() {
        AddButtonPlacement::Sticky
    } else {
        AddButtonPlacement::Inline
    }
}

/// A request for the host to bring a filter row into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub filter_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bar_shows_empty_state() {
        assert_eq!(
            placement(false, Viewport::new(40, 10)),
            AddButtonPlacement::EmptyState
        );
    }

    #[test]
    fn fitting_content_is_inline() {
        assert_eq!(placement(true, Viewport::new(3, 10)), AddButtonPlacement::Inline);
        assert_eq!(placement(true, Viewport::new(10, 10)), AddButtonPlacement::Inline);
    }

    #[test]
    fn overflow_is_sticky() {
        assert_eq!(placement(true, Viewport::new(11, 10)), AddButtonPlacement::Sticky);
    }
}
