//! Styles for the filterbar terminal host.
//!
//! Templates refer to styles by semantic name (`index`, `operator-red`, `disabled`) and never
//! to colors directly. The `style` template filter looks the name up in [`FILTERBAR_THEME`].
//! Unknown names render the text unchanged.
//!
//! Operator styles are keyed by the `color` an operator carries in the catalog, so a catalog
//! can color its operators without the host knowing about them. Unknown colors fall back to
//! the plain `operator` style.
//!
//! Every style is built with `force_styling(true)`: whether ANSI codes are emitted is decided
//! once by the renderer (`--no-color`, terminal detection), not per style.

use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const HEADER: &str = "header";
    pub const MUTED: &str = "muted";
    pub const INDEX: &str = "index";
    pub const FILTER_NAME: &str = "filter-name";
    pub const OPERATOR: &str = "operator";
    pub const VALUE: &str = "value";
    pub const DISABLED: &str = "disabled";
    pub const PLACEHOLDER: &str = "placeholder";
    pub const FOCUS: &str = "focus";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
}

/// A set of named styles.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    styles: HashMap<String, Style>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles.insert(name.to_string(), style.force_styling(true));
        self
    }

    pub fn apply(&self, name: &str, text: &str) -> String {
        match self.styles.get(name) {
            Some(style) => style.apply_to(text).to_string(),
            None => text.to_string(),
        }
    }
}

/// The style name for an operator with the given catalog color.
pub fn operator_style(color: &str) -> String {
    let name = format!("{}-{}", names::OPERATOR, color);
    if FILTERBAR_THEME.styles.contains_key(&name) {
        name
    } else {
        names::OPERATOR.to_string()
    }
}

pub static FILTERBAR_THEME: Lazy<Theme> = Lazy::new(build_theme);

fn build_theme() -> Theme {
    let muted = Style::new().color256(245);

    Theme::new()
        .add(names::HEADER, Style::new().bold())
        .add(names::MUTED, muted.clone())
        .add(names::INDEX, Style::new().yellow())
        .add(names::FILTER_NAME, Style::new().bold())
        .add(names::OPERATOR, Style::new().cyan())
        .add("operator-blue", Style::new().blue())
        .add("operator-green", Style::new().green())
        .add("operator-red", Style::new().red())
        .add(names::VALUE, Style::new().white())
        .add(names::DISABLED, muted.clone().strikethrough())
        .add(names::PLACEHOLDER, muted.italic())
        .add(names::FOCUS, Style::new().black().on_yellow())
        .add(names::SUCCESS, Style::new().green())
        .add(names::WARNING, Style::new().yellow().bold())
        .add(names::ERROR, Style::new().red().bold())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_style_leaves_text_alone() {
        assert_eq!(FILTERBAR_THEME.apply("nope", "text"), "text");
    }

    #[test]
    fn known_style_emits_ansi() {
        let styled = FILTERBAR_THEME.apply(names::ERROR, "boom");
        assert!(styled.contains("boom"));
        assert!(styled.contains('\u{1b}'));
    }

    #[test]
    fn operator_colors_fall_back() {
        assert_eq!(operator_style("red"), "operator-red");
        assert_eq!(operator_style("magenta"), names::OPERATOR);
    }
}
