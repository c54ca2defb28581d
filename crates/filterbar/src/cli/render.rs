//! # Rendering
//!
//! Turns library state into styled terminal text.
//!
//! Layout stays in Rust: row order comes from the library's group view, values are turned
//! into readable text here, and column widths are computed with `unicode-width`. Templates
//! pick up pre-computed pieces and apply semantic styles (see `styles.rs`).

use super::styles::{names, operator_style, FILTERBAR_THEME};
use super::templates::{
    APPLIED_TEMPLATE, BAR_TEMPLATE, DEFINITIONS_TEMPLATE, MESSAGE_TEMPLATE, OPTIONS_TEMPLATE,
};
use filterapp::bar::FilterBar;
use filterapp::filters::{get_filter_groups, is_filter_valid, FilterGroup};
use filterapp::layout::AddButtonPlacement;
use filterapp::model::{
    ActiveFilter, FilterDefinition, FilterOption, FilterValue, LogicalOperator, ValueType,
};
use filterapp::registry::FilterRegistry;
use minijinja::{Environment, Value};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

const LINKED_MARKER: &str = "↳";

#[derive(Serialize)]
struct Segment {
    text: String,
    style: String,
}

impl Segment {
    fn new(text: impl Into<String>, style: &str) -> Self {
        Self {
            text: text.into(),
            style: style.to_string(),
        }
    }
}

#[derive(Serialize)]
struct RowData {
    indent: String,
    index: String,
    index_style: String,
    segments: Vec<Segment>,
}

#[derive(Serialize)]
struct BarData {
    header: String,
    status: String,
    rows: Vec<RowData>,
    footer: String,
    footer_style: String,
}

#[derive(Serialize)]
struct AppliedData {
    expression: String,
    expression_style: String,
}

#[derive(Serialize)]
struct DefinitionLine {
    id: String,
    summary: String,
}

#[derive(Serialize)]
struct DefinitionsData {
    definitions: Vec<DefinitionLine>,
}

#[derive(Serialize)]
struct OptionsData {
    title: String,
    options: Vec<FilterOption>,
    empty_message: String,
}

#[derive(Serialize)]
struct MessageData {
    prefix: String,
    level: String,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Warning,
    Error,
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(use_color: bool) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_filter("style", move |value: Value, name: String| -> String {
            let text = value.to_string();
            if use_color {
                FILTERBAR_THEME.apply(&name, &text)
            } else {
                text
            }
        });
        env.add_template("bar", BAR_TEMPLATE)?;
        env.add_template("applied", APPLIED_TEMPLATE)?;
        env.add_template("definitions", DEFINITIONS_TEMPLATE)?;
        env.add_template("options", OPTIONS_TEMPLATE)?;
        env.add_template("message", MESSAGE_TEMPLATE)?;
        Ok(Self { env })
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> String {
        self.env
            .get_template(name)
            .and_then(|tmpl| tmpl.render(data))
            .map(|out| out.trim_end().to_string())
            .unwrap_or_else(|e| format!("Render error: {}", e))
    }

    /// The whole bar: header, one row per filter, and the add button.
    ///
    /// `focus` highlights the row the host was asked to scroll to.
    pub fn render_bar(&self, bar: &FilterBar, focus: Option<&str>) -> String {
        let registry = bar.registry();
        let mut status = format!(" · {} active", bar.active_count());
        if bar.is_applying() {
            status.push_str(" · applying");
        }

        let mut rows = Vec::new();
        if !bar.is_loading() {
            for (i, group) in bar.groups().iter().enumerate() {
                rows.push(primary_row(registry, i + 1, group.primary, focus));
                if let Some(child) = group.linked {
                    rows.push(linked_row(registry, i + 1, group, child, focus));
                }
            }
        }

        let (footer, footer_style) = if bar.is_loading() {
            ("Loading filter definitions...", names::MUTED)
        } else {
            match bar.placement() {
                AddButtonPlacement::EmptyState => {
                    ("No filters yet. Type `add` to create one.", names::PLACEHOLDER)
                }
                AddButtonPlacement::Inline => ("[+ add filter]", names::MUTED),
                AddButtonPlacement::Sticky => ("━━ [+ add filter] ━━", names::MUTED),
            }
        };

        let data = BarData {
            header: format!("Filters ({})", bar.logical_operator().to_string().to_uppercase()),
            status,
            rows,
            footer: footer.to_string(),
            footer_style: footer_style.to_string(),
        };
        self.render("bar", &data)
    }

    pub fn render_applied(
        &self,
        registry: &FilterRegistry,
        filters: &[ActiveFilter],
        operator: LogicalOperator,
    ) -> String {
        let expression = describe_applied(registry, filters, operator);
        let expression_style = if expression.is_empty() {
            names::PLACEHOLDER
        } else {
            names::VALUE
        };
        let data = AppliedData {
            expression: if expression.is_empty() {
                "(no active filters)".to_string()
            } else {
                expression
            },
            expression_style: expression_style.to_string(),
        };
        self.render("applied", &data)
    }

    pub fn render_definitions(&self, registry: &FilterRegistry) -> String {
        let primaries = registry.get_primary_filter_definitions();
        let width = primaries.iter().map(|d| d.id.width()).max().unwrap_or(0);
        let definitions = primaries
            .into_iter()
            .map(|def| DefinitionLine {
                id: format!("{}{}", def.id, " ".repeat(width - def.id.width())),
                summary: definition_summary(def),
            })
            .collect();
        self.render("definitions", &DefinitionsData { definitions })
    }

    pub fn render_options(&self, title: &str, options: &[&FilterOption]) -> String {
        let data = OptionsData {
            title: title.to_string(),
            options: options.iter().map(|o| (*o).clone()).collect(),
            empty_message: "no options available".to_string(),
        };
        self.render("options", &data)
    }

    pub fn render_message(&self, level: MessageLevel, message: &str) -> String {
        let (prefix, style) = match level {
            MessageLevel::Success => ("ok:", names::SUCCESS),
            MessageLevel::Warning => ("warning:", names::WARNING),
            MessageLevel::Error => ("error:", names::ERROR),
        };
        let data = MessageData {
            prefix: prefix.to_string(),
            level: style.to_string(),
            message: message.to_string(),
        };
        self.render("message", &data)
    }
}

fn index_style(filter: &ActiveFilter, focus: Option<&str>) -> &'static str {
    if focus == Some(filter.id.as_str()) {
        names::FOCUS
    } else {
        names::INDEX
    }
}

fn primary_row(
    registry: &FilterRegistry,
    group: usize,
    filter: &ActiveFilter,
    focus: Option<&str>,
) -> RowData {
    let definition = filter
        .filter_id
        .as_deref()
        .and_then(|id| registry.get_filter_definition(id));
    let mut segments = match definition {
        Some(def) => filter_segments(def, filter, filter.enabled),
        None => vec![Segment::new("choose a filter type", names::PLACEHOLDER)],
    };
    if !filter.enabled {
        segments.push(Segment::new("(disabled)", names::MUTED));
    }
    RowData {
        indent: "  ".to_string(),
        index: format!("{}.", group),
        index_style: index_style(filter, focus).to_string(),
        segments,
    }
}

fn linked_row(
    registry: &FilterRegistry,
    group: usize,
    parent: &FilterGroup<'_>,
    child: &ActiveFilter,
    focus: Option<&str>,
) -> RowData {
    let enabled = parent.linked_enabled();
    let mut segments = vec![Segment::new(LINKED_MARKER, names::MUTED)];
    if let Some(def) = child
        .filter_id
        .as_deref()
        .and_then(|id| registry.get_filter_definition(id))
    {
        segments.extend(filter_segments(def, child, enabled));
    }
    if !enabled {
        segments.push(Segment::new("(waiting for parent value)", names::MUTED));
    }
    RowData {
        indent: "    ".to_string(),
        index: format!("l{}.", group),
        index_style: index_style(child, focus).to_string(),
        segments,
    }
}

fn filter_segments(def: &FilterDefinition, filter: &ActiveFilter, enabled: bool) -> Vec<Segment> {
    let operator = def.operator(&filter.operator);
    let operator_label = operator.map_or(filter.operator.as_str(), |op| op.label.as_str());

    if !enabled {
        return vec![
            Segment::new(def.name.as_str(), names::DISABLED),
            Segment::new(operator_label, names::DISABLED),
            Segment::new(display_value(def, &filter.value), names::DISABLED),
        ];
    }

    let operator_style = operator.map_or(names::OPERATOR.to_string(), |op| operator_style(&op.color));
    let value = if filter.value.is_empty() {
        Segment::new(
            def.placeholder.as_deref().unwrap_or("(no value)"),
            names::PLACEHOLDER,
        )
    } else {
        Segment::new(display_value(def, &filter.value), names::VALUE)
    };
    vec![
        Segment::new(def.name.as_str(), names::FILTER_NAME),
        Segment::new(operator_label, &operator_style),
        value,
    ]
}

/// A value as the user reads it: option labels for selects, the raw text otherwise.
fn display_value(def: &FilterDefinition, value: &FilterValue) -> String {
    let label = |id: &str| {
        def.option(id)
            .map_or_else(|| id.to_string(), |opt| opt.label.clone())
    };
    match (def.value_type, value) {
        (ValueType::Text, FilterValue::Single(text)) => format!("\"{}\"", text),
        (_, FilterValue::Multi(values)) => format!(
            "[{}]",
            values.iter().map(|v| label(v.as_str())).collect::<Vec<_>>().join(", ")
        ),
        (_, FilterValue::Single(id)) => label(id.as_str()),
    }
}

fn definition_summary(def: &FilterDefinition) -> String {
    let mut summary = def.value_type.to_string();
    if !def.options.is_empty() {
        summary.push_str(&format!(", {} options", def.options.len()));
    }
    if let Some(linked) = &def.linked_filter {
        summary.push_str(&format!(", narrows {}", linked.filter_id));
    }
    summary
}

/// The applied filters as an expression, e.g.
/// `status is open AND (category is hardware AND subcategory in [laptops])`.
///
/// Only enabled, valid primaries take part. A linked child joins its parent with AND
/// when it is effectively enabled and has a value. Empty when nothing is active.
pub fn describe_applied(
    registry: &FilterRegistry,
    filters: &[ActiveFilter],
    operator: LogicalOperator,
) -> String {
    let joiner = format!(" {} ", operator.to_string().to_uppercase());
    get_filter_groups(filters)
        .iter()
        .filter(|group| group.primary.enabled && is_filter_valid(group.primary))
        .map(|group| {
            let parent = term(registry, group.primary);
            match group.linked {
                Some(child) if group.linked_enabled() && is_filter_valid(child) => {
                    format!("({} AND {})", parent, term(registry, child))
                }
                _ => parent,
            }
        })
        .collect::<Vec<_>>()
        .join(&joiner)
}

fn term(registry: &FilterRegistry, filter: &ActiveFilter) -> String {
    let definition_id = filter.filter_id.as_deref().unwrap_or_default();
    let value = match (&filter.value, registry.get_filter_definition(definition_id)) {
        (FilterValue::Single(text), Some(def)) if def.value_type == ValueType::Text => {
            format!("\"{}\"", text)
        }
        (FilterValue::Single(id), _) => id.clone(),
        (FilterValue::Multi(ids), _) => format!("[{}]", ids.join(", ")),
    };
    format!("{} {} {}", definition_id, filter.operator, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterapp::config::FilterBarConfig;
    use filterapp::registry::catalog::builtin_definitions;

    fn registry() -> FilterRegistry {
        FilterRegistry::with_definitions(builtin_definitions()).unwrap()
    }

    fn bar() -> FilterBar {
        let config = FilterBarConfig {
            apply_settle_ms: 0,
            ..FilterBarConfig::default()
        };
        FilterBar::new(registry(), &config)
    }

    fn renderer() -> Renderer {
        Renderer::new(false).unwrap()
    }

    fn child_id(bar: &FilterBar, parent: &str) -> String {
        bar.filters()
            .iter()
            .find(|f| f.id == parent)
            .and_then(|f| f.linked_filter_id.clone())
            .unwrap()
    }

    #[test]
    fn empty_bar_shows_prompt() {
        let out = renderer().render_bar(&bar(), None);
        assert!(out.starts_with("Filters (AND) · 0 active"));
        assert!(out.contains("No filters yet."));
    }

    #[test]
    fn rows_follow_groups() {
        let mut bar = bar();
        let status = bar.add_filter().unwrap();
        bar.change_filter_type(&status, "status").unwrap();
        bar.set_value(&status, FilterValue::Single("open".into())).unwrap();
        let category = bar.add_filter().unwrap();
        bar.change_filter_type(&category, "category").unwrap();

        let out = renderer().render_bar(&bar, None);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "  1. Status is Open");
        assert_eq!(lines[2], "  2. Category is (no value)");
        assert_eq!(
            lines[3],
            "    l2. ↳ Subcategory is any of [] (waiting for parent value)"
        );
        assert_eq!(lines[4], "[+ add filter]");
    }

    #[test]
    fn focus_and_loading_states() {
        let mut bar = bar();
        let id = bar.add_filter().unwrap();
        let out = renderer().render_bar(&bar, Some(&id));
        assert!(out.contains("1. choose a filter type"));

        let loading = FilterBar::new(
            FilterRegistry::new(filterapp::registry::MockSource::builtin()),
            &FilterBarConfig::default(),
        );
        let out = renderer().render_bar(&loading, None);
        assert!(out.contains("Loading filter definitions..."));
    }

    #[test]
    fn applied_expression_nests_linked_children() {
        let mut bar = bar();
        let status = bar.add_filter().unwrap();
        bar.change_filter_type(&status, "status").unwrap();
        bar.set_value(&status, FilterValue::Single("open".into())).unwrap();
        let category = bar.add_filter().unwrap();
        bar.change_filter_type(&category, "category").unwrap();
        bar.set_value(&category, FilterValue::Single("hardware".into()))
            .unwrap();
        let sub = child_id(&bar, &category);
        bar.set_value(&sub, FilterValue::Multi(vec!["laptops".into()]))
            .unwrap();

        assert_eq!(
            describe_applied(bar.registry(), bar.filters(), LogicalOperator::And),
            "status is open AND (category is hardware AND subcategory in [laptops])"
        );
        assert_eq!(
            describe_applied(bar.registry(), bar.filters(), LogicalOperator::Or),
            "status is open OR (category is hardware AND subcategory in [laptops])"
        );
    }

    #[test]
    fn applied_expression_skips_inactive() {
        let mut bar = bar();
        let title = bar.add_filter().unwrap();
        bar.change_filter_type(&title, "title").unwrap();
        bar.set_value(&title, FilterValue::Single("gpu".into())).unwrap();
        let off = bar.add_filter().unwrap();
        bar.change_filter_type(&off, "priority").unwrap();
        bar.set_value(&off, FilterValue::Single("high".into())).unwrap();
        bar.toggle_filter(&off).unwrap();
        bar.add_filter().unwrap();

        assert_eq!(
            describe_applied(bar.registry(), bar.filters(), LogicalOperator::And),
            "title contains \"gpu\""
        );
        let out = renderer().render_applied(bar.registry(), &[], LogicalOperator::And);
        assert_eq!(out, "applied: (no active filters)");
    }

    #[test]
    fn definitions_list_primaries() {
        let out = renderer().render_definitions(&registry());
        assert!(out.starts_with("Filter types"));
        assert!(out.contains("category"));
        assert!(out.contains("narrows subcategory"));
    }

    #[test]
    fn messages_have_prefixes() {
        let r = renderer();
        assert_eq!(r.render_message(MessageLevel::Warning, "careful"), "warning: careful");
        assert_eq!(r.render_message(MessageLevel::Error, "boom"), "error: boom");
        assert_eq!(r.render_message(MessageLevel::Success, "done"), "ok: done");
    }

    #[test]
    fn color_toggle_controls_ansi() {
        let plain = renderer().render_message(MessageLevel::Error, "boom");
        let colored = Renderer::new(true)
            .unwrap()
            .render_message(MessageLevel::Error, "boom");
        assert!(!plain.contains('\u{1b}'));
        assert!(colored.contains('\u{1b}'));
    }
}
