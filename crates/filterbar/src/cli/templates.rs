//! # CLI Templates
//!
//! Terminal output is rendered from minijinja templates kept as stand-alone files next to
//! this module and embedded at compile time.
//!
//! Layout decisions (which rows exist, what a value reads as, which style a piece gets) are
//! made in Rust by `render.rs`. Templates only arrange the pieces and apply styles by name
//! through the `style` filter.
//!
//! Line breaks are explicit: block tags use `-%}` so that loops do not leak blank lines.

pub const BAR_TEMPLATE: &str = include_str!("templates/bar.tmp");
pub const APPLIED_TEMPLATE: &str = include_str!("templates/applied.tmp");
pub const DEFINITIONS_TEMPLATE: &str = include_str!("templates/definitions.tmp");
pub const OPTIONS_TEMPLATE: &str = include_str!("templates/options.tmp");
pub const MESSAGE_TEMPLATE: &str = include_str!("templates/message.tmp");
