//! # Terminal Host
//!
//! This is **one possible UI client** for filterapp, not the application itself. It plays
//! the role a screen would: it draws the bar after each change and forwards gestures.
//!
//! ## Gestures
//!
//! Read one per line from `--script` or stdin:
//!
//! ```text
//! add                        append an empty filter
//! type <row> <definition>    set a filter's type (see `defs`)
//! op <row> <operator>        set a filter's operator
//! value <row> [values...]    set a filter's value (no values clears it)
//! toggle <row>               enable or disable a filter
//! delete <row>               delete a filter and its linked filter
//! logic                      switch between AND and OR
//! apply                      apply the filters and print the expression
//! clear                      remove every filter
//! show | defs | options <row>
//! resize <rows> | wait <millis> | quit
//! ```
//!
//! Rows are addressed by display index: `2` is the second filter, `l2` its linked filter.
//!
//! ## Module Structure
//!
//! - `commands`: startup and the session loop
//! - `setup`: flags and the per-line gesture grammar, via clap
//! - `render`: turns bar state into text
//! - `styles`: terminal styles
//! - `templates`: output templates

mod commands;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;
