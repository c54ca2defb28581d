//! # Filterapp Architecture
//!
//! Filterapp is a **UI-agnostic filter bar library**. It holds the list of filters a user
//! has built, the linked parent→child relationship between them, and the small state
//! machine that gates applying them. A UI client (the `filterbar` terminal host, a web
//! front end, a TUI) renders what the library exposes and forwards gestures to it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI Client (crates/filterbar, or any other host)            │
//! │  - Renders filter groups, measures the viewport             │
//! │  - The ONLY place that knows about terminals or screens     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Orchestration (bar.rs)                                     │
//! │  - Translates gestures into panel events                    │
//! │  - Runs the linked-filter lifecycle on type changes         │
//! │  - Owns the registry, the machine, placement and scrolling  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Logic (machine.rs, linked.rs, filters.rs, layout.rs)       │
//! │  - Pure reducer over (state, event)                         │
//! │  - Pure predicates and derived views over &[ActiveFilter]   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry (registry/)                                       │
//! │  - DefinitionSource trait: MockSource, FileSource           │
//! │  - Validated, cached catalog with synchronous lookups       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout/stderr or exits the process. Diagnostics go
//! through `tracing`; the host decides whether and where a subscriber prints them.
//!
//! ## Linked Filters
//!
//! A filter definition may declare a `linkedFilter`. When a primary filter is switched
//! to such a type, a child filter is created and attached to it in one step. The child's
//! options narrow to the parent's selected value, its value resets whenever the parent's
//! value changes, and it is only usable while the parent is enabled and has a value.
//! The child cannot be toggled or deleted on its own.
//!
//! ## Module Overview
//!
//! - [`bar`]: The `FilterBar` facade, entry point for all gestures
//! - [`machine`]: Filter panel state machine (reducer + owner)
//! - [`linked`]: Linked filter decisions and child factory
//! - [`filters`]: Derived views (groups, validity, apply gating)
//! - [`layout`]: Add-button placement and viewport overflow
//! - [`index`]: Display indexes used by text UIs (`1`, `l1`)
//! - [`registry`]: Filter definition catalog and its sources
//! - [`model`]: Core data types
//! - [`config`]: Configuration
//! - [`error`]: Error types

pub mod bar;
pub mod config;
pub mod error;
pub mod filters;
pub mod index;
pub mod layout;
pub mod linked;
pub mod machine;
pub mod model;
pub mod registry;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
