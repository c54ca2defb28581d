//! # Filterbar
//!
//! A terminal host for the `filterapp` filter bar. The binary is intentionally thin: the
//! host lives in `src/cli/`, while this file only starts the runtime, invokes `cli::run()`
//! and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/filterapp/`: UI-agnostic library (registry, panel machine, linked filters)
//! - `crates/filterbar/`: this terminal host, depends on `filterapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (crates/filterbar/src/cli/)                           │
//! │  - clap flags and gesture grammar (setup.rs)                │
//! │  - Session loop and apply channel (commands.rs)             │
//! │  - minijinja templates + console styles (render.rs)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  FilterBar (crates/filterapp/src/bar.rs)                    │
//! │  - Gates and validates gestures                             │
//! │  - Runs the linked-filter lifecycle                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to each module, plus flow tests in `crates/filterapp/tests/`.
//! - **Host**: gesture parsing and rendering are unit tested with color off; whole sessions
//!   are driven end to end through stdin in `tests/`.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
