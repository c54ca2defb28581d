//! # Session Loop
//!
//! The host is the **only** place that touches stdin, stdout and stderr:
//!
//! 1. **Startup**: parse flags, set up logging, load `config.json`, pick a catalog source.
//!    Any failure here ends the process with status 1.
//! 2. **Mount**: load the catalog. A failed load is logged by the library and the session
//!    continues with the bar in its loading state.
//! 3. **Gestures**: one per input line. A line that does not parse prints an error, a
//!    gesture the bar refuses prints a warning, and the session goes on either way.
//!
//! Applied filters reach the host through the library's apply callback. The callback only
//! forwards a copy over a channel; the session drains it after each `apply` and prints
//! the applied expression.

use super::render::{MessageLevel, Renderer};
use super::setup::{parse_line, Cli, Gesture};
use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use filterapp::bar::FilterBar;
use filterapp::config::FilterBarConfig;
use filterapp::error::FilterError;
use filterapp::index::{index_of, resolve, FilterIndex};
use filterapp::model::{ActiveFilter, FilterValue, LogicalOperator, ValueType};
use filterapp::registry::{FileSource, FilterRegistry, MockSource};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

struct Applied {
    filters: Vec<ActiveFilter>,
    operator: LogicalOperator,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config_dir = resolve_config_dir(&cli)?;
    match FilterBarConfig::init(&config_dir) {
        Ok(true) => tracing::info!(dir = %config_dir.display(), "wrote default config"),
        Ok(false) => {}
        Err(e) => tracing::warn!(dir = %config_dir.display(), "cannot write default config: {}", e),
    }
    let config = FilterBarConfig::load(&config_dir)
        .with_context(|| format!("failed to load config from {}", config_dir.display()))?;
    tracing::debug!(dir = %config_dir.display(), ?config, "configuration loaded");

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open script {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let use_color = !cli.no_color && console::Term::stdout().features().colors_supported();
    let renderer = Renderer::new(use_color).context("failed to load templates")?;

    let mut bar = FilterBar::new(build_registry(&cli, &config), &config);
    let (tx, applied) = mpsc::channel();
    bar.on_apply(forward_applied(tx));

    bar.mount().await;
    let mut session = Session {
        bar,
        renderer,
        applied,
    };
    session.run(input).await
}

/// The apply callback: copies the applied filters onto the session's channel.
fn forward_applied(
    tx: Sender<Applied>,
) -> impl FnMut(&[ActiveFilter], LogicalOperator) + Send + 'static {
    move |filters, operator| {
        let applied = Applied {
            filters: filters.to_vec(),
            operator,
        };
        if tx.send(applied).is_err() {
            tracing::warn!("session is gone, dropping applied filters");
        }
    }
}

fn setup_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn resolve_config_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.config_dir {
        return Ok(dir.clone());
    }
    ProjectDirs::from("", "", "filterbar")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .context("cannot determine a config directory; pass --config-dir")
}

fn build_registry(cli: &Cli, config: &FilterBarConfig) -> FilterRegistry {
    match cli.catalog.as_ref().or(config.catalog.as_ref()) {
        Some(path) => FilterRegistry::new(FileSource::new(path)),
        None => FilterRegistry::new(MockSource::builtin().with_latency(config.fetch_latency())),
    }
}

struct Session {
    bar: FilterBar,
    renderer: Renderer,
    applied: Receiver<Applied>,
}

impl Session {
    async fn run(&mut self, input: Box<dyn BufRead>) -> Result<()> {
        self.print_bar();
        for line in input.lines() {
            let line = line.context("failed to read input")?;
            let gesture = match parse_line(&line) {
                None => continue,
                Some(Ok(gesture)) => gesture,
                Some(Err(e)) if e.kind() == clap::error::ErrorKind::DisplayHelp => {
                    println!("{}", e.to_string().trim_end());
                    continue;
                }
                Some(Err(e)) => {
                    let message = e.to_string();
                    let first = message.lines().next().unwrap_or_default();
                    self.say(MessageLevel::Error, first.trim_start_matches("error: "));
                    continue;
                }
            };
            if gesture == Gesture::Quit {
                break;
            }

            let redraw = gesture.redraws();
            match self.handle(gesture).await {
                Ok(()) if redraw => self.print_bar(),
                Ok(()) => {}
                Err(e) => self.warn(&e.to_string()),
            }
        }
        Ok(())
    }

    async fn handle(&mut self, gesture: Gesture) -> Result<(), FilterError> {
        match gesture {
            Gesture::Add => {
                self.bar.add_filter()?;
            }
            Gesture::Type { target, definition } => {
                let id = self.target(&target)?;
                self.bar.change_filter_type(&id, &definition)?;
            }
            Gesture::Op { target, operator } => {
                let id = self.target(&target)?;
                self.bar.set_operator(&id, &operator)?;
            }
            Gesture::Value { target, values } => {
                let id = self.target(&target)?;
                let value = self.value_for(&id, values);
                self.bar.set_value(&id, value)?;
            }
            Gesture::Toggle { target } => {
                let id = self.target(&target)?;
                self.bar.toggle_filter(&id)?;
            }
            Gesture::Delete { target } => {
                let id = self.target(&target)?;
                self.bar.delete_filter(&id)?;
            }
            Gesture::Logic => {
                self.bar.toggle_logical_operator()?;
            }
            Gesture::Apply => {
                if !self.bar.apply()? {
                    self.warn("nothing to apply: add a filter and choose its type");
                }
                while let Ok(applied) = self.applied.try_recv() {
                    println!(
                        "{}",
                        self.renderer.render_applied(
                            self.bar.registry(),
                            &applied.filters,
                            applied.operator
                        )
                    );
                }
            }
            Gesture::Clear => {
                let removed = self.bar.filters().len();
                self.bar.clear()?;
                self.say(MessageLevel::Success, &format!("removed {} filters", removed));
            }
            Gesture::Show => {}
            Gesture::Defs => {
                if self.bar.is_loading() {
                    return Err(FilterError::NotReady);
                }
                println!("{}", self.renderer.render_definitions(self.bar.registry()));
            }
            Gesture::Options { target } => {
                let id = self.target(&target)?;
                let options = self.bar.options_for(&id)?;
                let title = format!("Options for {}", target);
                println!("{}", self.renderer.render_options(&title, &options));
            }
            Gesture::Resize { rows } => self.bar.resize(rows),
            Gesture::Wait { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
            Gesture::Quit => {}
        }
        Ok(())
    }

    /// Resolve a display index to a filter id.
    fn target(&self, target: &str) -> Result<String, FilterError> {
        let index: FilterIndex = target.parse()?;
        let groups = self.bar.groups();
        Ok(resolve(&groups, index)?.id.clone())
    }

    /// Shape the typed words into a value for the filter's type.
    fn value_for(&self, id: &str, values: Vec<String>) -> FilterValue {
        let value_type = self
            .bar
            .filters()
            .iter()
            .find(|f| f.id == id)
            .and_then(|f| f.filter_id.as_deref())
            .and_then(|def| self.bar.registry().get_filter_definition(def))
            .map(|def| def.value_type);
        match value_type {
            Some(ValueType::MultiSelect) => FilterValue::Multi(values),
            Some(ValueType::SingleSelect) if values.len() > 1 => FilterValue::Multi(values),
            _ => FilterValue::Single(values.join(" ")),
        }
    }

    fn print_bar(&mut self) {
        let focus = self.bar.take_scroll_request();
        if let Some(request) = &focus {
            let groups = self.bar.groups();
            tracing::debug!(
                index = ?index_of(&groups, &request.filter_id).map(|i| i.to_string()),
                "scrolling to new filter"
            );
        }
        println!(
            "{}",
            self.renderer
                .render_bar(&self.bar, focus.as_ref().map(|req| req.filter_id.as_str()))
        );
    }

    fn warn(&self, message: &str) {
        self.say(MessageLevel::Warning, message);
    }

    /// Success goes to stdout with the bar; warnings and errors go to stderr.
    fn say(&self, level: MessageLevel, message: &str) {
        let line = self.renderer.render_message(level, message);
        match level {
            MessageLevel::Success => println!("{}", line),
            MessageLevel::Warning | MessageLevel::Error => eprintln!("{}", line),
        }
    }
}
