use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "filterbar",
    bin_name = "filterbar",
    version,
    about = "Build, edit and apply a filter bar from the terminal",
    long_about = None,
    after_help = "Gestures are read one per line from --script or stdin.\nRun `filterbar` and type `help` to list them."
)]
pub struct Cli {
    /// Catalog file (JSON array of filter definitions) instead of the built-in catalog
    #[arg(long, value_name = "PATH", help_heading = "Options")]
    pub catalog: Option<PathBuf>,

    /// Directory holding config.json
    #[arg(long, value_name = "DIR", help_heading = "Options")]
    pub config_dir: Option<PathBuf>,

    /// Read gestures from a file instead of stdin
    #[arg(long, value_name = "PATH", help_heading = "Options")]
    pub script: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, help_heading = "Options")]
    pub no_color: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

/// One line of session input, parsed as if the gesture were a command.
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct Line {
    #[command(subcommand)]
    pub gesture: Gesture,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Add an empty filter
    Add,

    /// Set the type of a filter
    Type {
        /// Row index (e.g. 1)
        target: String,
        /// Filter type id (see `defs`)
        definition: String,
    },

    /// Set the operator of a filter
    Op {
        /// Row index (e.g. 1 or l1)
        target: String,
        /// Operator id
        operator: String,
    },

    /// Set the value of a filter (no values clears it)
    Value {
        /// Row index (e.g. 1 or l1)
        target: String,
        /// Option ids, or words of a text value
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Enable or disable a filter
    Toggle { target: String },

    /// Delete a filter (and its linked filter)
    Delete { target: String },

    /// Switch between AND and OR
    Logic,

    /// Apply the filters
    Apply,

    /// Remove every filter
    Clear,

    /// Show the bar
    Show,

    /// List the filter types
    Defs,

    /// List the options currently available to a filter
    Options { target: String },

    /// Set how many rows fit on screen
    Resize { rows: usize },

    /// Pause the session
    Wait { millis: u64 },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

impl Gesture {
    /// Whether the bar should be redrawn after this gesture succeeds.
    pub fn redraws(&self) -> bool {
        matches!(
            self,
            Gesture::Add
                | Gesture::Type { .. }
                | Gesture::Op { .. }
                | Gesture::Value { .. }
                | Gesture::Toggle { .. }
                | Gesture::Delete { .. }
                | Gesture::Logic
                | Gesture::Clear
                | Gesture::Show
                | Gesture::Resize { .. }
        )
    }
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Option<Result<Gesture, clap::Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(Line::try_parse_from(trimmed.split_whitespace()).map(|line| line.gesture))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Gesture {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "filterbar",
            "--catalog",
            "cat.json",
            "--no-color",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("cat.json")));
        assert!(cli.no_color);
        assert_eq!(cli.verbose, 2);
        assert!(cli.script.is_none());
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("# a comment").is_none());
    }

    #[test]
    fn test_gestures() {
        assert_eq!(parse("add"), Gesture::Add);
        assert_eq!(
            parse("type 1 status"),
            Gesture::Type {
                target: "1".into(),
                definition: "status".into()
            }
        );
        assert_eq!(
            parse("value l2 laptops monitors"),
            Gesture::Value {
                target: "l2".into(),
                values: vec!["laptops".into(), "monitors".into()]
            }
        );
        assert_eq!(
            parse("value 1"),
            Gesture::Value {
                target: "1".into(),
                values: vec![]
            }
        );
        assert_eq!(parse("resize 3"), Gesture::Resize { rows: 3 });
        assert_eq!(parse("exit"), Gesture::Quit);
    }

    #[test]
    fn test_bad_gestures() {
        assert!(parse_line("frobnicate").unwrap().is_err());
        assert!(parse_line("type 1").unwrap().is_err());
        assert!(parse_line("wait soon").unwrap().is_err());
    }

    #[test]
    fn test_redraws() {
        assert!(Gesture::Add.redraws());
        assert!(!Gesture::Apply.redraws());
        assert!(!Gesture::Defs.redraws());
    }
}
