#![forbid(unsafe_code)]

//! Command-line argument parsing for the form demo.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `FORMNAV_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
formnav-demo: keyboard-driven data entry form

USAGE:
    formnav-demo [OPTIONS]

OPTIONS:
    --screen-mode=MODE   Screen mode: 'alt' (default) or 'inline'
    --no-results         Do not show the last submitted values
    --log-file=PATH      Write logs to PATH (filter with FORMNAV_LOG)
    --exit-after-ms=N    Quit after N milliseconds (0 = never)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Enter            Validate field and move on / submit from the button
    Tab / Shift-Tab  Move between controls without validating
    Left / Right     Change the gender selection
    Space            Activate the submit button
    Esc / Ctrl+C     Quit

ENVIRONMENT VARIABLES:
    FORMNAV_DEMO_SCREEN_MODE     Override --screen-mode (alt|inline)
    FORMNAV_DEMO_SHOW_RESULTS    0 disables the results panel
    FORMNAV_DEMO_LOG_FILE        Override --log-file
    FORMNAV_DEMO_EXIT_AFTER_MS   Auto-quit after N milliseconds (for testing)
    FORMNAV_LOG                  Log filter, e.g. 'formnav_form=debug'";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Screen mode: "alt" or "inline".
    pub screen_mode: String,
    /// Keep and display the last submitted values.
    pub show_results: bool,
    /// Log destination; logging is off when unset.
    pub log_file: Option<PathBuf>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            screen_mode: "alt".into(),
            show_results: true,
            log_file: None,
            exit_after_ms: 0,
        }
    }
}

/// Result of parsing arguments that did not produce options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseExit {
    Help,
    Version,
    Invalid(String),
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags. Prints help/version or an error and
    /// exits when parsing does not yield options.
    pub fn parse() -> Self {
        let base = Self::from_env(|key| env::var(key).ok());
        match base.with_args(env::args().skip(1)) {
            Ok(opts) => opts,
            Err(ParseExit::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseExit::Version) => {
                println!("formnav-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseExit::Invalid(msg)) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Defaults overridden by whatever `lookup` finds.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        if let Some(val) = lookup("FORMNAV_DEMO_SCREEN_MODE") {
            opts.screen_mode = val;
        }
        if let Some(val) = lookup("FORMNAV_DEMO_SHOW_RESULTS") {
            opts.show_results = !matches!(val.as_str(), "0" | "false" | "no" | "off");
        }
        if let Some(val) = lookup("FORMNAV_DEMO_LOG_FILE")
            && !val.is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("FORMNAV_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }
        opts
    }

    /// Apply command-line flags on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseExit`] for `--help`, `--version`, and bad arguments.
    pub fn with_args(
        mut self,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Self, ParseExit> {
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Err(ParseExit::Help),
                "--version" | "-V" => return Err(ParseExit::Version),
                "--no-results" => self.show_results = false,
                other => {
                    if let Some(val) = other.strip_prefix("--screen-mode=") {
                        match val {
                            "alt" | "inline" => self.screen_mode = val.to_string(),
                            _ => {
                                return Err(ParseExit::Invalid(format!(
                                    "Invalid --screen-mode value: {val}"
                                )));
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        self.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        self.exit_after_ms = val.parse().map_err(|_| {
                            ParseExit::Invalid(format!("Invalid --exit-after-ms value: {val}"))
                        })?;
                    } else {
                        return Err(ParseExit::Invalid(format!("Unknown argument: {other}")));
                    }
                }
            }
        }
        Ok(self)
    }

    /// Whether to draw in the alternate screen.
    #[must_use]
    pub fn alternate_screen(&self) -> bool {
        self.screen_mode != "inline"
    }
}
