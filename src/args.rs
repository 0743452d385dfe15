//! Command-line argument parsing and processing.
//!
//! Hand-rolled parsing into a [`CliAction`] so main stays a plain dispatch.
//! Help and version flags take precedence over everything else; unknown
//! arguments show help and exit with an error status.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the prayer display engine with these settings
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print a day's prayer timetable and exit
    Timetable {
        /// `YYYY-MM-DD`; today when absent
        date: Option<String>,
        json: bool,
        config_dir: Option<String>,
    },
    /// Run the engine under simulated time to watch transitions quickly
    Simulate {
        debug_enabled: bool,
        start_time: String,
        end_time: String,
        multiplier: f64,
        config_dir: Option<String>,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Default speed-up for `simulate` when no multiplier is given.
const DEFAULT_SIMULATION_MULTIPLIER: f64 = 60.0;

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Help and version take precedence wherever they appear
        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let debug_enabled = args_vec.iter().any(|arg| arg == "--debug" || arg == "-d");
        let config_dir = args_vec
            .iter()
            .position(|arg| arg == "--config" || arg == "-c")
            .and_then(|idx| args_vec.get(idx + 1))
            .cloned();

        // Find the subcommand: the first token that is neither a flag nor
        // the value of a value-consuming flag
        let command_idx = find_command_index(&args_vec);

        match command_idx.map(|idx| args_vec[idx].as_str()) {
            Some("timetable") => {
                let date = args_vec
                    .iter()
                    .position(|arg| arg == "--date")
                    .and_then(|idx| args_vec.get(idx + 1))
                    .cloned();
                let json = args_vec.iter().any(|arg| arg == "--json");
                ParsedArgs {
                    action: CliAction::Timetable {
                        date,
                        json,
                        config_dir,
                    },
                }
            }
            Some("simulate") => {
                // Positional arguments: <start> <end> [multiplier]
                let cmd_idx = command_idx.unwrap_or(0);
                let positionals = collect_positionals(&args_vec, cmd_idx + 1);

                let (start_time, end_time) = match (positionals.first(), positionals.get(1)) {
                    (Some(start), Some(end)) => (start.clone(), end.clone()),
                    _ => {
                        log_warning!(
                            "Missing arguments for simulate. \
                             Usage: adzanr simulate <start> <end> [multiplier]"
                        );
                        return ParsedArgs {
                            action: CliAction::ShowHelpDueToError,
                        };
                    }
                };

                let multiplier = match positionals.get(2) {
                    None => DEFAULT_SIMULATION_MULTIPLIER,
                    Some(raw) => match raw.parse::<f64>() {
                        Ok(m) if m > 0.0 => m,
                        _ => {
                            log_warning!("Invalid simulation multiplier '{}'", raw);
                            return ParsedArgs {
                                action: CliAction::ShowHelpDueToError,
                            };
                        }
                    },
                };

                ParsedArgs {
                    action: CliAction::Simulate {
                        debug_enabled,
                        start_time,
                        end_time,
                        multiplier,
                        config_dir,
                    },
                }
            }
            Some(unknown) => {
                log_warning!("Unknown command '{}'", unknown);
                ParsedArgs {
                    action: CliAction::ShowHelpDueToError,
                }
            }
            None => {
                if has_unknown_flags(&args_vec) {
                    ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    }
                } else {
                    ParsedArgs {
                        action: CliAction::Run {
                            debug_enabled,
                            config_dir,
                        },
                    }
                }
            }
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

fn consumes_value(flag: &str) -> bool {
    matches!(flag, "--config" | "-c" | "--date")
}

fn find_command_index(args_vec: &[String]) -> Option<usize> {
    let mut idx = 0;
    while idx < args_vec.len() {
        let arg = &args_vec[idx];
        if arg.starts_with('-') {
            idx += if consumes_value(arg) { 2 } else { 1 };
        } else {
            return Some(idx);
        }
    }
    None
}

fn collect_positionals(args_vec: &[String], start: usize) -> Vec<String> {
    let mut positionals = Vec::new();
    let mut idx = start;
    while idx < args_vec.len() {
        let arg = &args_vec[idx];
        if arg.starts_with('-') {
            idx += if consumes_value(arg) { 2 } else { 1 };
        } else {
            positionals.push(arg.clone());
            idx += 1;
        }
    }
    positionals
}

fn has_unknown_flags(args_vec: &[String]) -> bool {
    let mut unknown = false;
    let mut idx = 0;
    while idx < args_vec.len() {
        let arg = &args_vec[idx];
        match arg.as_str() {
            "--config" | "-c" => idx += 2,
            "--debug" | "-d" => idx += 1,
            other if other.starts_with('-') => {
                log_warning!("Unknown option '{}'", other);
                unknown = true;
                idx += 1;
            }
            _ => idx += 1,
        }
    }
    unknown
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("adzanr [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("timetable [--date YYYY-MM-DD] [--json]");
    log_indented!("                       Print a day's prayer timetable");
    log_indented!("simulate <start> <end> [multiplier]");
    log_indented!("                       Run with simulated time, e.g.");
    log_indented!("                       simulate \"2026-03-15 11:00:00\" \"2026-03-15 14:00:00\" 120");
    log_end!();
}
