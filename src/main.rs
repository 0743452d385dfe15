//! CLI dispatch for the adzanr binary.
//!
//! Parses arguments, routes to the matching command handler, and turns any
//! returned error into logged output with a non-zero exit status.

use anyhow::Result;

use adzanr::args::{self, CliAction, ParsedArgs};
use adzanr::{Adzanr, commands, log_end, log_error, log_pipe};

fn main() {
    let parsed = ParsedArgs::from_env();

    let result: Result<()> = match parsed.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(1);
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => Adzanr::new(debug_enabled).with_config_dir(config_dir).run(),
        CliAction::Timetable {
            date,
            json,
            config_dir,
        } => commands::timetable::handle_timetable_command(date, json, config_dir),
        CliAction::Simulate {
            debug_enabled,
            start_time,
            end_time,
            multiplier,
            config_dir,
        } => commands::simulate::handle_simulate_command(
            start_time,
            end_time,
            multiplier,
            debug_enabled,
            config_dir,
        ),
    };

    if let Err(e) = result {
        log_pipe!();
        log_error!("{e:#}");
        log_end!();
        std::process::exit(1);
    }
}
