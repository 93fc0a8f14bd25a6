//! weekplan command-line entry point.
//!
//! # Responsibility
//! - Parse flags and subcommands, resolve settings, start logging.
//! - Load the calendar file, dispatch one operation, save on change.
//!
//! # Invariants
//! - The data file is rewritten only after a successful mutation.
//! - Failures print one line to stderr and exit with status 1.

mod commands;
mod config;
mod menu;
mod report;

use clap::{Parser, Subcommand};
use commands::{CliResult, MeetingChanges};
use config::{AppConfig, Overrides, Settings};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use weekplan_core::{load_or_default, save_to_path, MeetingId, Priority, TimePoint};

/// Weekly meeting calendar with overlap detection.
#[derive(Parser)]
#[command(name = "weekplan", version, about)]
struct Cli {
    /// Calendar data file.
    #[arg(short = 'f', long = "file", global = true)]
    file: Option<PathBuf>,
    /// Config file with DATA_FILE, LOG_DIR and LOG_LEVEL entries.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory for rolling log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a meeting. Times use the W<week>-D<day>-<hhmm> form.
    Add {
        subject: String,
        start: TimePoint,
        end: TimePoint,
        #[arg(short, long, default_value_t = Priority::NonCritical)]
        priority: Priority,
    },
    /// Print one week, or every week with meetings.
    List {
        #[arg(short, long)]
        week: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    Show {
        id: MeetingId,
    },
    /// Change fields of an existing meeting; omitted fields are kept.
    Update {
        id: MeetingId,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        start: Option<TimePoint>,
        #[arg(long)]
        end: Option<TimePoint>,
    },
    Delete {
        id: MeetingId,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove every meeting; ids are not reused afterwards.
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
    /// Replace the calendar with meetings read from a legacy record file.
    ImportLegacy {
        path: PathBuf,
    },
    /// Interactive menu.
    Menu,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let file_config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    let settings = Settings::resolve(
        &file_config,
        Overrides {
            data_file: cli.file,
            log_dir: cli.log_dir,
            log_level: cli.log_level,
        },
    );
    if let Some(log_dir) = &settings.log_dir {
        // Core logging only takes absolute directories.
        let log_dir = match std::env::current_dir() {
            Ok(cwd) if log_dir.is_relative() => cwd.join(log_dir),
            _ => log_dir.clone(),
        };
        weekplan_core::init_logging(&settings.log_level, &log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={} file={}",
        weekplan_core::core_version(),
        settings.data_file.display()
    );

    let mut calendar = load_or_default(&settings.data_file)?;
    let data_file = settings.data_file.as_path();
    let (output, changed) = match cli.command {
        Commands::Add {
            subject,
            start,
            end,
            priority,
        } => (
            commands::add(&mut calendar, &subject, priority, start, end)?,
            true,
        ),
        Commands::List { week, json } => (commands::list(&calendar, week, json)?, false),
        Commands::Show { id } => (commands::show(&calendar, id)?, false),
        Commands::Update {
            id,
            subject,
            priority,
            start,
            end,
        } => {
            let changes = MeetingChanges {
                subject,
                priority,
                start,
                end,
            };
            (commands::update(&mut calendar, id, changes)?, true)
        }
        Commands::Delete { id, yes } => {
            let before = calendar.len();
            let message = commands::delete(&mut calendar, id, |prompt| confirm(prompt, yes))?;
            (message, calendar.len() != before)
        }
        Commands::Clear { yes } => {
            let before = calendar.len();
            let message = commands::clear(&mut calendar, |prompt| confirm(prompt, yes))?;
            (message, calendar.len() != before)
        }
        Commands::ImportLegacy { path } => (commands::import_legacy(&mut calendar, &path)?, true),
        Commands::Menu => return menu::run(&mut calendar, data_file),
    };

    if changed {
        save_to_path(data_file, &calendar)?;
    }
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn confirm(prompt: &str, assume_yes: bool) -> CliResult<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(inquire::Confirm::new(prompt).with_default(false).prompt()?)
}
