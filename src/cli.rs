use std::{io, path::PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    app,
    config::{self, Config, ConfigError},
    constants::{FILE_PATHS, LOG_FORMAT},
    domain::{self, categories_from_names},
    logging,
    session::Session,
    shutdown::ShutdownFlag,
    storage::{self, LogRow, LogStore, StorageError},
};

#[derive(Parser, Debug)]
#[command(name = "worklog")]
#[command(about = "Toggle activity categories and keep a daily minutes log", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to the key=value config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory holding the daily CSV logs")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Print the most recent log for a day")]
    Report {
        #[arg(long, value_parser = parse_date_key, help = "Day as YYYYMMDD (default: today)")]
        date: Option<NaiveDate>,
    },

    #[command(about = "Export the most recent log for a day")]
    Export {
        #[arg(long, value_enum, help = "Export format")]
        format: ExportFormat,

        #[arg(long, value_parser = parse_date_key, help = "Day as YYYYMMDD (default: today)")]
        date: Option<NaiveDate>,

        #[arg(long, short, help = "Output path")]
        out: Option<PathBuf>,
    },

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ExportFormat {
    Json,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no log found for {0}")]
    NoLog(String),

    #[error("unsupported shell: {0}. Use bash, zsh, or fish.")]
    UnsupportedShell(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowExport {
    pub category: String,
    pub minutes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogExport {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub source: String,
    pub date: String,
    pub total_minutes: u64,
    pub rows: Vec<RowExport>,
}

fn parse_date_key(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, LOG_FORMAT.date_key)
        .map_err(|e| format!("expected YYYYMMDD: {}", e))
}

fn log_store(log_dir: Option<PathBuf>) -> LogStore {
    LogStore::new(log_dir.unwrap_or_else(|| PathBuf::from(FILE_PATHS.work_logs)))
}

pub fn run_tracker(config_path: Option<PathBuf>, log_dir: Option<PathBuf>) -> Result<(), CliError> {
    let config_path = config_path.unwrap_or_else(config::default_config_path);
    let config = Config::load(&config_path)?;
    info!(
        path = %config_path.display(),
        categories = %config.categories.iter().join(", "),
        display_minutes = config.display_minutes,
        autosave_on_exit = config.autosave_on_exit,
        "loaded config"
    );

    let session = Session::new(
        categories_from_names(config.categories.clone()),
        log_store(log_dir),
        Local::now(),
    );
    let shutdown = ShutdownFlag::register()?;

    app::run_ui(&config, session, shutdown)?;
    Ok(())
}

fn latest_rows(store: &LogStore, date: NaiveDate) -> Result<(PathBuf, Vec<LogRow>), CliError> {
    let path = store
        .find_resume_candidate(date)
        .ok_or_else(|| CliError::NoLog(date.format("%Y-%m-%d").to_string()))?;
    let rows = storage::load_log_rows(&path)?;
    Ok((path, rows))
}

pub fn report(store: &LogStore, date: NaiveDate) -> Result<(), CliError> {
    let (path, rows) = latest_rows(store, date)?;
    let total = domain::total_minutes(rows.iter().map(|row| row.minutes));
    let width = rows
        .iter()
        .map(|row| row.category.chars().count())
        .max()
        .unwrap_or(0)
        .max(20);

    println!("Report for {} ({})", date.format("%Y-%m-%d"), path.display());
    println!("{}", "-".repeat(width + 12));
    for row in &rows {
        println!("{:width$} {:>7} min", row.category, row.minutes, width = width);
    }
    println!("{}", "-".repeat(width + 12));
    println!("{:width$} {:>7} min", "TOTAL", total, width = width);

    Ok(())
}

pub fn build_export(path: &std::path::Path, date: NaiveDate, rows: Vec<LogRow>) -> LogExport {
    LogExport {
        schema_version: 1,
        exported_at: Utc::now(),
        source: path.display().to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        total_minutes: domain::total_minutes(rows.iter().map(|row| row.minutes)),
        rows: rows
            .into_iter()
            .map(|row| RowExport {
                category: row.category,
                minutes: row.minutes,
            })
            .collect(),
    }
}

pub fn export_data(
    store: &LogStore,
    format: ExportFormat,
    date: NaiveDate,
    out_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let (path, rows) = latest_rows(store, date)?;
    let export = build_export(&path, date, rows);

    match format {
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(&export)?;
            if let Some(path) = out_path {
                storage::write_text_file(&path, &json)?;
                println!("Exported to {}", path.display());
            } else {
                println!("{}", json);
            }
        }
    }

    Ok(())
}

pub fn print_completions(shell: &str) -> Result<(), CliError> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => return Err(CliError::UnsupportedShell(shell.to_string())),
    };
    clap_complete::generate(shell, &mut Cli::command(), "worklog", &mut io::stdout());
    Ok(())
}

pub fn run_cli() {
    let cli = Cli::parse();

    if let Err(e) = logging::enable_logging(&storage::get_state_dir()) {
        eprintln!("Warning: could not set up logging: {}", e);
    }

    let today = Local::now().date_naive();
    let result = match cli.command {
        None => run_tracker(cli.config, cli.log_dir),
        Some(Command::Report { date }) => report(&log_store(cli.log_dir), date.unwrap_or(today)),
        Some(Command::Export { format, date, out }) => export_data(
            &log_store(cli.log_dir),
            format,
            date.unwrap_or(today),
            out,
        ),
        Some(Command::Completions { shell }) => print_completions(&shell),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
