use anyhow::{Context, Result};
use cadence_core::{
    apply_habit_completion, calculate_next_due_date, format_date_for_input,
    parse_local_datetime_to_utc, parse_natural_language, ParsedTaskData, Task,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "cadence",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CADENCE_BUILD_SHA"), ")"),
    about = "Preview habit scheduling and natural-language task parsing"
)]
struct Cli {
    /// Config file (default: ~/.cadence/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured IANA timezone
    #[arg(long, global = true)]
    tz: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract date/time/priority/duration/recurrence/location from a title
    Parse {
        /// Free-form task title
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show when a habit task is next due, without logging a completion
    NextDue {
        /// Task JSON document
        #[arg(long)]
        task: PathBuf,

        /// Completion time, "YYYY-MM-DD HH:MM" local (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Log a completion and print the updated task
    Complete {
        /// Task JSON document
        #[arg(long)]
        task: PathBuf,

        /// Completion time, "YYYY-MM-DD HH:MM" local (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(p) => p.clone(),
        None => config::default_config_path()?,
    };
    let mut cfg = config::load_config(&config_path)?;
    if let Some(tz) = &cli.tz {
        cfg.calendar.timezone = tz.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let tz = cfg.timezone()?;
    debug!(config = %config_path.display(), timezone = %tz, "config loaded");

    match cli.command {
        Command::Parse { text } => {
            let now = Utc::now().with_timezone(&tz);
            print_json(&parse_words(&text, now))?;
        }

        Command::NextDue { task, at } => {
            print_json(&next_due(&task, at.as_deref(), &cfg)?)?;
        }

        Command::Complete { task, at } => {
            print_json(&complete(&task, at.as_deref(), &cfg)?)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&config_path)?,
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}\n{}", config_path.display(), s);
            }
        },
    }

    Ok(())
}

fn parse_words(words: &[String], now: DateTime<Tz>) -> ParsedTaskData {
    parse_natural_language(&words.join(" "), now)
}

fn next_due(path: &Path, at: Option<&str>, cfg: &Config) -> Result<serde_json::Value> {
    let tz = cfg.timezone()?;
    let task = read_task(path)?;
    let completion = completion_time(at, cfg)?;
    let next = calculate_next_due_date(&task, completion, tz);
    Ok(serde_json::json!({
        "id": task.id,
        "nextDueDate": next,
        "nextDueInput": next.map(|d| format_date_for_input(d, tz)),
    }))
}

fn complete(path: &Path, at: Option<&str>, cfg: &Config) -> Result<Task> {
    let tz = cfg.timezone()?;
    let task = read_task(path)?;
    if !task.is_habit {
        warn!(task_id = %task.id, "not a habit; returning it unchanged");
    }
    let completion = completion_time(at, cfg)?;
    Ok(apply_habit_completion(&task, completion, tz))
}

fn read_task(path: &Path) -> Result<Task> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse task {}", path.display()))
}

fn completion_time(at: Option<&str>, cfg: &Config) -> Result<Option<DateTime<Utc>>> {
    at.map(|local| parse_local_datetime_to_utc(local, &cfg.calendar.timezone))
        .transpose()
        .context("--at")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
