use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use myovae_cycle::{commands, dates, logging, storage, CycleHistory, Settings};

#[derive(Parser)]
#[command(name = "myovae-cycle", about = "Cycle phase and period predictions")]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, env = "MYOVAE_CYCLE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Query {
    /// Cycle history document (JSON)
    #[arg(long)]
    history: PathBuf,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Current cycle day and phase
    Phase(Query),
    /// Next period, ovulation and fertile window
    Predict(Query),
    /// Cycle length statistics
    Stats {
        #[arg(long)]
        history: PathBuf,
    },
    /// One-line cycle summary for prompt context
    Context(Query),
    /// Log a new period start and print the updated history
    Start {
        #[arg(long)]
        history: PathBuf,
        /// First day of bleeding (YYYY-MM-DD)
        date: String,
        #[arg(long)]
        notes: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    logging::init(if cli.verbose { "debug" } else { &settings.log_level });

    match cli.command {
        Commands::Phase(query) => {
            let (history, reference) = query.resolve()?;
            print_json(&commands::phase_report(&history, reference, &settings))
        }
        Commands::Predict(query) => {
            let (history, reference) = query.resolve()?;
            print_json(&commands::predictions(&history, reference, &settings))
        }
        Commands::Stats { history } => print_json(&commands::stats(&load(&history)?)),
        Commands::Context(query) => {
            let (history, reference) = query.resolve()?;
            println!("{}", commands::health_context(&history, reference, &settings));
            Ok(())
        }
        Commands::Start {
            history,
            date,
            notes,
        } => {
            let mut cycles = load(&history)?;
            commands::start_cycle(&mut cycles, &date, notes)?;
            println!("{}", storage::history_to_json(&cycles)?);
            Ok(())
        }
    }
}

impl Query {
    fn resolve(&self) -> Result<(CycleHistory, NaiveDate)> {
        let history = load(&self.history)?;
        let reference = match self.date.as_deref() {
            Some(date) => dates::parse_date("date", date)?,
            None => chrono::Local::now().date_naive(),
        };
        Ok((history, reference))
    }
}

fn load(path: &Path) -> Result<CycleHistory> {
    storage::load_history(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
