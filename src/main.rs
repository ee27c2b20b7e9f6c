use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use race_standings::overrides::{EntryKey, ManualPositions, OverrideTables, PenaltyTable};
use race_standings::rules::RuleSet;
use race_standings::season::{self, CalculationSource, Season};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    /// Triggered recomputation
    Scheduled,
    /// Local or fallback calculation
    OnDemand,
}

impl From<Source> for CalculationSource {
    fn from(source: Source) -> Self {
        match source {
            Source::Scheduled => CalculationSource::Scheduled,
            Source::OnDemand => CalculationSource::OnDemand,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recompute the season and emit the enriched snapshot as JSON
    Compute {
        /// Season document (JSON)
        season: PathBuf,
        /// Penalty table replacing the one embedded in the season
        #[arg(long)]
        penalties: Option<PathBuf>,
        /// Manual positions replacing the ones embedded in the season
        #[arg(long)]
        manual_positions: Option<PathBuf>,
        /// Write the snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Provenance tag recorded in the snapshot
        #[arg(long, value_enum, default_value = "on-demand")]
        source: Source,
    },
    /// Print class standings
    Standings {
        /// Season document (JSON)
        season: PathBuf,
        /// Only show this class
        #[arg(long)]
        class: Option<String>,
        /// Show full driver names instead of "First L."
        #[arg(long)]
        full_names: bool,
    },
    /// Set a time penalty (0 clears it)
    Penalty {
        season: PathBuf,
        #[arg(long)]
        race: u32,
        #[arg(long)]
        driver: u32,
        #[arg(long, allow_negative_numbers = true)]
        seconds: f64,
    },
    /// Force a finishing position within the class (0 clears it)
    Position {
        season: PathBuf,
        #[arg(long)]
        race: u32,
        #[arg(long)]
        driver: u32,
        #[arg(long)]
        position: u32,
    },
    /// Append a scheduled round
    AddRound {
        season: PathBuf,
        #[arg(long)]
        track: Option<String>,
        /// Race date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Remove a round and every result recorded for it
    DeleteRound {
        season: PathBuf,
        race_id: u32,
    },
}

#[derive(Parser, Debug)]
#[command(name = "race-standings")]
#[command(about = "Multi-class championship standings with success ballast", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/race-standings/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match race_standings::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let rules = match config.rule_set() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate rules at startup
    if let Err(errors) = race_standings::rules::validate_rules(&rules) {
        eprintln!("Rules config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    debug!(rules = %rules.name, version = rules.version, classes = ?rules.classes, "rules loaded");

    if let Err(e) = run(cli.command, &rules) {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_INPUT);
    }

    std::process::exit(EXIT_SUCCESS);
}

fn run(command: Commands, rules: &RuleSet) -> Result<()> {
    match command {
        Commands::Compute {
            season: path,
            penalties,
            manual_positions,
            output,
            source,
        } => {
            let raw = season::load_season_value(&path)?;
            let penalties: Option<PenaltyTable> =
                penalties.as_deref().map(season::load_json).transpose()?;
            let manual_positions: Option<ManualPositions> =
                manual_positions.as_deref().map(season::load_json).transpose()?;

            let snapshot = race_standings::recalculate(
                raw,
                penalties,
                manual_positions,
                rules,
                source.into(),
            );
            if let Some(ref message) = snapshot.error {
                bail!("Invalid season document at {}: {}", path.display(), message);
            }

            match output {
                Some(out) => {
                    season::save_json(&out, &snapshot)?;
                    info!(path = %out.display(), "snapshot written");
                }
                None => {
                    let json = serde_json::to_string_pretty(&snapshot)
                        .context("Failed to serialize snapshot")?;
                    println!("{}", json);
                }
            }
        }
        Commands::Standings {
            season: path,
            class,
            full_names,
        } => {
            let current = season::load_season(&path)?;
            let tables = OverrideTables::embedded(&current);
            let snapshot = race_standings::calculate_championship(
                current,
                &tables,
                rules,
                CalculationSource::OnDemand,
            );

            let classes: Vec<&str> = match class {
                Some(ref c) => vec![c.as_str()],
                None => rules.classes.iter().map(String::as_str).collect(),
            };

            let use_colors = race_standings::output::should_use_colors();
            let tables: Vec<String> = classes
                .iter()
                .map(|c| {
                    let drivers = race_standings::class_standings(&snapshot, c);
                    race_standings::output::format_standings_table(
                        c, &drivers, use_colors, full_names,
                    )
                })
                .collect();
            println!("{}", tables.join("\n\n"));
        }
        Commands::Penalty {
            season: path,
            race,
            driver,
            seconds,
        } => {
            let mut current = season::load_season(&path)?;
            let key = entry_key(&current, race, driver)?;
            current
                .penalties
                .get_or_insert_with(PenaltyTable::new)
                .set(key, seconds);
            season::save_json(&path, &current)?;
            println!("Penalty for driver {} in race {}: {}s", driver, race, seconds);
        }
        Commands::Position {
            season: path,
            race,
            driver,
            position,
        } => {
            let mut current = season::load_season(&path)?;
            let key = entry_key(&current, race, driver)?;
            current
                .manual_positions
                .get_or_insert_with(ManualPositions::new)
                .set(key, position);
            season::save_json(&path, &current)?;
            if position == 0 {
                println!("Cleared manual position for driver {} in race {}", driver, race);
            } else {
                println!("Driver {} forced to P{} in race {}", driver, position, race);
            }
        }
        Commands::AddRound {
            season: path,
            track,
            date,
        } => {
            let mut current = season::load_season(&path)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let id = season::add_round(&mut current, track.as_deref(), date);
            season::save_json(&path, &current)?;
            println!("Added round {} on {}", id, date);
        }
        Commands::DeleteRound {
            season: path,
            race_id,
        } => {
            let mut current = season::load_season(&path)?;
            if !season::delete_round(&mut current, race_id) {
                bail!("No race with id {} in {}", race_id, path.display());
            }
            season::save_json(&path, &current)?;
            println!("Deleted round {}", race_id);
        }
    }

    Ok(())
}

/// Key for an existing (race, driver) pair.
fn entry_key(season: &Season, race_id: u32, driver_id: u32) -> Result<EntryKey> {
    if season.race(race_id).is_none() {
        bail!("No race with id {}", race_id);
    }
    if season.driver(driver_id).is_none() {
        bail!("No driver with id {}", driver_id);
    }
    Ok(EntryKey::new(race_id, driver_id))
}
