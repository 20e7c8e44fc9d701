//! SetLog - command line access to an on-device workout store.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use setlog::storage::config::{get_data_dir, load_config_from};
use setlog::workouts::{group_by_month, now_millis, Workout};
use setlog::{FileMedium, WorkoutStore};

#[derive(Parser)]
#[command(name = "setlog")]
#[command(about = "Inspect and maintain a local workout store", long_about = None)]
struct Cli {
    /// Directory holding the store (defaults to the platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole stored record as JSON
    Show,
    /// List completed workouts, newest first
    History {
        /// Group workouts by the month they started in
        #[arg(long)]
        by_month: bool,
    },
    /// List saved templates
    Templates,
    /// Delete a saved template
    DeleteTemplate { id: String },
    /// Look up the last performance of an exercise set
    Previous { exercise: String, set_number: u32 },
    /// Force-complete an active workout left open too long
    Expire,
    /// Show the rest timer
    Timer,
    /// Erase all stored workout data
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(get_data_dir);
    let config_path = cli
        .config
        .unwrap_or_else(|| data_dir.join("config.toml"));
    let config = load_config_from(&config_path, data_dir.clone())
        .with_context(|| format!("loading {}", config_path.display()))?;

    tracing::debug!("Using store at {}", data_dir.display());
    let mut store = WorkoutStore::with_config(FileMedium::new(&data_dir), config);

    match cli.command {
        Commands::Show => {
            let state = store.try_load().context("reading workout storage")?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::History { by_month } => {
            let history = store.get_history();
            if by_month {
                for group in group_by_month(&history) {
                    println!("{} ({} workouts)", group.month, group.workouts.len());
                    for workout in group.workouts {
                        println!("  {}", describe(workout));
                    }
                }
            } else {
                for workout in &history {
                    println!("{}", describe(workout));
                }
            }
        }
        Commands::Templates => {
            for template in store.get_templates() {
                let exercises: Vec<String> = template
                    .exercises
                    .iter()
                    .map(|e| format!("{} x{}", e.name, e.default_sets))
                    .collect();
                println!("{}  {}  [{}]", template.id, template.name, exercises.join(", "));
            }
        }
        Commands::DeleteTemplate { id } => {
            if store.delete_template(&id)? {
                println!("Deleted template {}", id);
            } else {
                println!("No template with id {}", id);
            }
        }
        Commands::Previous {
            exercise,
            set_number,
        } => match store.find_previous_performance(&exercise, set_number) {
            Some(previous) => println!("{} x {}", previous.reps, previous.weight),
            None => println!("No previous performance for {} set {}", exercise, set_number),
        },
        Commands::Expire => match store.expire_stale_active_workout(now_millis())? {
            Some(workout) => println!("Expired {}", describe(&workout)),
            None => println!("Nothing to expire"),
        },
        Commands::Timer => {
            let timer = store.get_rest_timer();
            if timer.active {
                println!(
                    "{}s remaining of {}s",
                    timer.remaining_seconds(now_millis()),
                    timer.duration
                );
            } else {
                println!("Rest timer idle ({}s)", timer.duration);
            }
        }
        Commands::Clear => {
            store.clear()?;
            println!("Cleared");
        }
    }

    Ok(())
}

fn describe(workout: &Workout) -> String {
    let started = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(workout.start_time)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| workout.start_time.to_string());
    let minutes = workout.duration_ms().map(|ms| ms / 60_000).unwrap_or(0);

    format!(
        "{}  {}  {} min  {} sets  {:.1} volume",
        workout.id,
        started,
        minutes,
        workout.completed_set_count(),
        workout.total_volume()
    )
}
