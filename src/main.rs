//! AgroBot CLI - robotic milking system dashboard

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use agrobot::analytics::{self, Report};
use agrobot::error::{FarmError, FixSuggestion};
use agrobot::settings::{export_file_name, SettingsStore, DEFAULT_SETTINGS_FILE};
use agrobot::{seed, tui};

#[derive(Parser)]
#[command(name = "agrobot")]
#[command(about = "AgroBot - robotic milking system control dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive dashboard
    Run {
        /// Path to the settings file
        #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
        settings: PathBuf,

        /// Fixed seed for a reproducible simulation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write a milking report as JSON
    Report {
        /// Output path (defaults to a dated file name)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Report period
        #[arg(long, default_value = "week")]
        period: String,

        /// Requested report format
        #[arg(long, default_value = "pdf")]
        format: String,
    },

    /// Manage the settings file
    Settings {
        /// Path to the settings file
        #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
        file: PathBuf,

        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Export settings to a JSON file
    Export {
        /// Output path (defaults to a dated file name)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import and validate settings from a JSON file
    Import {
        /// File to import
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { settings, seed } => run_dashboard(settings, seed).await,
        Commands::Report {
            out,
            period,
            format,
        } => write_report(out, &period, &format).await,
        Commands::Settings { file, command } => settings_command(file, command),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        let suggestion = e
            .downcast_ref::<FarmError>()
            .and_then(FixSuggestion::fix_suggestion);
        if let Some(suggestion) = suggestion {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn run_dashboard(settings: PathBuf, seed: Option<u64>) -> anyhow::Result<()> {
    tracing::debug!(settings = %settings.display(), "starting dashboard");
    tui::run(SettingsStore::new(settings), seed).await
}

async fn write_report(out: Option<PathBuf>, period: &str, format: &str) -> anyhow::Result<()> {
    let robots = seed::robots();
    let cows = seed::cows();
    let report = Report::build(&robots, &cows, period, format);

    let path = out.unwrap_or_else(|| PathBuf::from(analytics::report_file_name()));
    let json = serde_json::to_string_pretty(&report).map_err(FarmError::from)?;
    tokio::fs::write(&path, json).await?;

    println!(
        "{} Report written to {}",
        "→".cyan(),
        path.display().to_string().cyan().bold()
    );
    Ok(())
}

fn settings_command(file: PathBuf, command: SettingsCommands) -> anyhow::Result<()> {
    let store = SettingsStore::new(&file);
    match command {
        SettingsCommands::Export { out } => {
            let settings = store.load()?;
            let path = out.unwrap_or_else(|| PathBuf::from(export_file_name()));
            store.export(&settings, &path)?;
            println!(
                "{} Settings exported to {}",
                "→".cyan(),
                path.display().to_string().cyan().bold()
            );
        }
        SettingsCommands::Import { file: from } => {
            let settings = store.import(&from)?;
            store.save(&settings)?;
            println!(
                "{} Settings imported from {} into {}",
                "→".cyan(),
                from.display().to_string().cyan().bold(),
                file.display()
            );
        }
    }
    Ok(())
}
