//! myxb CLI: GPA calculator for the Xiaobao school portal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod ui;

use commands::gpa::GpaArgs;

#[derive(Parser)]
#[command(
    name = "myxb",
    version,
    about = "GPA calculator and score viewer for Xiaobao",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(flatten)]
    gpa: GpaArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the GPA for a semester (default)
    Gpa(GpaArgs),

    /// List available semesters
    Semesters {
        /// Settings file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Log in and save credentials
    Login {
        /// Settings file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Remove saved credentials
    Logout,

    /// Calculate a GPA from a saved semester snapshot, offline
    Calc {
        /// Snapshot JSON file
        #[arg(long)]
        input: PathBuf,

        /// Show individual learning tasks
        #[arg(short, long)]
        tasks: bool,

        /// Grading configuration file (TOML, or JSON by extension)
        #[arg(long)]
        grading: Option<PathBuf>,

        /// Export the report (.md for markdown, otherwise JSON)
        #[arg(long)]
        export: Option<PathBuf>,

        /// Settings file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write the default grading configuration to ./grading.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Gpa(cli.gpa)) {
        Commands::Gpa(args) => commands::gpa::execute(args).await,
        Commands::Semesters { config } => commands::semesters::execute(config).await,
        Commands::Login { config } => commands::login::execute(config).await,
        Commands::Logout => commands::logout::execute(),
        Commands::Calc {
            input,
            tasks,
            grading,
            export,
            config,
        } => commands::calc::execute(input, tasks, grading, export, config),
        Commands::Init { force } => commands::init::execute(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
