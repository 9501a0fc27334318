//! Command-line front end for the GM adventure runtime.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gm",
    about = "A text adventure refereed by a generative game master",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the game in a directory
    Play {
        /// Game directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        backend: commands::play::BackendArgs,
    },

    /// Validate the rules and preamble and print a summary
    Check {
        /// Game directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Create a new game directory with sample rules and preamble
    Init {
        /// Name of the game to create
        name: String,
    },

    /// Print the prompt the first turn would send for a command
    Prompt {
        /// Game directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// The player command
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play { dir, backend } => commands::play::run(&dir, &backend),
        Commands::Check { dir } => commands::check::run(&dir),
        Commands::Init { name } => commands::init::run(&name),
        Commands::Prompt { dir, command } => commands::prompt::run(&dir, &command.join(" ")),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
