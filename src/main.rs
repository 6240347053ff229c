use clap::{Parser, Subcommand};
use wakmeter_core::{EngineConfig, EngineConfigExt};

mod commands;
mod logging;
mod printer;

#[derive(Parser)]
#[command(version, about = "Wakfu combat log interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a whole log file and print its events
    Replay {
        #[arg(short, long)]
        path: String,
    },
    /// Follow a growing log file and print events as they happen
    Tail {
        #[arg(short, long)]
        path: Option<String>,
        /// Interpret the existing content before following
        #[arg(long)]
        from_start: bool,
    },
    /// Show where the configuration lives and its values
    Config,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();

    let cli = Cli::parse();
    let config = EngineConfig::load();

    match cli.command {
        Commands::Replay { path } => commands::replay(&path, &config),
        Commands::Tail { path, from_start } => commands::tail(path, from_start, &config).await,
        Commands::Config => commands::show_config(&config),
    }
}
