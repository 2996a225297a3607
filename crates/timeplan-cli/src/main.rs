use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "timeplan-cli", version, about = "Timeplan CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calendar event management
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Suggest time blocks for a new event
    Suggest(commands::suggest::SuggestArgs),
    /// Analyze the schedule for conflicts, gaps, and overloaded days
    Analyze(commands::analyze::AnalyzeArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Event { action } => commands::event::run(action),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
