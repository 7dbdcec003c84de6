use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod notify;

#[derive(Parser)]
#[command(name = "focusbuddy-cli", version, about = "Focus Buddy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive timer session with the companion pet
    Session(commands::session::SessionArgs),
    /// Points for finishing a task
    Score(commands::score::ScoreArgs),
    /// Companion pet tools
    Pet {
        #[command(subcommand)]
        action: commands::pet::PetAction,
    },
    /// Generate mood sprites and a backdrop from a photo
    Sprites(commands::sprites::SpritesArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "focusbuddy_core=info,focusbuddy_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session(args) => commands::session::run(args),
        Commands::Score(args) => commands::score::run(args),
        Commands::Pet { action } => commands::pet::run(action),
        Commands::Sprites(args) => commands::sprites::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
