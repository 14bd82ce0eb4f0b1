use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod format;

#[derive(Parser)]
#[command(name = "gifttracker", version, about = "Gift Tracker CLI")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record and browse gifts received
    Gift {
        #[command(subcommand)]
        action: commands::gift::GiftAction,
    },
    /// Gift suggestions and feedback
    Suggest {
        #[command(subcommand)]
        action: commands::suggest::SuggestAction,
    },
    /// Gift statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "gifttracker=debug,gifttracker_core=debug"
    } else {
        "gifttracker=warn,gifttracker_core=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    // stdout carries JSON output only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Gift { action } => commands::gift::run(action),
        Commands::Suggest { action } => commands::suggest::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
