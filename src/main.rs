use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tripledger::core::log::init_logging;
use tripledger::core::trip::StatusFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for tripledger::AppCommand {
    fn from(cmd: Commands) -> tripledger::AppCommand {
        match cmd {
            Commands::Rates { refresh } => tripledger::AppCommand::Rates { refresh },
            Commands::Convert { amount, from, to } => {
                tripledger::AppCommand::Convert { amount, from, to }
            }
            Commands::Trips { status } => tripledger::AppCommand::Trips { status },
            Commands::Budget { trip, from } => tripledger::AppCommand::Budget { trip, from },
            Commands::Itinerary { trip } => tripledger::AppCommand::Itinerary { trip },
            Commands::Setup | Commands::Currencies => {
                unreachable!("Offline commands should be handled separately")
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Show exchange rates against USD
    Rates {
        /// Ignore cached rates and fetch again
        #[arg(long)]
        refresh: bool,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    /// List trips with their budget totals
    Trips {
        /// all, upcoming, ongoing or past
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
    },
    /// Show the budget breakdown of a trip
    Budget {
        /// Trip title or position
        trip: String,
        /// Currency the budget figures were entered in
        #[arg(long)]
        from: Option<String>,
    },
    /// Show the stops and activities of a trip
    Itinerary {
        /// Trip title or position
        trip: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => tripledger::cli::setup::setup(),
        Some(Commands::Currencies) => {
            tripledger::cli::currencies::run();
            Ok(())
        }
        Some(cmd) => tripledger::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
