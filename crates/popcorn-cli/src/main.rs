use clap::{ArgAction, Parser, Subcommand};
use commands::{config, interactive, rate, search, show, watched, Session};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod render;
mod spinner;
mod title;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "popcorn - Search movies, rate the ones you've seen, keep a watched list")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to the config file (defaults to ~/.config/popcorn/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write logs to a daily-rotated file at this path
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    #[command(long_about = "Search the OMDb catalog by title. Queries shorter than the configured minimum (3 characters by default) are not sent.")]
    Search {
        /// Title to search for; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the details of one movie
    Show {
        /// IMDb id, e.g. tt1375666
        id: String,
    },
    /// Rate a movie and add it to the watched list
    #[command(long_about = "Open a movie, apply each rating in order and add it to the watched list with the last one. Every change of value counts as a rating revision, so `rate tt1375666 5 7 9` stores 9 with three revisions.")]
    Rate {
        /// IMDb id, e.g. tt1375666
        id: String,

        /// Ratings from 1 to 10, applied in order
        #[arg(required = true, num_args = 1..)]
        ratings: Vec<u8>,
    },
    /// Inspect or edit the watched list
    Watched {
        #[command(subcommand)]
        cmd: Option<WatchedCommands>,
    },
    /// Interactive session: type to search, open, rate and add movies
    Interactive,
    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum WatchedCommands {
    /// List watched movies with their summary
    List,
    /// Remove a movie from the watched list
    Remove {
        /// IMDb id of the watched movie
        id: String,
    },
    /// Count and averages over the watched list
    Summary,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Set the OMDb API key
    ApiKey {
        /// API key (if not provided, will prompt)
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging_with_file(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let session = Session::new(cli.config);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Search { query } => search::run_search(&session, query.join(" "), &output).await,
        Commands::Show { id } => show::run_show(&session, &id, &output).await,
        Commands::Rate { id, ratings } => rate::run_rate(&session, &id, &ratings, &output).await,
        Commands::Watched { cmd } => {
            let cmd = cmd.unwrap_or(WatchedCommands::List);
            watched::run_watched(&session, cmd, &output).await
        }
        Commands::Interactive => interactive::run_interactive(&session, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(&session, cmd, &output).await
        }
    }
}
