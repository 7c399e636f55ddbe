mod config;
mod error;
mod logging;
mod operation;
mod ports;
mod services;
mod spotify_rs;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::WrapErr};

use crate::{
    config::Config,
    logging::setup_logging,
    operation::Operation,
    ports::spotify::PlaylistRef,
    services::{
        reconcile::ReconcileService,
        set_operation::PlaylistOperand,
        spotify::client::{SpotifyApiSettings, SpotifyHttpAdapter},
    },
    spotify_rs::{authorize_url, resolve_access_token},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_SET_OPS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_SET_OPS_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill the output playlist with the result of a set operation on two playlists
    ///
    /// The operation is three binary digits, one per region of the Venn diagram
    /// of playlists A and B: only in A, in both, only in B. So 010 keeps the
    /// tracks in both, 100 the tracks only in A, 111 everything. The names
    /// intersection (010), symmetric_difference (101) and union (111) work too.
    Run {
        /// Set operation: 000-111, intersection, symmetric_difference or union
        operation: Operation,

        /// Spotify user owning the playlists
        username: String,

        /// Spotify id of input playlist A
        input_a: String,

        /// Spotify id of input playlist B
        input_b: String,

        /// Spotify id of the playlist to overwrite with the result
        output: String,

        /// OAuth access token with playlist-modify scopes
        #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,

        /// Work out the changes and log them without touching the output playlist
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the URL to visit to get an access token
    AuthorizeUrl,
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Loading configuration");
    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load playlist-set-ops config")?;

    match args.command {
        Commands::Run {
            operation,
            username,
            input_a,
            input_b,
            output,
            access_token,
            dry_run,
        } => {
            // `access_token` is the variable name the browser flow tells users to set.
            let access_token = resolve_access_token(
                [access_token, std::env::var("access_token").ok()],
                config.client_id(),
                config.redirect_uri(),
            )?;

            let adapter = SpotifyHttpAdapter::new(SpotifyApiSettings {
                base_url: config.api_base_url()?,
                access_token,
                timeout: config.request_timeout(),
                batch_limit: config.batch_size(),
            })?;
            let service = ReconcileService::new(adapter).dry_run(dry_run);

            let a = PlaylistOperand::from(PlaylistRef::new(&username, input_a));
            let b = PlaylistOperand::from(PlaylistRef::new(&username, input_b));
            let output = PlaylistRef::new(username, output);

            let summary = service.reconcile(operation, &a, &b, &output).await?;

            if summary.dry_run {
                println!(
                    "Dry run: {output} would hold {} tracks",
                    summary.desired
                );
            } else {
                println!(
                    "Success: {output} now holds {} tracks ({} added, {} removed)",
                    summary.desired, summary.added, summary.removed
                );
            }
        }
        Commands::AuthorizeUrl => {
            println!("{}", authorize_url(config.client_id(), config.redirect_uri()));
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config is at {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}
