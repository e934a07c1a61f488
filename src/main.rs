mod config;
mod database;
mod entities;
mod error;
mod http_server;
mod logging;
mod ports;
mod query_builder;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config,
    database::Database,
    http_server::app::HttpServerConfig,
    logging::{init_tracing, shutdown_tracing},
    services::category::CategoryService,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "GIGBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `gigboard=debug,tower_http=debug`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// Export spans to this OTLP collector
    #[arg(long, global = true, env = "OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the listing GraphQL API and the trivia REST API
    Serve {
        /// The port to run the server on (overrides the config file)
        #[arg(short, long, env = "GIGBOARD_HTTP_PORT")]
        port: Option<u16>,
    },
    /// Insert the default trivia categories
    Seed,
    /// Config file management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default config file
    CreateDefault,
    /// Print the default config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing("gigboard", args.otlp_endpoint.as_deref(), &args.log_level)?;

    let result = run(args).await;

    shutdown_tracing(tracer_provider);
    result
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config written to {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Seed => {
            let database = Database::open(&config.database_path()).await?;
            let added = CategoryService::new(Arc::new(database))
                .seed_defaults()
                .await
                .wrap_err("Failed to seed categories")?;
            println!("Added {added} categories");
        }
        Commands::Serve { port } => {
            let database = Database::open(&config.database_path()).await?;
            let port = port.unwrap_or(config.http_port);
            log::info!("Starting HTTP server on port: {}", port);
            http_server::app::start(HttpServerConfig {
                port,
                database,
                config,
            })
            .await?;
        }
    }

    Ok(())
}
