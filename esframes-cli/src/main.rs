use anyhow::Result;
use clap::{Parser, Subcommand};
use esframes::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "esframes")]
#[command(about = "Reshape Elasticsearch multi-search responses into series, tables and frames")]
#[command(version)]
struct Cli {
    /// Configuration file path (default: ~/.esframes/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transform a saved multi-search response
    Transform {
        /// JSON file with the target list
        #[arg(short, long)]
        targets: PathBuf,

        /// JSON file with the `_msearch` response body
        #[arg(short, long)]
        response: PathBuf,

        /// Always produce data frames
        #[arg(long)]
        frames: bool,

        /// Treat the request as a logs request (implies --frames)
        #[arg(long)]
        logs: bool,

        /// Field holding the log line
        #[arg(long)]
        message_field: Option<String>,

        /// Field holding the log level
        #[arg(long)]
        level_field: Option<String>,
    },

    /// Run a multi-search against the engine and transform the response
    Query {
        /// JSON file with the target list
        #[arg(short, long)]
        targets: PathBuf,

        /// JSON file with one `{header, body}` search per target
        #[arg(short, long)]
        body: PathBuf,

        /// Request path relative to the configured base URL
        #[arg(long, default_value = "_msearch")]
        path: String,

        /// Bearer token
        #[arg(long, env = "ESFRAMES_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the command output
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Init { force } => commands::run_config_init(&config_path, *force),
            ConfigAction::Show => commands::run_config_show(&config_path),
        };
    }

    let config = Config::load_or_create(&config_path)?;
    init_logging(&config);
    tracing::debug!("Config file: {}", config_path.display());

    match cli.command {
        Commands::Transform {
            targets,
            response,
            frames,
            logs,
            message_field,
            level_field,
        } => {
            let opts = commands::TransformOptions {
                frames,
                logs,
                message_field: message_field.or_else(|| config.logs.message_field.clone()),
                level_field: level_field.or_else(|| config.logs.level_field.clone()),
            };
            commands::run_transform(&config, &targets, &response, &opts)?;
        }
        Commands::Query {
            targets,
            body,
            path,
            token,
        } => {
            commands::run_query(&config, &targets, &body, &path, token).await?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}
