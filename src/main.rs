//! Ticketsmith - LLM-assisted JIRA ticket creation

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketsmith::{
    api::{build_router, AppState},
    config::{load_config, Config},
};

#[derive(Parser)]
#[command(name = "ticketsmith")]
#[command(author = "Ticketsmith Team")]
#[command(version)]
#[command(about = "Turns free-text feature requests into JIRA tickets using a locally hosted LLM")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Host to bind to
    #[arg(short = 'H', long, env = "TICKETSMITH_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TICKETSMITH_PORT")]
    port: Option<u16>,

    /// Config file (defaults to <config dir>/ticketsmith/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ollama server URL
    #[arg(long, env = "OLLAMA_REMOTE_HOST")]
    ollama_host: Option<String>,

    /// Value sent as the JIRA Authorization header
    #[arg(long, env = "JIRA_TOKEN", hide_env_values = true)]
    jira_token: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Ticketsmith server
    Serve,
    /// Show the resolved configuration
    Config,
}

impl Cli {
    /// Apply CLI/environment overrides on top of the file configuration
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ollama_host) = &self.ollama_host {
            config.ollama.host = ollama_host.clone();
        }
        if let Some(token) = &self.jira_token {
            config.jira.token = Some(token.clone());
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ticketsmith=info,tower_http=debug".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file never overrides variables already set in the environment
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let mut config = load_config(cli.config.as_deref())?;
    cli.apply(&mut config);

    if let Some(Commands::Config) = cli.command {
        println!("Ticketsmith Configuration");
        println!("=========================");
        print!("{}", toml::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    config.validate()?;
    run_server(config).await
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    print_banner(&config);

    let app = build_router(AppState::new(config));

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner(config: &Config) {
    println!();
    println!("  TICKETSMITH v{}", env!("CARGO_PKG_VERSION"));
    println!("  -------------------------------------------");
    println!("  Web UI:  http://{}:{}", config.server.host, config.server.port);
    println!("  Ollama:  {} ({})", config.ollama.host, config.ollama.model);
    println!("  JIRA:    {}", config.jira.base_url);
    println!();
}
