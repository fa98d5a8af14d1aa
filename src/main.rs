//! GuardianSwitch entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use guardian_switch::config::Config;
use guardian_switch::server::{self, AppState};

#[derive(Parser)]
#[command(
    name = "guardian-switch",
    version,
    about = "Personal dead-man's-switch welfare monitor"
)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitor server (JSON API + dashboard)
    Serve {
        /// Bind address override
        #[arg(long)]
        host: Option<String>,
        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },
    /// Trigger a welfare check in-process and print the generated report
    Check,
    /// Send a test heartbeat to a running server, like the phone
    /// automation would
    Beat {
        /// Server base URL (defaults to cloud_url from the config)
        #[arg(long)]
        url: Option<String>,
        /// Source label recorded with the heartbeat
        #[arg(long, default_value = "cli")]
        source: String,
        /// Battery percentage to attach as metadata
        #[arg(long)]
        battery: Option<u8>,
    },
    /// Write a default config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("guardian_switch=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });

    match command {
        Commands::Serve { host, port } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(config).await
        }

        Commands::Check => {
            let config = Config::load(cli.config.as_deref())?;
            let state = AppState::from_config(config)?;
            let _permit = state.gate.begin().await;
            let outcome = state.checker.run(None, &state.alerts).await?;
            println!("{}", outcome.report);
            for delivery in &outcome.deliveries {
                println!("  -> {} [{:?}]", delivery.recipient, delivery.status);
            }
            Ok(())
        }

        Commands::Beat {
            url,
            source,
            battery,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            let base = url
                .or_else(|| {
                    (!config.cloud_url.is_empty()).then(|| config.cloud_url.clone())
                })
                .unwrap_or_else(|| {
                    format!("http://127.0.0.1:{}", config.server.port)
                });
            let endpoint = format!("{}/api/heartbeat", base.trim_end_matches('/'));

            let mut body = serde_json::json!({ "source": source });
            if let Some(battery) = battery {
                body["metadata"] = serde_json::json!({ "battery": battery });
            }

            info!(%endpoint, "sending test heartbeat");
            let response = reqwest::Client::new()
                .post(&endpoint)
                .json(&body)
                .send()
                .await
                .with_context(|| format!("heartbeat request to {endpoint} failed"))?;
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            println!("{status}: {text}");
            Ok(())
        }

        Commands::Init { force } => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let written = Config::write_default(&path, force)?;
            println!("wrote {}", written.display());
            Ok(())
        }
    }
}
