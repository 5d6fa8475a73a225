use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use infrastructure::catalog_loader::load_catalog;
use infrastructure::config::Config;
use infrastructure::thread_random::ThreadRandom;
use shared::types::Result;
use tokio::net::TcpListener;

use crate::api::{router, AppState};
use crate::client::ApiClient;
use crate::wizard::WizardApp;

#[derive(Parser, Debug)]
#[command(name = "skin_concierge")]
#[command(about = "Skincare advice wizard backed by Gemini, with canned fallbacks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API (/api/advice, /api/chat, /api/concerns)
    Serve {
        /// Address to listen on (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Walk through the advice wizard in the terminal
    Wizard {
        /// Base URL of a running API (overrides CONCIERGE_API_URL)
        #[arg(long)]
        api_url: Option<String>,
    },
}

pub struct CliApp {
    config: Config,
}

impl CliApp {
    pub fn new() -> Self {
        Self {
            config: Config::load(),
        }
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        match cli.command {
            Command::Serve { bind } => {
                if let Some(bind) = bind {
                    self.config.bind_addr = bind;
                }
                self.serve().await
            }
            Command::Wizard { api_url } => {
                if let Some(url) = api_url {
                    self.config.api_url = url;
                }
                WizardApp::new(ApiClient::new(self.config.api_url.as_str()))
                    .run()
                    .await
            }
        }
    }

    async fn serve(&self) -> Result<()> {
        tracing::debug!(config = ?self.config, "loaded configuration");
        let catalog = load_catalog(self.config.catalog_path.as_deref())?;
        let state = AppState::new(&self.config, catalog, Arc::new(ThreadRandom));

        if self.config.has_api_key() {
            tracing::info!(model = %self.config.gemini_model, "advice and chat forwarded to Gemini");
        } else {
            tracing::warn!("GEMINI_API_KEY not set; serving canned advice and chat replies");
        }

        let listener = TcpListener::bind(self.config.bind_addr.as_str())
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind_addr))?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "listening");
        println!("{} http://{}", "美肌コンシェルジュ API".magenta().bold(), addr);

        axum::serve(listener, router(Arc::new(state)))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
