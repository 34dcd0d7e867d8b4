//! Clientele CLI - client list reconciliation and the client list endpoint

use anyhow::Context;
use clap::Parser;
use clientele_api::AppState;
use clientele_core::{
    load_declared_clients, ClienteleConfig, ReconcileError, ReconcileReport, Reconciler,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clientele")]
#[command(about = "Clientele - OAuth client registry tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compare a declarative client list against the registry
    Check {
        /// Client list file (.json or .yaml)
        path: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },
    /// Serve the client list endpoint
    Serve {
        #[command(flatten)]
        store: StoreArgs,

        /// Address to bind, overrides the configuration file
        #[arg(long, env = "CLIENTELE_BIND")]
        bind: Option<String>,
    },
}

#[derive(clap::Args)]
struct StoreArgs {
    /// Configuration file path
    #[arg(short, long, env = "CLIENTELE_CONFIG")]
    config: Option<PathBuf>,

    /// Registry database path, overrides the configuration file
    #[arg(long, env = "CLIENTELE_DB_PATH")]
    db_path: Option<PathBuf>,
}

impl StoreArgs {
    fn load(&self) -> anyhow::Result<ClienteleConfig> {
        let mut config = match &self.config {
            Some(path) => ClienteleConfig::from_file(path)
                .map_err(ReconcileError::from)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ClienteleConfig::default(),
        };
        if let Some(db_path) = &self.db_path {
            config.store.db_path = db_path.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check { path, store } => check(&path, &store).await.map(|report| {
            if let Some(report) = report {
                println!("{}", report);
            }
        }),
        Commands::Serve { store, bind } => serve(&store, bind).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Runs reconciliation. `None` means there was nothing to check.
async fn check(path: &Path, args: &StoreArgs) -> anyhow::Result<Option<ReconcileReport>> {
    let config = args.load()?;

    let clients = match load_declared_clients(path, &config.source)? {
        Some(clients) if !clients.is_empty() => clients,
        _ => {
            info!("No clients declared in {}", path.display());
            return Ok(None);
        }
    };

    let store = config
        .store
        .open()
        .map_err(ReconcileError::from)
        .with_context(|| format!("opening registry {}", config.store.db_path.display()))?;

    let reconciler = Reconciler::new(config.reconcile.clone(), Arc::new(store));
    match reconciler.run(&clients).await {
        Ok(report) => Ok(Some(report)),
        Err(ReconcileError::PolicyViolation {
            client_id,
            hashed_secret,
        }) => {
            eprintln!(
                "Do not keep client secrets in the config file. Use the `hashedSecret` field instead.\n\n\
                 \tclient={} has `secret` field\n\
                 \tuse hashedSecret=\"{}\" instead",
                client_id, hashed_secret
            );
            anyhow::bail!("client {} carries a plaintext secret", client_id)
        }
        Err(err) => Err(err.into()),
    }
}

async fn serve(args: &StoreArgs, bind: Option<String>) -> anyhow::Result<()> {
    let mut config = args.load()?;
    if let Some(bind) = bind {
        config.api.bind_addr = bind;
    }

    let store = config
        .store
        .open()
        .with_context(|| format!("opening registry {}", config.store.db_path.display()))?;

    let state = AppState::new(Arc::new(store), config.api.clone());
    clientele_api::serve(state, &config.api.bind_addr)
        .await
        .with_context(|| format!("serving on {}", config.api.bind_addr))
}
