use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use custody_client::chain::{self, ChainClient, EventListener};
use custody_client::config::{load_config, load_from_env};
use custody_client::gateway::{Chain, Gateway, HttpGateway};
use custody_client::observability::{logging, metrics};
use custody_client::{CancelToken, Coordinator, OperationBatch};

#[derive(Parser)]
#[command(name = "custody-cli")]
#[command(about = "Submit and track custody API transactions", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the custody API base URL.
    #[arg(short, long)]
    url: Option<String>,

    /// Override the bearer token (prefer CUSTODY_BEARER_TOKEN).
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a single transaction
    Transaction { id: String },
    /// List every transaction in the project
    Transactions,
    /// List wallets
    Wallets,
    /// Read a wallet and its tokens
    Wallet { id: String },
    /// Create a new wallet
    CreateWallet,
    /// Create a project
    CreateProject {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "ethereum")]
        chain: Chain,
    },
    /// Wait for a transaction to settle
    Wait {
        id: String,
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Submit a single-operation custom transaction
    Execute {
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        contract: String,
        /// Function signature, e.g. "mint(uint256)"
        #[arg(long)]
        function: String,
        #[arg(long = "arg")]
        args: Vec<String>,
        #[arg(long, default_value_t = 0)]
        value: u64,
        /// Wait for the transaction to settle
        #[arg(long)]
        wait: bool,
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Call a view function on a contract
    Read {
        #[arg(long)]
        contract: String,
        /// e.g. "function balanceOf(address) view returns (uint256)"
        #[arg(long)]
        function: String,
        #[arg(long = "arg")]
        args: Vec<String>,
    },
    /// Stream a contract event until interrupted
    Listen {
        #[arg(long)]
        contract: String,
        /// e.g. "event Transfer(address indexed from, address indexed to, uint256 value)"
        #[arg(long)]
        event: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if let Some(url) = cli.url {
        config.api.base_url = url;
    }
    if let Some(token) = cli.token {
        config.api.bearer_token = token;
    }

    logging::init_logging(&config.observability.log_level);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let gateway = Arc::new(HttpGateway::new(&config.api)?);
    let coordinator = Coordinator::new(gateway.clone(), &config.polling);

    match cli.command {
        Commands::Transaction { id } => print_json(&gateway.get_transaction(&id).await?)?,
        Commands::Transactions => print_json(&gateway.list_transactions().await?)?,
        Commands::Wallets => print_json(&gateway.list_wallets().await?)?,
        Commands::Wallet { id } => print_json(&gateway.read_wallet(&id).await?)?,
        Commands::CreateWallet => print_json(&gateway.create_wallet().await?)?,
        Commands::CreateProject { name, chain } => {
            print_json(&gateway.create_project(&name, chain).await?)?
        }
        Commands::Wait { id, timeout_ms } => {
            let cancel = cancel_on_ctrl_c();
            let record = coordinator
                .wait_with_cancel(&id, timeout_ms.map(Duration::from_millis), &cancel)
                .await?;
            print_json(&record)?
        }
        Commands::Execute {
            wallet,
            contract,
            function,
            args,
            value,
            wait,
            timeout_ms,
        } => {
            let mut batch = OperationBatch::new();
            batch.append(function, args, value)?;

            let record = if wait {
                coordinator
                    .submit_and_await(&mut batch, &wallet, &contract, timeout_ms.map(Duration::from_millis))
                    .await?
            } else {
                coordinator.submit(&mut batch, &wallet, &contract).await?
            };
            print_json(&record)?
        }
        Commands::Read {
            contract,
            function,
            args,
        } => {
            let client = ChainClient::new(&config.chain)?;
            let result = chain::read(&client, &contract, &function, &args).await?;
            print_json(&result.to_json())?
        }
        Commands::Listen { contract, event } => {
            let client = ChainClient::new(&config.chain)?;
            let listener = EventListener::new(client, &contract, &event)?;
            let cancel = cancel_on_ctrl_c();
            let (tx, mut rx) = mpsc::channel(64);

            tokio::spawn(listener.run(tx, cancel.subscribe()));

            while let Some(event) = rx.recv().await {
                print_json(&event.to_json())?;
            }
        }
    }

    Ok(())
}

fn cancel_on_ctrl_c() -> CancelToken {
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });
    cancel
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
