//! # Fleet-Bridge Runtime
//!
//! The entry point for the bridge process. It owns the component graph:
//!
//! ```text
//! HttpLedger ──→ FleetContract ──┬──→ AppState ──→ axum server
//!       │                        │
//!       └──→ TransactionRelay ───┘
//!                                └──→ Dispatcher (one per machine id)
//! ```
//!
//! Everything is wired explicitly here; no component reaches for globals.
//! The admin signing key never enters this graph: the API holds an
//! [`EnvCredentialSource`] that re-reads the key per request, and each
//! credential dies with the submission it signed.
//!
//! ## Startup sequence
//!
//! 1. Load configuration from environment
//! 2. Initialize tracing
//! 3. Probe the node (fail fast on a bad RPC URL)
//! 4. Spawn the dispatcher for the configured machine id
//! 5. Serve the HTTP API until ctrl-c
//! 6. Signal shutdown; the dispatcher stops between polls

use anyhow::{Context, Result};
use fleet_api::AppState;
use fleet_dispatcher::{Dispatcher, DispatcherConfig, HardwareSink};
use fleet_gateway::{FleetContract, HttpLedger};
use fleet_relay::{EnvCredentialSource, RelayConfig, TransactionRelay};
use primitive_types::H160;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Process configuration, environment-sourced.
#[derive(Debug, Clone)]
struct RuntimeConfig {
    rpc_url: String,
    contract_address: H160,
    chain_id: u64,
    machine_id: u64,
    bind_addr: String,
    admin_key_var: String,
}

impl RuntimeConfig {
    /// Read configuration from `FLEET_*` environment variables.
    ///
    /// Only the contract address is mandatory; everything else has a
    /// development default.
    fn from_env() -> Result<Self> {
        let raw_address = std::env::var("FLEET_CONTRACT_ADDRESS")
            .context("FLEET_CONTRACT_ADDRESS must be set")?;
        let contract_address = parse_address(&raw_address)
            .with_context(|| format!("invalid FLEET_CONTRACT_ADDRESS: {raw_address}"))?;

        Ok(Self {
            rpc_url: env_or("FLEET_RPC_URL", "http://127.0.0.1:8545"),
            contract_address,
            chain_id: env_parse("FLEET_CHAIN_ID", 1337)?,
            machine_id: env_parse("FLEET_MACHINE_ID", 1)?,
            bind_addr: env_or("FLEET_BIND_ADDR", "0.0.0.0:8000"),
            admin_key_var: env_or("FLEET_ADMIN_KEY_VAR", "FLEET_ADMIN_KEY"),
        })
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(var) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid {var}: {raw}")),
        Err(_) => Ok(default),
    }
}

fn parse_address(raw: &str) -> Result<H160> {
    let hex_part = raw.trim().strip_prefix("0x").unwrap_or(raw.trim());
    let bytes = hex::decode(hex_part).context("address is not hex")?;
    anyhow::ensure!(bytes.len() == 20, "address must be 20 bytes");
    Ok(H160::from_slice(&bytes))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = RuntimeConfig::from_env()?;
    info!(
        rpc_url = %config.rpc_url,
        contract = %config.contract_address,
        chain_id = config.chain_id,
        machine_id = config.machine_id,
        "starting fleet-bridge"
    );

    // Shared node connection and contract accessor
    let ledger = Arc::new(HttpLedger::new(
        config.rpc_url.clone(),
        config.contract_address,
    ));
    let contract = FleetContract::new(ledger.clone(), config.contract_address);

    // Fail fast on an unreachable node
    match contract.rpc().block_number().await {
        Ok(head) => info!(head, "ledger node reachable"),
        Err(err) => warn!(%err, "ledger node unreachable at startup, continuing"),
    }

    let relay = Arc::new(TransactionRelay::new(
        ledger,
        RelayConfig {
            chain_id: config.chain_id,
            ..RelayConfig::default()
        },
    ));
    let credentials = Arc::new(EnvCredentialSource::new(config.admin_key_var.clone()));
    let state = AppState::new(contract.clone(), relay, credentials);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let ctrl_c_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            let _ = ctrl_c_tx.send(true);
        }
    });

    // One dispatcher per process; fleets run one process per machine
    let mut dispatcher = Dispatcher::new(
        contract,
        Arc::new(HardwareSink::default()),
        DispatcherConfig::for_machine(config.machine_id),
    );
    let dispatcher_stop = shutdown_rx.clone();
    let dispatcher_task = tokio::spawn(async move {
        dispatcher.run(dispatcher_stop).await;
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr))?;
    info!(bind = %config.bind_addr, "api listening");

    let mut server_stop = shutdown_rx;
    axum::serve(listener, fleet_api::router(state))
        .with_graceful_shutdown(async move {
            let _ = server_stop.changed().await;
        })
        .await
        .context("api server failed")?;

    // Make sure the dispatcher sees the signal even if the server exited
    // on its own
    let _ = shutdown_tx.send(true);
    let _ = dispatcher_task.await;
    info!("fleet-bridge stopped");
    Ok(())
}
