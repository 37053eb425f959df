//! Entry point for the payroll engine HTTP server.
//!
//! Environment:
//! * `PAYROLL_CONFIG_DIR` - policy directory (default `./config/ph_2025`)
//! * `PAYROLL_BIND_ADDR` - listen address (default `127.0.0.1:3000`)
//! * `PAYROLL_ROSTER` - optional roster YAML to seed the ledger with
//! * `RUST_LOG` - log filter (default `info`)

use std::env;
use std::error::Error;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::store::PayrollLedger;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/ph_2025";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir =
        env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    let ledger = match env::var("PAYROLL_ROSTER") {
        Ok(path) => PayrollLedger::from_roster_file(path, config.policy().clone())?,
        Err(_) => PayrollLedger::empty(config.policy().clone()),
    };
    let router = create_router(AppState::with_ledger(config, ledger));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, config_dir = %config_dir, "Payroll engine listening");
    axum::serve(listener, router).await?;

    Ok(())
}
