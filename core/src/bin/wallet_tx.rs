use std::process::ExitCode;

use bitgo_core::{BitGoClient, ClientConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let Some(wallet) = std::env::args().nth(1).or_else(|| std::env::var("BITGO_WALLET").ok()) else {
        error!("usage: wallet-tx <wallet-id> (or set BITGO_WALLET)");
        return ExitCode::FAILURE;
    };

    info!(network = ?config.network(), wallet = %wallet, "listing wallet transactions");
    let client = BitGoClient::new(config);
    match client.list_wallet_transactions(&wallet) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
