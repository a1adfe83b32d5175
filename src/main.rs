// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;
use fhevm_session::{
    api::start_server,
    config::ServerConfig,
    crypto::{ChainReader, Signer, StaticChain},
    engine::{EngineLoader, LocalEngineLoader},
    gateway::{GatewayTransport, HttpGateway, UnavailableGateway},
    session::SessionClient,
    version,
};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("Starting fhEVM gateway API...");
    println!("BUILD VERSION: {}", version::VERSION);
    println!("{}", version::get_version_string());
    println!();

    let config = ServerConfig::from_env();
    config.validate()?;

    let loader: Arc<dyn EngineLoader> = match &config.engine_seed {
        Some(seed) => Arc::new(LocalEngineLoader::from_seed(seed.as_bytes())?),
        None => {
            tracing::warn!("ENGINE_SEED not set, using a random engine key for this run");
            Arc::new(LocalEngineLoader::random())
        }
    };

    let gateway: Arc<dyn GatewayTransport> = match &config.gateway_url {
        Some(url) => {
            tracing::info!("Using decryption gateway at {}", url);
            Arc::new(HttpGateway::new(
                url,
                Duration::from_millis(config.gateway_timeout_ms),
            )?)
        }
        None => {
            tracing::warn!("GATEWAY_URL not set, user decryption will be declined");
            Arc::new(UnavailableGateway)
        }
    };

    let chain: Arc<dyn ChainReader> = match &config.rpc_url {
        Some(url) => Arc::new(
            Provider::<Http>::try_from(url.as_str())
                .with_context(|| format!("invalid RPC_URL: {}", url))?,
        ),
        None => Arc::new(StaticChain(config.chain_id)),
    };

    let mut client = SessionClient::new(loader, gateway, chain, config.client.clone());
    if let Some(key) = &config.signer_private_key {
        let wallet: LocalWallet = key
            .trim_start_matches("0x")
            .parse()
            .context("failed to parse SIGNER_PRIVATE_KEY")?;
        let signer: Arc<dyn Signer> = Arc::new(wallet);
        tracing::info!("Signer address: {:?}", signer.get_address().await?);
        client = client.with_signer(signer);
    }

    client.init().await?;
    println!("Engine ready");

    start_server(Arc::new(client), config.bind_addr()?).await?;

    println!("Shutting down...");
    Ok(())
}
