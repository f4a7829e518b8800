use crate::adapter::HttpAdapter;
use crate::app_config::AppConfig;
use crate::domain::events::Event;
use crate::http::diagnostics::Diagnostics;
use crate::http::transport::ReqwestTransport;
use crate::store::{Store, StoreHost};
use crate::store_listener::store_listener;
use crate::trigger_listener::trigger_listener;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::{signal, task};
use tracing::info;

mod actions;
mod adapter;
mod app_config;
mod device_loader;
mod domain;
mod http;
mod polling;
mod store;
mod store_listener;
#[cfg(test)]
mod test_support;
mod trigger_listener;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let client = http::new_client(&config)?;
    let transport = Arc::new(ReqwestTransport::new(client));

    let (tx, rx) = mpsc::channel::<Event>(config.core().store_buffer_size());
    let mut store = Store::new(rx);
    let notifier_rx = store.notifier();

    task::spawn(async move {
        store_listener(notifier_rx).await;
    });
    info!("✅  Initialized store listener");

    task::spawn(async move {
        store.listen().await;
    });
    info!("✅  Initialized store");

    let devices = device_loader::load_devices_from(config.devices().directory(), "json").await?;
    let host = Arc::new(StoreHost::new(tx));
    let adapter = Arc::new(HttpAdapter::start(devices, transport, host, Diagnostics::new(config.core().verbose())).await);
    info!("✅  Started all devices");

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    let triggers = task::spawn(trigger_listener(adapter.clone(), BufReader::new(tokio::io::stdin())));

    signal::ctrl_c().await?;
    info!("🛑 Shutting down");

    triggers.abort();
    adapter.stop();
    Ok(())
}
