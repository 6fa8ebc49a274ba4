use crate::discovery::discover_address;
use crate::shipper::ShippingLayer;
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,mirrorlink_core=debug,mirrorlink_server=debug,\
mirrorlink_client=debug,mirrorlink_logging=debug,mirror_relay=debug,mirror_sender=debug,\
mirror_receiver=debug,mirror_logd=debug";

/// Installs the process-wide subscriber: console output, plus shipping to
/// the aggregator when an address is configured. `component` names this
/// process in shipped records. Must be called inside a tokio runtime.
pub fn init_logging(component: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let address = discover_address();
    let shipping = address
        .as_deref()
        .map(|address| ShippingLayer::spawn(address, component).0);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(shipping)
        .try_init()?;

    match address {
        Some(address) => info!("Shipping logs to {}", address),
        None => info!("No log aggregator configured, logging locally"),
    }
    Ok(())
}

/// Console-only subscriber for processes that must not ship, such as the
/// aggregator itself.
pub fn init_local_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}
