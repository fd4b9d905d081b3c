use perks_shared::ServiceKind;
use perks_store::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perks_simulator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let ports = &config.simulator_ports;
    tracing::info!(
        "Starting simulators: travel {}, hotel {}, shopping {}",
        ports.travel,
        ports.hotel,
        ports.shopping
    );

    tokio::try_join!(
        perks_simulator::serve(ServiceKind::Travel, ports.port_for(ServiceKind::Travel)),
        perks_simulator::serve(ServiceKind::Hotel, ports.port_for(ServiceKind::Hotel)),
        perks_simulator::serve(ServiceKind::Shopping, ports.port_for(ServiceKind::Shopping)),
    )?;
    Ok(())
}
