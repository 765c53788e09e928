use quadraticlands::{server::start_server, QuadraticLandsConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quadraticlands=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = envy::prefixed("QL_")
        .from_env::<QuadraticLandsConfig>()
        .expect("failed getting QL_ envs.");

    start_server(config).await?;

    Ok(())
}
