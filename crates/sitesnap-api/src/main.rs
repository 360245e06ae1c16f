use sitesnap_api::{setup, telemetry};
use sitesnap_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_tracing();

    // Load configuration; missing credentials are fatal here.
    let config = Config::from_env()?;

    let state = setup::build_state(config.clone()).await?;
    let router = setup::routes::build_router(state)?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
