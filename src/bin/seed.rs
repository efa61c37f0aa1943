use anyhow::Context;
use starwars_api::config::{AppConfig, SeedUserConfig};
use starwars_api::{seed, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("starwars_api=info,seed=info");

    let config = AppConfig::from_env()?;
    let seed_user = SeedUserConfig::from_env()?;
    config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to seed; the in-memory store would be discarded")?;

    let state = AppState::from_config(config).await?;
    let client = seed::SwapiClient::new(&state.config.swapi)?;

    let report = seed::run(&client, state.store.as_ref(), seed_user.as_ref()).await?;

    tracing::info!(
        planets = report.planets,
        characters = report.characters,
        user_id = ?report.user,
        "swapi data loaded"
    );
    Ok(())
}
