use std::error::Error;

mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the environment.
    dotenvy::dotenv().ok();

    telemetry::init()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "car-guide-backend starting");

    api::start().await?;

    Ok(())
}
