use dm_server::{Config, Server, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    tracing::info!("Don Maris server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. Run (state initialization connects the store and backfills
    //    legacy order numbers before the listener opens)
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
