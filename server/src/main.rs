use canteen_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    setup_environment()?;

    tracing::info!("Canteen server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize server state (work dir, database, JWT)
    let state = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
