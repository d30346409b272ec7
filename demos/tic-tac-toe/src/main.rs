use noughts::prelude::*;

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), NoughtsError> {
    noughts::init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!(addr = %config.bind_addr, "starting tic-tac-toe server");

    let server = NoughtsServerBuilder::from_config(config).build().await?;
    server.run().await
}
