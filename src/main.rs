// Shipfaster site server

use shipfaster::{AppConfig, build_app};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("shipfaster: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match config.log.clone().init() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("shipfaster: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> shipfaster::Result<()> {
    let addr = config.server.socket_addr()?;
    let app = build_app(&config)?;
    info!(address = %addr, "Starting Shipfaster");
    app.listen(addr).await?;
    Ok(())
}
