use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use libroomtune_player::roomtune_player::{PlayerRegistry, SimulatedTransport, YtDlpSource};
use roomtuned::commands::{CommandContext, CommandTable};
use roomtuned::config::{self, Config};
use roomtuned::console::{Console, write_output};
use roomtuned::logging;
use tap::TapFallible;
use tokio::io::{BufReader, stdin, stdout};
use tracing::{error, info, warn};

const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_path("./.env").ok();
    let config = Config::from_matches(&config::command().get_matches());
    let _guard = logging::init(&config.log_level, config.log_dir.as_deref())?;
    info!("Starting roomtuned {}", env!("CARGO_PKG_VERSION"));
    if let Some(dir) = &config.log_dir {
        info!("Writing logs to {dir:?}");
    }

    let source = match &config.yt_dlp_path {
        Some(path) => YtDlpSource::with_path(path),
        None => YtDlpSource::new(),
    };
    let transport = SimulatedTransport::new(config.simulated_settings());
    let registry = Arc::new(PlayerRegistry::new(
        Arc::new(transport),
        config.player_settings(),
    ));
    let ctx = CommandContext::new(registry.clone(), Arc::new(source));

    let (output_tx, output_rx) = flume::unbounded();
    let writer = tokio::spawn(write_output(output_rx, stdout()));
    let mut console = Console::new(CommandTable::standard()?, ctx, output_tx);

    let result = tokio::select! {
        result = console.run(BufReader::new(stdin())) => {
            result.tap_err(|e| error!("Console stopped: {e:?}"))
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            Ok(())
        }
    };

    registry.shutdown().await;
    drop(console);
    match tokio::time::timeout(OUTPUT_DRAIN_TIMEOUT, writer).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => warn!("Error writing output: {e:?}"),
        Ok(Err(e)) => warn!("Output task failed: {e:?}"),
        Err(_) => warn!("Timed out flushing console output"),
    }
    info!("Shutdown complete");
    result
}
