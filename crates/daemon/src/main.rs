//! Netprobe - Main Entry Point
//! HTTP server running network diagnostics on the host

mod config;
mod logging;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use config::DaemonConfig;
use netprobe_api_http::HttpServer;
use netprobe_core::domain::{DiagnosticKind, Platform};
use netprobe_core::port::id_provider::UuidProvider;
use netprobe_core::port::time_provider::SystemTimeProvider;
use netprobe_core::DiagnosticService;
use netprobe_infra_system::{HostInfo, SubprocessRunner};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env().context("Invalid configuration")?;

    // 2. Initialize logging (guard must outlive the server)
    let _log_guard = logging::init_logging(config.log_format, config.log_dir.as_deref())?;

    info!("Netprobe v{} starting...", VERSION);
    HostInfo::collect().log();

    // 3. Setup dependencies (DI wiring)
    let platform = Platform::current();
    let capabilities = config.capability_table(&platform)?;
    for kind in DiagnosticKind::ALL {
        let capability = capabilities.get(kind);
        debug!(
            kind = %kind,
            program = capability.program,
            deadline = ?capability.deadline,
            exit_policy = ?capability.exit_policy,
            "Capability"
        );
    }

    let time_provider = Arc::new(SystemTimeProvider);
    let service = Arc::new(
        DiagnosticService::new(
            Arc::new(SubprocessRunner::new()),
            platform,
            time_provider.clone(),
            Arc::new(UuidProvider),
        )
        .with_capabilities(capabilities),
    );

    // 4. Start HTTP server
    let server = HttpServer::new(config.http_config(), service, time_provider);
    let handle = server
        .start()
        .await
        .context("HTTP server start failed")?;

    info!(addr = %handle.local_addr(), "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    handle.stop().await.context("HTTP server stop failed")?;

    info!("Shutdown complete.");

    Ok(())
}
