//! Server initialization utilities
//!
//! Provides tracing setup, shutdown signal handling and the `serve_stdio!`
//! macro used by every server binary.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for MCP servers
///
/// Sets up logging to stderr (stdout is reserved for MCP protocol) with:
/// - Formatted output without ANSI colors (for clean logs)
/// - Environment-based filtering via RUST_LOG
/// - Default log level of `info` for the specified crate and for `mcp_common`
///
/// Set `LOG_FORMAT=json` for structured JSON output.
///
/// ```rust,ignore
/// mcp_common::init_tracing("sysinfo_mcp")?;
/// ```
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("{}=info", crate_name).parse()?)
        .add_directive("mcp_common=info".parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

/// Macro for standardized MCP server initialization
///
/// Expands to a `main` that:
/// 1. Initializes tracing to stderr
/// 2. Loads [`SessionConfig`](crate::SessionConfig) for `$env_prefix`
/// 3. Builds the dispatcher from `<$server_type>::new()` (a [`ToolServer`](crate::ToolServer))
/// 4. Serves stdin/stdout until EOF or a shutdown signal
///
/// A read or write failure on the standard streams makes `main` return an
/// error, so the process exits non-zero.
///
/// ```rust,ignore
/// mcp_common::serve_stdio!(SysInfoMcpServer, "sysinfo_mcp", "SYSINFO_MCP");
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr, $env_prefix:expr) => {
        fn main() -> anyhow::Result<()> {
            $crate::init_tracing($crate_name)?;

            let runtime = tokio::runtime::Runtime::new()?;
            let result = runtime.block_on(async {
                tracing::info!(concat!("Starting ", $crate_name, " MCP Server"));

                let config = $crate::SessionConfig::load($env_prefix);
                let server = <$server_type>::new();
                let dispatcher =
                    std::sync::Arc::new($crate::Dispatcher::for_server(&server, &config)?);

                $crate::serve(
                    dispatcher,
                    &config,
                    tokio::io::stdin(),
                    tokio::io::stdout(),
                    $crate::shutdown_signal(),
                )
                .await?;

                tracing::info!("Server shutting down");
                anyhow::Ok(())
            });

            // A pending stdin read or an abandoned blocking collector must not
            // keep the process alive.
            runtime.shutdown_background();
            result
        }
    };
}
