//! x64dbg MCP Server
//!
//! This binary runs an MCP server that drives x64dbg via generated scripts,
//! speaking the MCP protocol over stdin/stdout.

use clap::{Args, Parser, Subcommand};
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use x64dbg_mcp::{DbgConfig, DbgController, X64DbgMcpServer};

#[derive(Parser)]
#[command(name = "x64dbg-mcp", version, about = "x64dbg MCP Server")]
struct Cli {
    /// Path to the x64dbg executable (overrides X64DBG_PATH and auto-detection)
    #[arg(long, global = true)]
    x64dbg_path: Option<PathBuf>,

    /// Directory watched by the scripting plugin (overrides X64DBG_PLUGIN_DIR)
    #[arg(long, global = true)]
    plugin_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the MCP server (default)
    Serve,
    /// Check the installation and optionally drop a test script
    Probe(ProbeArgs),
}

#[derive(Args)]
struct ProbeArgs {
    /// x64dbg command to render into a script (e.g. "bplist")
    #[arg(long)]
    command: Option<String>,
    /// Run the command through the x64dbg executable instead of dropping a script
    #[arg(long)]
    direct: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("x64dbg_mcp=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(cli.x64dbg_path, cli.plugin_dir);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config).await,
        Command::Probe(args) => run_probe(config, args).await,
    }
}

fn build_config(x64dbg_path: Option<PathBuf>, plugin_dir: Option<PathBuf>) -> DbgConfig {
    if x64dbg_path.is_some() || plugin_dir.is_some() {
        let detected = DbgConfig::detect();
        DbgConfig {
            x64dbg_path: x64dbg_path.or(detected.x64dbg_path),
            plugin_dir: plugin_dir.or(detected.plugin_dir),
        }
    } else {
        DbgConfig::detect()
    }
}

async fn wait_for_shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
            _ = tokio::signal::ctrl_c() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}

async fn run_server(config: DbgConfig) -> anyhow::Result<()> {
    info!("Starting x64dbg MCP Server");
    if let Some(dir) = &config.plugin_dir {
        info!("Plugin directory: {}", dir.display());
    } else {
        info!("No x64dbg installation detected yet; tools will report NOT_INSTALLED");
    }

    let controller = Arc::new(DbgController::new(config));
    let server = X64DbgMcpServer::new(controller);

    info!("MCP server listening on stdio");
    let service = server.serve(stdio()).await?;

    tokio::select! {
        res = service.waiting() => {
            res?;
            info!("Transport closed");
        }
        _ = wait_for_shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn run_probe(config: DbgConfig, args: ProbeArgs) -> anyhow::Result<()> {
    let status = serde_json::json!({
        "installed": config.is_installed(),
        "x64dbg_path": config.x64dbg_path.as_ref().map(|p| p.display().to_string()),
        "plugin_dir": config.plugin_dir.as_ref().map(|p| p.display().to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);

    if let Some(command) = args.command.as_deref() {
        let controller = DbgController::new(config);
        let envelope = if args.direct {
            controller.execute_command_direct(command, true).await?
        } else {
            controller.execute_command(command, true, true)?
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }

    Ok(())
}
