//! Node Proxy Switch command-line entry point.
//!
//! Runs a single command against the `.npmrc` and prints the resulting proxy
//! settings.  A tray or window front end calls the same
//! [`proxy_switch::infrastructure::ui_bridge`] commands this binary does.
//!
//! # Usage
//!
//! ```text
//! proxy-switch [OPTIONS] <COMMAND>
//!
//! Commands:
//!   status   Show the proxy settings currently in the .npmrc
//!   enable   Uncomment the proxy and https-proxy lines
//!   disable  Comment out the proxy and https-proxy lines
//!   apply    Write new proxy URLs, keeping their enabled state
//!
//! Options:
//!   --npmrc <PATH>     .npmrc to edit [env: PROXY_SWITCH_NPMRC]
//!   --settings <PATH>  Settings file [env: PROXY_SWITCH_SETTINGS]
//!   --json             Print the command result as JSON
//! ```
//!
//! Logs go to stderr; the level comes from `RUST_LOG`, else from the
//! settings' `log_level`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use proxy_switch::infrastructure::storage::settings::{
    load_settings, load_settings_from, AppSettings,
};
use proxy_switch::infrastructure::ui_bridge::{
    apply_proxy_settings, disable_proxy, enable_proxy, get_proxy_settings, AppState,
    ApplyProxyDto, CommandResult, ProxySettingsDto,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Toggle the npm proxy in ~/.npmrc.
#[derive(Debug, Parser)]
#[command(name = "proxy-switch", version)]
struct Cli {
    /// The .npmrc file to edit.  Defaults to `[npmrc] path` from the settings,
    /// then to ~/.npmrc.
    #[arg(long, global = true, env = "PROXY_SWITCH_NPMRC")]
    npmrc: Option<PathBuf>,

    /// Settings file.  Defaults to the platform config directory.
    #[arg(long, global = true, env = "PROXY_SWITCH_SETTINGS")]
    settings: Option<PathBuf>,

    /// Print the `{success, data, error}` result as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the proxy settings currently in the .npmrc.
    Status,
    /// Uncomment the proxy and https-proxy lines.
    Enable,
    /// Comment out the proxy and https-proxy lines.
    Disable,
    /// Write new proxy URLs.  Lines keep their enabled state; missing lines
    /// are added enabled.
    Apply {
        /// Value for `proxy = "..."`.
        #[arg(long)]
        http: String,
        /// Value for `https-proxy = "..."`.
        #[arg(long)]
        https: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Settings are read before logging starts because they carry the level.
    let loaded = match &cli.settings {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    let level = loaded
        .as_ref()
        .map(|s| s.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = loaded.unwrap_or_else(|e| {
        warn!("falling back to default settings: {e}");
        AppSettings::default()
    });

    let state = AppState::from_settings(settings, cli.npmrc)
        .context("failed to locate the .npmrc to edit")?;

    let result = match cli.command {
        Command::Status => get_proxy_settings(state).await,
        Command::Enable => enable_proxy(state).await,
        Command::Disable => disable_proxy(state).await,
        Command::Apply { http, https } => {
            apply_proxy_settings(state, ApplyProxyDto { http, https }).await
        }
    };

    print_result(&result, cli.json)?;
    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_result(result: &CommandResult<ProxySettingsDto>, json: bool) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(result).context("failed to encode result")?;
        println!("{text}");
        return Ok(());
    }

    match (&result.data, &result.error) {
        (Some(dto), _) => {
            println!("proxy:       {}", describe(&dto.http, dto.http_enabled));
            println!("https-proxy: {}", describe(&dto.https, dto.https_enabled));
        }
        (None, Some(error)) => eprintln!("error: {error}"),
        (None, None) => {}
    }
    Ok(())
}

fn describe(url: &str, enabled: bool) -> String {
    match (url.is_empty(), enabled) {
        (true, _) => "not configured".to_string(),
        (false, true) => format!("{url} (enabled)"),
        (false, false) => format!("{url} (disabled)"),
    }
}
