mod cli;
mod controller;
mod provider;
mod repl;

use std::path::{Path, PathBuf};

use parley_ai::{ModelCatalog, SessionManager};
use parley_config::schema::{LogLevel, ParleyConfig};
use tracing_subscriber::EnvFilter;

use crate::controller::ConversationController;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- parley crashed ---");
        eprintln!("Run with RUST_LOG=debug for more detail.");
        eprintln!("----------------------\n");
        default_hook(info);
    }));
}

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Variables already set in the environment win.
fn load_dotenv() {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("parley").join(".env"));
    }

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let line = line.strip_prefix("export ").unwrap_or(line);
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

/// Filter precedence: `--log-level`, then `RUST_LOG`, then the config level.
fn log_filter(cli: Option<&str>, rust_log: Option<&str>, level: LogLevel) -> EnvFilter {
    let directives = cli
        .or_else(|| rust_log.filter(|s| !s.trim().is_empty()))
        .unwrap_or(level.directive());
    EnvFilter::builder().parse_lossy(directives)
}

fn main() {
    load_dotenv();
    install_panic_hook();

    let args = cli::parse();
    if let Err(e) = run(args) {
        eprintln!("parley: {e}");
        std::process::exit(1);
    }
}

fn run(args: cli::Args) -> parley_common::Result<()> {
    let config_path = args.config.as_deref().map(Path::new);
    let loaded = parley_config::load_config(config_path);

    let level = loaded.as_ref().map(|c| c.logging.level).unwrap_or_default();
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            args.log_level.as_deref(),
            rust_log.as_deref(),
            level,
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("parley v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) if config_path.is_some() => return Err(e.into()),
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            ParleyConfig::default()
        }
    };
    if let Some(path) = config_path {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(variant) = args.model {
        config.model.variant = variant;
    }
    if let Some(system) = args.system {
        config.chat.system_instruction = system;
    }

    if args.print_config {
        println!("{}", parley_config::config_to_json(&config));
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let provider = provider::build_provider(&config.model);
    let sessions = SessionManager::new(
        ModelCatalog::new(&config.model.flash_model, &config.model.pro_model),
        config.model.variant,
        config.chat.system_instruction().map(str::to_string),
    );
    let controller = ConversationController::new(provider, sessions, config.chat);

    runtime.block_on(repl::run(controller))?;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(cli: Option<&str>, rust_log: Option<&str>, level: LogLevel) -> String {
        log_filter(cli, rust_log, level).to_string().to_ascii_lowercase()
    }

    #[test]
    fn rust_log_beats_config_level() {
        assert_eq!(filter(None, Some("debug"), LogLevel::Warning), "debug");
    }

    #[test]
    fn cli_flag_beats_rust_log() {
        assert_eq!(
            filter(Some("parley_ai=trace"), Some("debug"), LogLevel::Warning),
            "parley_ai=trace"
        );
    }

    #[test]
    fn config_level_applies_without_rust_log() {
        assert_eq!(filter(None, None, LogLevel::Error), "error");
        assert_eq!(filter(None, Some("  "), LogLevel::Info), "info");
    }
}
