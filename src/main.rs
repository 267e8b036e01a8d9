//! Entry point for the **swayhop** binary.
//!
//! One invocation, one switch: `swayhop <workspace>` connects to the manager,
//! plans the move, sends the command, and exits. Every failure path logs to
//! stderr and exits non-zero — the user's keybinding re-runs the tool, so
//! there is nothing to recover in-process.

use log::{error, info};
use swayhop::client::SwitchClient;
use swayhop::config::Config;
use swayhop::transport;

/// Resolve the config directory (`$XDG_CONFIG_HOME/swayhop`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("swayhop")
}

/// Try to load the config from `$XDG_CONFIG_HOME/swayhop/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let wanted = match (args.next(), args.next()) {
        (Some(name), None) => name,
        _ => {
            eprintln!("usage: swayhop <workspace>");
            std::process::exit(2);
        }
    };

    let config = load_config();

    let socket = match config.socket_path.clone().or_else(transport::socket_from_env) {
        Some(path) => path,
        None => {
            error!("neither I3SOCK nor SWAYSOCK is set and no socket_path is configured");
            std::process::exit(1);
        }
    };

    let mut client = match SwitchClient::connect(&socket, &config) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    match client.switch_to(&wanted) {
        Ok(command) => info!("done: {}", command),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
