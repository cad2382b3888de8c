use env_logger::Env;
use log::{error, info};
use monitor::config::Config;
use monitor::monitor::Monitor;
use monitor::notifier;
use monitor::rcon::RconClient;
use std::sync::Arc;

/// Loads configuration from the environment, then polls until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Monitoring {}", config.server_url);
    info!(
        "AFK time {} minutes, no kicks at or below {} players, VIP whitelist {}",
        config.afk_time.as_secs() / 60,
        config.min_players,
        if config.vip_whitelist { "on" } else { "off" }
    );
    if let Some(flag) = &config.whitelist_flag {
        info!("Whitelist flag: {}", flag);
    }

    let rcon = Arc::new(RconClient::new(&config.server_url, &config.api_key)?);
    let notifier = notifier::from_url(config.webhook_url.as_deref())?;
    let mut monitor = Monitor::new(&config, rcon.clone(), rcon, notifier);

    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}
