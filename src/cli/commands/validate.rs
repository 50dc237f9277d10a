//! Validate configuration command.

use anyhow::Result;
use edge_config::AppConfig;
use std::path::Path;

pub fn run(config: &AppConfig, config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("Validating default configuration with environment overrides"),
    }

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    let engine = &config.engine;
    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!(
        "Moving averages: {} {}/{}",
        engine.ma_kind, engine.fast_length, engine.slow_length
    );
    println!(
        "RSI: {} ({} / {})",
        engine.rsi_length, engine.rsi_oversold, engine.rsi_overbought
    );
    println!(
        "Opening range: {} (session {}, UTC offset {} min)",
        engine.orb_window, engine.session_window, engine.utc_offset_minutes
    );
    println!(
        "Zones: pivots {}/{}, height {} ticks, max {} per kind",
        engine.pivot_left, engine.pivot_right, engine.zone_height_ticks, engine.max_zones_per_kind
    );
    println!(
        "Targets: {}x ATR({}) profit, {}x stop",
        engine.profit_factor, engine.atr_length, engine.stop_factor
    );

    Ok(())
}
