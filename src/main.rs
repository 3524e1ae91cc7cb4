use clap::Parser;
use mt5_grid::cli::{Cli, Commands};
use mt5_grid::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    mt5_grid::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting grid bot");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Gateway: {:?}", config.gateway.mode);
            println!(
                "  Trade: {} (tag {})",
                config.trade.symbol, config.trade.comment_tag
            );
            println!(
                "  Grid: base_lot={} mult={} step={}p layers={}",
                config.grid.base_lot,
                config.grid.multiplier,
                config.grid.step_pips,
                config.grid.max_layers_per_side
            );
            println!(
                "  Basket: tp_money={:?} tp_pct={:?} rebuild_on_flat={}",
                config.basket.tp_money, config.basket.tp_pct, config.basket.rebuild_on_flat
            );
            println!(
                "  Risk: max_volume={} max_drawdown={}%",
                config.risk.max_total_volume, config.risk.max_drawdown_pct
            );
        }
    }

    Ok(())
}
