//! Configuration types for mt5-grid
//!
//! Every threshold the basket manager uses lives here and is injected into
//! the components at construction, nothing reads ambient globals.

use crate::gateway::BridgeConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub trade: TradeConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub basket: BasketConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Gateway selection
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    /// Bridge connection details, required in bridge mode
    pub bridge: Option<BridgeConfig>,
}

/// Gateway mode: simulated book or live MT5 bridge
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    Paper,
    Bridge,
}

/// Traded instrument
#[derive(Debug, Clone, Deserialize)]
pub struct TradeConfig {
    pub symbol: String,
    /// Prefix for the layer tag embedded in order comments
    #[serde(default = "default_comment_tag")]
    pub comment_tag: String,
}

fn default_comment_tag() -> String {
    "HMv1".to_string()
}

/// Stop-ladder geometry and martingale sizing
#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    /// Lot size of layer 0
    #[serde(default = "default_base_lot")]
    pub base_lot: Decimal,
    /// Volume multiplier per layer (>= 1.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
    /// Grid spacing between layers, in pips
    #[serde(default = "default_step_pips")]
    pub step_pips: u32,
    /// Layers per side, indexed 0..N-1
    #[serde(default = "default_max_layers")]
    pub max_layers_per_side: u32,
    /// Decimal places of the broker's lot step
    #[serde(default = "default_lot_precision")]
    pub lot_precision: u32,
}

fn default_base_lot() -> Decimal {
    dec!(0.01)
}
fn default_multiplier() -> Decimal {
    dec!(1.6)
}
fn default_step_pips() -> u32 {
    12
}
fn default_max_layers() -> u32 {
    5
}
fn default_lot_precision() -> u32 {
    2
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            base_lot: default_base_lot(),
            multiplier: default_multiplier(),
            step_pips: default_step_pips(),
            max_layers_per_side: default_max_layers(),
            lot_precision: default_lot_precision(),
        }
    }
}

/// Basket take-profit and rebuild policy
#[derive(Debug, Clone, Deserialize)]
pub struct BasketConfig {
    /// Close everything when floating P/L reaches this amount (account currency)
    #[serde(default = "default_tp_money")]
    pub tp_money: Option<Decimal>,
    /// Or when floating P/L reaches this percentage of balance
    #[serde(default = "default_tp_pct")]
    pub tp_pct: Option<Decimal>,
    /// Reseed the grid whenever no positions are open
    #[serde(default = "default_true")]
    pub rebuild_on_flat: bool,
}

fn default_tp_money() -> Option<Decimal> {
    Some(dec!(2.50))
}
fn default_tp_pct() -> Option<Decimal> {
    Some(dec!(0.15))
}
fn default_true() -> bool {
    true
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            tp_money: default_tp_money(),
            tp_pct: default_tp_pct(),
            rebuild_on_flat: true,
        }
    }
}

/// Account-wide protection limits
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Maximum total open volume across all positions of the symbol
    #[serde(default = "default_max_total_volume")]
    pub max_total_volume: Decimal,
    /// Close everything when drawdown reaches this percentage
    #[serde(default = "default_max_drawdown_pct")]
    pub max_drawdown_pct: Decimal,
}

fn default_max_total_volume() -> Decimal {
    dec!(0.50)
}
fn default_max_drawdown_pct() -> Decimal {
    dec!(10.0)
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_total_volume: default_max_total_volume(),
            max_drawdown_pct: default_max_drawdown_pct(),
        }
    }
}

/// Notification channel selection
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NotifierConfig {
    #[serde(default)]
    pub mode: NotifierMode,
    #[serde(default)]
    pub telegram_token: String,
    #[serde(default)]
    pub telegram_chat_id: String,
}

/// Notifier mode
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierMode {
    #[default]
    None,
    Telegram,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize_full() {
        let toml = r#"
            [gateway]
            mode = "bridge"

            [gateway.bridge]
            base_url = "http://127.0.0.1:6542"
            login = 520002796
            password = "secret"
            server = "Demo-Server"

            [trade]
            symbol = "USDJPY"
            comment_tag = "HMv1"

            [grid]
            base_lot = 0.01
            multiplier = 1.6
            step_pips = 12
            max_layers_per_side = 5
            lot_precision = 2

            [basket]
            tp_money = 2.50
            tp_pct = 0.15
            rebuild_on_flat = true

            [risk]
            max_total_volume = 0.50
            max_drawdown_pct = 10.0

            [notifier]
            mode = "telegram"
            telegram_token = "123:abc"
            telegram_chat_id = "-100"

            [telemetry]
            log_level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.gateway.mode, GatewayMode::Bridge);
        assert!(config.gateway.bridge.is_some());
        assert_eq!(config.trade.symbol, "USDJPY");
        assert_eq!(config.grid.max_layers_per_side, 5);
        assert_eq!(config.basket.tp_money, Some(dec!(2.50)));
        assert_eq!(config.risk.max_drawdown_pct, dec!(10.0));
        assert_eq!(config.notifier.mode, NotifierMode::Telegram);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_config_minimal_uses_defaults() {
        let toml = r#"
            [gateway]
            mode = "paper"

            [trade]
            symbol = "USDJPY"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.gateway.mode, GatewayMode::Paper);
        assert_eq!(config.trade.comment_tag, "HMv1");
        assert_eq!(config.grid.base_lot, dec!(0.01));
        assert_eq!(config.grid.multiplier, dec!(1.6));
        assert_eq!(config.grid.step_pips, 12);
        assert!(config.basket.rebuild_on_flat);
        assert_eq!(config.risk.max_total_volume, dec!(0.50));
        assert_eq!(config.notifier.mode, NotifierMode::None);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
        assert_eq!(config.gateway.mode, GatewayMode::Paper);
    }
}
