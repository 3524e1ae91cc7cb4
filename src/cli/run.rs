//! Run command implementation
//!
//! The polling loop: each cycle opens a session, runs the basket supervisor
//! once, and releases the session on every exit path. A failed cycle is
//! logged and the loop sleeps into the next one; the process never dies
//! from a single cycle's failure.

use crate::basket::{BasketSupervisor, GridBuilder};
use crate::config::{Config, GatewayMode, NotifierConfig, NotifierMode};
use crate::gateway::{BridgeGateway, MarketGateway, PaperGateway};
use crate::notify::{Notifier, NullNotifier, TelegramNotifier};
use crate::risk::RiskLimiter;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Polling interval in minutes
    #[arg(long, default_value_t = 1)]
    pub every_min: u64,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        if config.gateway.mode == GatewayMode::Bridge && config.gateway.bridge.is_none() {
            anyhow::bail!("gateway mode is 'bridge' but [gateway.bridge] is missing");
        }

        let notifier = build_notifier(&config.notifier)?;
        let supervisor = build_supervisor(config);

        // Paper state has to survive across cycles to be meaningful; the
        // bridge session is opened fresh every cycle instead.
        let paper = match config.gateway.mode {
            GatewayMode::Paper => Some(Arc::new(PaperGateway::with_defaults())),
            GatewayMode::Bridge => None,
        };

        let interval = Duration::from_secs(self.every_min.max(1) * 60);
        tracing::info!(
            symbol = %config.trade.symbol,
            every_min = self.every_min,
            once = self.once,
            "starting polling loop"
        );

        loop {
            let start = Instant::now();

            if let Err(error) = run_once(config, &supervisor, notifier.as_ref(), &paper).await {
                tracing::error!(%error, "cycle failed");
            }

            if self.once {
                break;
            }

            let remaining = interval.saturating_sub(start.elapsed());
            tracing::info!(secs = remaining.as_secs(), "next check");
            tokio::time::sleep(remaining).await;
        }

        Ok(())
    }
}

/// One cycle: acquire a session, run the supervisor, always release
async fn run_once(
    config: &Config,
    supervisor: &BasketSupervisor,
    notifier: &dyn Notifier,
    paper: &Option<Arc<PaperGateway>>,
) -> anyhow::Result<()> {
    match config.gateway.mode {
        GatewayMode::Paper => {
            let gateway = paper
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("paper gateway not initialized"))?;
            cycle(gateway.as_ref(), supervisor, notifier).await
        }
        GatewayMode::Bridge => {
            let bridge_config = config
                .gateway
                .bridge
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("bridge config missing"))?;
            let gateway = BridgeGateway::login(bridge_config).await?;
            cycle(&gateway, supervisor, notifier).await
        }
    }
}

async fn cycle(
    gateway: &dyn MarketGateway,
    supervisor: &BasketSupervisor,
    notifier: &dyn Notifier,
) -> anyhow::Result<()> {
    let result = supervisor.run_cycle(gateway, notifier).await;

    // Guaranteed teardown: the session is released whether the cycle
    // succeeded or not.
    if let Err(error) = gateway.logout().await {
        tracing::warn!(%error, "logout failed");
    }

    let outcome = result?;
    tracing::info!(?outcome, "cycle complete");
    Ok(())
}

fn build_supervisor(config: &Config) -> BasketSupervisor {
    let grid = GridBuilder::new(
        config.grid.clone(),
        config.trade.symbol.clone(),
        config.trade.comment_tag.clone(),
    );
    let risk = RiskLimiter::new(
        config.risk.clone(),
        config.trade.symbol.clone(),
        config.trade.comment_tag.clone(),
    );
    BasketSupervisor::new(
        config.trade.symbol.clone(),
        config.trade.comment_tag.clone(),
        config.basket.clone(),
        grid,
        risk,
        config.grid.max_layers_per_side,
    )
}

fn build_notifier(config: &NotifierConfig) -> anyhow::Result<Box<dyn Notifier>> {
    match config.mode {
        NotifierMode::None => Ok(Box::new(NullNotifier)),
        NotifierMode::Telegram => {
            if config.telegram_token.is_empty() || config.telegram_chat_id.is_empty() {
                anyhow::bail!("telegram notifier selected but token/chat_id not set");
            }
            Ok(Box::new(TelegramNotifier::new(
                config.telegram_token.clone(),
                config.telegram_chat_id.clone(),
            )?))
        }
    }
}
