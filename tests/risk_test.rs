//! Integration tests for the risk limiter

use mt5_grid::config::RiskConfig;
use mt5_grid::gateway::{MarketGateway, OrderSide, PaperGateway, StopOrderRequest};
use mt5_grid::notify::{NullNotifier, RecordingNotifier};
use mt5_grid::risk::{RiskAction, RiskLimiter};
use rust_decimal_macros::dec;

const SYMBOL: &str = "USDJPY";
const TAG: &str = "HMv1";

fn limiter() -> RiskLimiter {
    RiskLimiter::new(RiskConfig::default(), SYMBOL, TAG)
}

async fn place_order(gateway: &PaperGateway, layer: u32) {
    gateway
        .place_stop_order(&StopOrderRequest {
            symbol: SYMBOL.to_string(),
            side: OrderSide::Buy,
            price: dec!(147.222),
            volume: dec!(0.01),
            comment: format!("HMv1|side=BUY|layer={layer}"),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_drawdown_at_limit_liquidates() {
    let gateway = PaperGateway::with_defaults();
    gateway.set_account(dec!(1000), dec!(880)).await; // dd = 12.0%
    gateway
        .push_position(OrderSide::Buy, dec!(0.01), dec!(-120), "HMv1|side=BUY|layer=0")
        .await;
    place_order(&gateway, 1).await;

    let action = limiter().enforce(&gateway, &NullNotifier).await.unwrap();

    assert_eq!(action, RiskAction::Liquidated);
    assert!(gateway.position_book().await.is_empty());
    assert!(gateway.order_book().await.is_empty());
}

#[tokio::test]
async fn test_drawdown_under_limit_is_no_action() {
    let gateway = PaperGateway::with_defaults();
    gateway.set_account(dec!(1000), dec!(920)).await; // dd = 8.0%
    gateway
        .push_position(OrderSide::Buy, dec!(0.01), dec!(-80), "HMv1|side=BUY|layer=0")
        .await;

    let action = limiter().enforce(&gateway, &NullNotifier).await.unwrap();

    assert_eq!(action, RiskAction::None);
    assert_eq!(gateway.position_book().await.len(), 1);
}

#[tokio::test]
async fn test_exposure_cap_prunes_orders_but_keeps_positions() {
    let gateway = PaperGateway::with_defaults();
    // total volume 0.55 > cap 0.50, drawdown fine
    gateway
        .push_position(OrderSide::Buy, dec!(0.30), dec!(-1.00), "HMv1|side=BUY|layer=0")
        .await;
    gateway
        .push_position(OrderSide::Sell, dec!(0.25), dec!(0.20), "HMv1|side=SELL|layer=0")
        .await;
    place_order(&gateway, 1).await;
    place_order(&gateway, 2).await;

    let action = limiter().enforce(&gateway, &NullNotifier).await.unwrap();

    assert_eq!(action, RiskAction::OrdersPruned);
    assert!(gateway.order_book().await.is_empty());
    // existing positions carry risk that must be allowed to resolve
    assert_eq!(gateway.position_book().await.len(), 2);
    assert_eq!(gateway.close_count().await, 0);
}

#[tokio::test]
async fn test_each_trigger_sends_one_alert() {
    let gateway = PaperGateway::with_defaults();
    gateway.set_account(dec!(1000), dec!(880)).await;
    gateway
        .push_position(OrderSide::Buy, dec!(0.01), dec!(-120), "HMv1|side=BUY|layer=0")
        .await;
    let notifier = RecordingNotifier::new();

    limiter().enforce(&gateway, &notifier).await.unwrap();
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Protection triggered"));

    // next cycle is flat and healthy: silence
    gateway.set_account(dec!(1000), dec!(1000)).await;
    limiter().enforce(&gateway, &notifier).await.unwrap();
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn test_exposure_prune_sends_alert() {
    let gateway = PaperGateway::with_defaults();
    gateway
        .push_position(OrderSide::Buy, dec!(0.55), dec!(-1.00), "HMv1|side=BUY|layer=0")
        .await;
    let notifier = RecordingNotifier::new();

    let action = limiter().enforce(&gateway, &notifier).await.unwrap();

    assert_eq!(action, RiskAction::OrdersPruned);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Exposure limit"));
}

#[tokio::test]
async fn test_volume_exactly_at_cap_is_allowed() {
    let gateway = PaperGateway::with_defaults();
    gateway
        .push_position(OrderSide::Buy, dec!(0.50), dec!(0), "HMv1|side=BUY|layer=0")
        .await;
    place_order(&gateway, 1).await;

    let action = limiter().enforce(&gateway, &NullNotifier).await.unwrap();

    assert_eq!(action, RiskAction::None);
    assert_eq!(gateway.order_book().await.len(), 1);
}
