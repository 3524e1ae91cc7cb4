//! Basket teardown primitives
//!
//! Cancelling and closing are best-effort per record: one rejected call is
//! logged and never aborts the rest of the batch. Only the initial list
//! query can fail the whole operation.

use crate::gateway::{GatewayError, MarketGateway};

/// Delete every pending order for the symbol, returning how many succeeded
pub async fn cancel_all(
    gateway: &dyn MarketGateway,
    symbol: &str,
    tag_prefix: &str,
) -> Result<usize, GatewayError> {
    let orders = gateway.pending_orders(symbol).await?;
    let comment = format!("{tag_prefix}|remove");
    let mut cancelled = 0;

    for order in orders {
        match gateway.cancel_order(order.ticket, &comment).await {
            Ok(ack) if ack.accepted => cancelled += 1,
            Ok(ack) => {
                tracing::warn!(ticket = order.ticket, retcode = ack.retcode, "cancel rejected");
            }
            Err(error) => {
                tracing::warn!(ticket = order.ticket, %error, "cancel failed");
            }
        }
    }

    Ok(cancelled)
}

/// Close every open position for the symbol at market, returning how many succeeded
pub async fn close_all(
    gateway: &dyn MarketGateway,
    symbol: &str,
    tag_prefix: &str,
) -> Result<usize, GatewayError> {
    let positions = gateway.positions(symbol).await?;
    let comment = format!("{tag_prefix}|close_basket");
    let mut closed = 0;

    for position in positions {
        match gateway
            .close_position(position.ticket, position.volume, &comment)
            .await
        {
            Ok(ack) if ack.accepted => closed += 1,
            Ok(ack) => {
                tracing::warn!(ticket = position.ticket, retcode = ack.retcode, "close rejected");
            }
            Err(error) => {
                tracing::warn!(ticket = position.ticket, %error, "close failed");
            }
        }
    }

    Ok(closed)
}
