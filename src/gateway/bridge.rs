//! REST bridge gateway
//!
//! Talks to an MT5 HTTP bridge sitting next to the terminal. The bridge
//! exposes the terminal's session, quote, account and trade endpoints as
//! plain JSON; one [`BridgeGateway`] owns one logged-in session and is
//! dropped at the end of the cycle.

use super::{
    AccountSnapshot, GatewayError, MarketGateway, OrderAck, PendingOrder, Position, Quote,
    StopOrderRequest, SymbolMeta, Ticket,
};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the bridge connection
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the bridge, e.g. `http://127.0.0.1:6542`
    pub base_url: String,
    /// Broker account number
    pub login: u64,
    /// Broker account password
    pub password: String,
    /// Broker server name
    pub server: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    login: u64,
    password: &'a str,
    server: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct ApiError {
    code: i32,
    message: String,
}

#[derive(Serialize)]
struct CloseRequest<'a> {
    ticket: Ticket,
    volume: Decimal,
    comment: &'a str,
}

#[derive(Serialize)]
struct CancelRequest<'a> {
    ticket: Ticket,
    comment: &'a str,
}

/// Live gateway backed by the MT5 HTTP bridge
pub struct BridgeGateway {
    base_url: String,
    client: Client,
    token: String,
}

impl BridgeGateway {
    /// Open a session against the bridge
    pub async fn login(config: &BridgeConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GatewayError::Transport)?;

        let url = format!("{}/login", config.base_url);
        tracing::debug!(url = %url, login = config.login, "logging in to bridge");

        let response = client
            .post(&url)
            .json(&LoginRequest {
                login: config.login,
                password: &config.password,
                server: &config.server,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Login(format!("{status}: {body}")));
        }

        let session: LoginResponse = response.json().await?;
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
            token: session.token,
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        if response.status().is_success() {
            return Ok(response.json().await?);
        }
        let status = response.status();
        match response.json::<ApiError>().await {
            Ok(err) => Err(GatewayError::Api {
                code: err.code,
                message: err.message,
            }),
            Err(_) => Err(GatewayError::Api {
                code: status.as_u16() as i32,
                message: status.to_string(),
            }),
        }
    }
}

#[async_trait]
impl MarketGateway for BridgeGateway {
    async fn quote(&self, symbol: &str) -> Result<Quote, GatewayError> {
        let quote: Option<Quote> = self.get_json(&format!("/quote/{symbol}")).await?;
        quote.ok_or_else(|| GatewayError::MissingData(format!("no tick for {symbol}")))
    }

    async fn symbol_meta(&self, symbol: &str) -> Result<SymbolMeta, GatewayError> {
        let meta: Option<SymbolMeta> = self.get_json(&format!("/symbol/{symbol}")).await?;
        let meta =
            meta.ok_or_else(|| GatewayError::MissingData(format!("no symbol info for {symbol}")))?;
        if meta.pip() <= Decimal::ZERO {
            return Err(GatewayError::MissingData(format!(
                "non-positive pip for {symbol}"
            )));
        }
        Ok(meta)
    }

    async fn account(&self) -> Result<AccountSnapshot, GatewayError> {
        self.get_json("/account").await
    }

    async fn positions(&self, symbol: &str) -> Result<Vec<Position>, GatewayError> {
        self.get_json(&format!("/positions?symbol={symbol}")).await
    }

    async fn pending_orders(&self, symbol: &str) -> Result<Vec<PendingOrder>, GatewayError> {
        self.get_json(&format!("/orders?symbol={symbol}")).await
    }

    async fn place_stop_order(&self, request: &StopOrderRequest) -> Result<OrderAck, GatewayError> {
        tracing::debug!(
            symbol = %request.symbol,
            side = %request.side,
            price = %request.price,
            volume = %request.volume,
            "placing stop via bridge"
        );
        self.post_json("/order/stop", request).await
    }

    async fn close_position(
        &self,
        ticket: Ticket,
        volume: Decimal,
        comment: &str,
    ) -> Result<OrderAck, GatewayError> {
        self.post_json(
            "/position/close",
            &CloseRequest {
                ticket,
                volume,
                comment,
            },
        )
        .await
    }

    async fn cancel_order(&self, ticket: Ticket, comment: &str) -> Result<OrderAck, GatewayError> {
        self.post_json("/order/cancel", &CancelRequest { ticket, comment })
            .await
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        let url = format!("{}/logout", self.base_url);
        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::OrderSide;

    #[test]
    fn test_bridge_config_defaults() {
        let toml = r#"
            base_url = "http://127.0.0.1:6542"
            login = 520002796
            password = "secret"
            server = "Demo-Server"
        "#;
        let config: BridgeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.login, 520002796);
    }

    #[test]
    fn test_stop_order_request_wire_shape() {
        let request = StopOrderRequest {
            symbol: "USDJPY".to_string(),
            side: OrderSide::Buy,
            price: Decimal::new(147220, 3),
            volume: Decimal::new(1, 2),
            comment: "HMv1|side=BUY|layer=0".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["side"], "BUY");
        assert_eq!(json["comment"], "HMv1|side=BUY|layer=0");
    }
}
