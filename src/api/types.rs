//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::sim::market::TradeSide;

/// Body of `POST /market/trade`.
#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    /// Number of credits to trade. Must be a finite, positive number.
    pub amount: f64,
    /// Trade direction.
    pub side: TradeSide,
}

/// Acknowledgement for accepted command requests.
///
/// Commands apply on the next tick; callers observe the effect through the
/// read endpoints.
#[derive(Debug, Serialize)]
pub struct CommandAck {
    /// Always `"queued"`.
    pub status: &'static str,
}

impl CommandAck {
    pub fn queued() -> Self {
        Self { status: "queued" }
    }
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_request_parses_lowercase_side() {
        let body = r#"{ "amount": 2.5, "side": "buy" }"#;
        let req: TradeRequest = serde_json::from_str(body).expect("body should parse");
        assert_eq!(req.amount, 2.5);
        assert_eq!(req.side, TradeSide::Buy);
    }

    #[test]
    fn command_ack_serializes_status() {
        let json = serde_json::to_string(&CommandAck::queued()).ok();
        assert_eq!(json.as_deref(), Some(r#"{"status":"queued"}"#));
    }
}
