use super::domain::OnboardingToken;

/// Courier order for the welcome kit.
#[derive(Debug, Clone)]
pub struct ShipmentRequest {
    pub token: OnboardingToken,
    pub recipient_name: String,
    pub phone: String,
    pub address_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentConfirmation {
    pub tracking_number: String,
    pub label_url: Option<String>,
}

/// External fulfillment boundary. One call per candidate; the idempotency
/// guard lives in the ordering step, not here.
pub trait FulfillmentService: Send + Sync {
    fn order_kit(&self, request: &ShipmentRequest) -> Result<ShipmentConfirmation, FulfillmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FulfillmentError {
    #[error("shipment rejected: {0}")]
    Rejected(String),
    #[error("fulfillment provider unavailable: {0}")]
    Transport(String),
}
