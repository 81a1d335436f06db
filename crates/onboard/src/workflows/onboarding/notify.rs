use tracing::warn;

use super::domain::OnboardingToken;

/// One outbound mail. Plain text only; rendering and delivery live behind
/// the `Notifier` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub token: OnboardingToken,
}

/// Fire-and-forget mail gateway.
pub trait Notifier: Send + Sync {
    fn send(&self, message: OutboundMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("recipient address '{0}' rejected")]
    BadRecipient(String),
}

/// Mail is never load-bearing: log the failure and move on.
pub fn send_best_effort(notifier: &dyn Notifier, message: OutboundMessage) {
    let token = message.token.clone();
    let subject = message.subject.clone();
    if let Err(err) = notifier.send(message) {
        warn!(token = %token, subject = %subject, error = %err, "mail send failed; continuing");
    }
}
