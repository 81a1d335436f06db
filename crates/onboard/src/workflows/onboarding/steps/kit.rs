use chrono::Utc;
use tracing::info;

use crate::workflows::onboarding::domain::{KitStatus, WelcomeKit};
use crate::workflows::onboarding::engine::{EventStep, StepError};
use crate::workflows::onboarding::events::{OnboardingEvent, Topic};
use crate::workflows::onboarding::fulfillment::ShipmentRequest;
use crate::workflows::onboarding::ledger::{record_update, LedgerColumn};
use crate::workflows::onboarding::messages;
use crate::workflows::onboarding::notify::send_best_effort;
use crate::workflows::onboarding::state;
use crate::workflows::onboarding::store::RecordPatch;

use super::{timestamp_now, Collaborators};

/// Places the courier order exactly once per candidate. Redelivered
/// `details.received` events are no-ops once an order exists, whether it
/// is still in transit or already delivered.
pub struct OrderWelcomeKit {
    ctx: Collaborators,
}

impl OrderWelcomeKit {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for OrderWelcomeKit {
    fn name(&self) -> &'static str {
        "order-welcome-kit"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::DetailsReceived]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::KitOrdered]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;

        if let Some(kit) = &record.welcome_kit {
            if matches!(kit.status, KitStatus::Ordered | KitStatus::Received) {
                info!(token = %token, tracking = %kit.tracking_number, "kit already ordered; skipping");
                return Ok(Vec::new());
            }
        }

        let request = ShipmentRequest {
            token: token.clone(),
            recipient_name: record.shipping_name().to_string(),
            phone: record.details.get("mobile").cloned().unwrap_or_default(),
            address_line: record
                .details
                .get("presentAddress")
                .cloned()
                .unwrap_or_default(),
        };

        let confirmation = match self.ctx.fulfillment.order_kit(&request) {
            Ok(confirmation) => confirmation,
            Err(err) => {
                self.ctx.store.apply_patch(
                    token,
                    RecordPatch::WelcomeKit(WelcomeKit {
                        status: KitStatus::Failed,
                        tracking_number: String::new(),
                        label_url: None,
                        ordered_at: Utc::now(),
                        received_at: None,
                    }),
                )?;
                record_update(self.ctx.ledger.as_ref(), token, LedgerColumn::KitStatus, "FAILED");
                return Err(err.into());
            }
        };

        self.ctx.store.apply_patch(
            token,
            RecordPatch::WelcomeKit(WelcomeKit {
                status: KitStatus::Ordered,
                tracking_number: confirmation.tracking_number.clone(),
                label_url: confirmation.label_url.clone(),
                ordered_at: Utc::now(),
                received_at: None,
            }),
        )?;

        let out = OnboardingEvent::KitOrdered {
            token: token.clone(),
            tracking_number: confirmation.tracking_number.clone(),
            label_url: confirmation.label_url,
        };
        let next = state::apply(record.stage, &out)?;
        self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;

        record_update(self.ctx.ledger.as_ref(), token, LedgerColumn::KitStatus, "ORDERED");
        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::LastUpdate,
            &timestamp_now(),
        );

        info!(token = %token, tracking = %confirmation.tracking_number, "welcome kit ordered");
        Ok(vec![out])
    }
}

/// Shares the tracking number and the delivery-confirmation link.
pub struct SendKitDispatchedMail {
    ctx: Collaborators,
}

impl SendKitDispatchedMail {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for SendKitDispatchedMail {
    fn name(&self) -> &'static str {
        "send-kit-dispatched-mail"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::KitOrdered]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::KitDispatchedMailSent]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let OnboardingEvent::KitOrdered {
            token,
            tracking_number,
            label_url,
        } = event
        else {
            return Ok(Vec::new());
        };
        let record = self.ctx.record(token)?;
        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::kit_dispatched_mail(
                &self.ctx.settings,
                &record.name,
                &record.email,
                tracking_number,
                label_url.as_deref(),
                token,
            ),
        );
        Ok(vec![OnboardingEvent::KitDispatchedMailSent {
            token: token.clone(),
        }])
    }
}
