use tracing::info;

use crate::workflows::onboarding::domain::OfferStatus;
use crate::workflows::onboarding::engine::{EventStep, StepError};
use crate::workflows::onboarding::events::{OnboardingEvent, Topic};
use crate::workflows::onboarding::ledger::{record_update, LedgerColumn};
use crate::workflows::onboarding::messages;
use crate::workflows::onboarding::notify::send_best_effort;
use crate::workflows::onboarding::state;
use crate::workflows::onboarding::store::RecordPatch;

use super::{timestamp_now, Collaborators};

/// Mails the offer letter with accept/decline links once intake lands.
pub struct SendOfferMail {
    ctx: Collaborators,
}

impl SendOfferMail {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for SendOfferMail {
    fn name(&self) -> &'static str {
        "send-offer-mail"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::EmployeeDataReceived]
    }

    fn emits(&self) -> &'static [Topic] {
        &[]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;

        let next = state::apply(record.stage, event)?;
        self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;

        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::offer_mail(
                &self.ctx.settings,
                &record.name,
                &record.email,
                &record.role,
                &record.package,
                token,
            ),
        );
        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::LastUpdate,
            &timestamp_now(),
        );

        info!(token = %token, "offer letter sent");
        Ok(Vec::new())
    }
}

/// Branches on the candidate's decision: accepted offers continue the
/// pipeline, declines notify HR and stop.
pub struct ProcessOfferResponse {
    ctx: Collaborators,
}

impl ProcessOfferResponse {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for ProcessOfferResponse {
    fn name(&self) -> &'static str {
        "process-offer-response"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::OfferResponseReceived]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::OfferAccepted]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let OnboardingEvent::OfferResponseReceived { token, status } = event else {
            return Ok(Vec::new());
        };

        match status {
            OfferStatus::Accepted => Ok(vec![OnboardingEvent::OfferAccepted {
                token: token.clone(),
            }]),
            OfferStatus::Rejected => {
                let record = self.ctx.record(token)?;
                send_best_effort(
                    self.ctx.notifier.as_ref(),
                    messages::decline_acknowledgment_mail(&record.name, &record.email, token),
                );
                send_best_effort(
                    self.ctx.notifier.as_ref(),
                    messages::decline_hr_notice(
                        &self.ctx.settings,
                        &record.name,
                        &record.email,
                        token,
                    ),
                );
                info!(token = %token, "offer declined; pipeline stopped");
                Ok(Vec::new())
            }
            OfferStatus::Pending => Ok(Vec::new()),
        }
    }
}

/// Congratulates the candidate after acceptance.
pub struct SendAcceptanceMail {
    ctx: Collaborators,
}

impl SendAcceptanceMail {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for SendAcceptanceMail {
    fn name(&self) -> &'static str {
        "send-acceptance-mail"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::OfferAccepted]
    }

    fn emits(&self) -> &'static [Topic] {
        &[]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;
        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::acceptance_mail(&record.name, &record.email, token),
        );
        Ok(Vec::new())
    }
}

/// Asks for the onboarding documents and moves the record into the
/// documents-requested stage.
pub struct SendDocumentRequest {
    ctx: Collaborators,
}

impl SendDocumentRequest {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for SendDocumentRequest {
    fn name(&self) -> &'static str {
        "send-document-request"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::OfferAccepted]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::DocumentRequestSent]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;

        let out = OnboardingEvent::DocumentRequestSent {
            token: token.clone(),
        };
        let next = state::apply(record.stage, &out)?;
        self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;

        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::document_request_mail(&self.ctx.settings, &record.name, &record.email, token),
        );
        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::DocumentLink,
            "SENT",
        );
        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::LastUpdate,
            &timestamp_now(),
        );

        Ok(vec![out])
    }
}
