use crate::workflows::onboarding::engine::{EventStep, StepError};
use crate::workflows::onboarding::events::{OnboardingEvent, Topic};
use crate::workflows::onboarding::ledger::{record_update, LedgerColumn};
use crate::workflows::onboarding::messages;
use crate::workflows::onboarding::notify::send_best_effort;
use crate::workflows::onboarding::state;
use crate::workflows::onboarding::store::RecordPatch;

use super::{timestamp_now, Collaborators};

/// Once verification is confirmed to the candidate, asks for the shipping
/// details the welcome kit needs.
pub struct SendDetailsForm {
    ctx: Collaborators,
}

impl SendDetailsForm {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for SendDetailsForm {
    fn name(&self) -> &'static str {
        "send-details-form"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::VerificationPassedMailSent]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::DetailsFormSent]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;

        let out = OnboardingEvent::DetailsFormSent {
            token: token.clone(),
        };
        let next = state::apply(record.stage, &out)?;
        self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;

        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::details_form_mail(&self.ctx.settings, &record.name, &record.email, token),
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
