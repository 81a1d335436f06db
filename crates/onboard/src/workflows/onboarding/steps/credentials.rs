use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use serde_json::json;
use tracing::info;

use crate::workflows::onboarding::credentials::{derive_work_email, generate_password};
use crate::workflows::onboarding::domain::WorkCredentials;
use crate::workflows::onboarding::engine::{EventStep, StepError};
use crate::workflows::onboarding::events::{OnboardingEvent, Topic};
use crate::workflows::onboarding::ledger::{record_update, LedgerColumn};
use crate::workflows::onboarding::messages;
use crate::workflows::onboarding::notify::send_best_effort;
use crate::workflows::onboarding::state;
use crate::workflows::onboarding::store::RecordPatch;

use super::{timestamp_now, Collaborators};

const JOINING_OFFSET_DAYS: i64 = 3;

/// Issues the work account exactly once per candidate. A redelivered
/// `kit.received` finds the credentials already set and does nothing.
pub struct GenerateWorkCredentials {
    ctx: Collaborators,
}

impl GenerateWorkCredentials {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for GenerateWorkCredentials {
    fn name(&self) -> &'static str {
        "generate-work-credentials"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::KitReceived]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::CredentialsGenerated]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;

        if let Some(existing) = &record.work_credentials {
            info!(token = %token, work_email = %existing.work_email, "credentials already issued; skipping");
            return Ok(Vec::new());
        }

        let work_email = derive_work_email(&record.name, &self.ctx.settings.company_domain);
        let initial_password = generate_password();
        let credentials = WorkCredentials {
            work_email: work_email.clone(),
            initial_password: initial_password.clone(),
            generated_at: Utc::now(),
        };
        self.ctx
            .store
            .apply_patch(token, RecordPatch::Credentials(credentials))?;

        let out = OnboardingEvent::CredentialsGenerated {
            token: token.clone(),
            full_name: record.name.clone(),
            personal_email: record.email.clone(),
            work_email: work_email.clone(),
        };
        let next = state::apply(record.stage, &out)?;
        self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;

        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::credentials_mail(
                &record.name,
                &record.email,
                &work_email,
                &initial_password,
                token,
            ),
        );
        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::LastUpdate,
            &timestamp_now(),
        );

        info!(token = %token, %work_email, "work credentials generated");
        Ok(vec![out])
    }
}

/// Final step: joining letter to the candidate, completion notice to HR.
pub struct SendJoiningLetter {
    ctx: Collaborators,
}

impl SendJoiningLetter {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for SendJoiningLetter {
    fn name(&self) -> &'static str {
        "send-joining-letter"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::CredentialsGenerated]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::JoiningLetterSent]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let OnboardingEvent::CredentialsGenerated {
            token,
            full_name,
            personal_email,
            work_email,
        } = event
        else {
            return Ok(Vec::new());
        };
        let record = self.ctx.record(token)?;

        let joining_date = (Utc::now() + Duration::days(JOINING_OFFSET_DAYS)).date_naive();

        let out = OnboardingEvent::JoiningLetterSent {
            token: token.clone(),
        };
        let next = state::apply(record.stage, &out)?;
        self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;

        let mut scratch = BTreeMap::new();
        scratch.insert("completed_at".to_string(), json!(timestamp_now()));
        self.ctx
            .store
            .apply_patch(token, RecordPatch::OcrData(scratch))?;

        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::joining_letter_mail(full_name, personal_email, work_email, joining_date, token),
        );
        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::onboarding_complete_hr_notice(
                &self.ctx.settings,
                full_name,
                work_email,
                joining_date,
                token,
            ),
        );

        record_update(self.ctx.ledger.as_ref(), token, LedgerColumn::JoiningLetter, "SENT");
        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::JoiningDate,
            &joining_date.format("%B %d, %Y").to_string(),
        );
        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::LastUpdate,
            &timestamp_now(),
        );

        info!(token = %token, %joining_date, "joining letter sent; onboarding complete");
        Ok(vec![out])
    }
}
