use std::collections::BTreeMap;

use serde_json::json;
use tracing::info;

use crate::workflows::onboarding::documents::StoredFile;
use crate::workflows::onboarding::domain::{CheckOutcome, VerificationStatus};
use crate::workflows::onboarding::engine::{EventStep, StepError};
use crate::workflows::onboarding::events::{OnboardingEvent, Topic};
use crate::workflows::onboarding::ledger::{record_update, LedgerColumn};
use crate::workflows::onboarding::messages;
use crate::workflows::onboarding::notify::send_best_effort;
use crate::workflows::onboarding::state;
use crate::workflows::onboarding::store::RecordPatch;
use crate::workflows::onboarding::verifier::VerificationRequest;

use super::{timestamp_now, Collaborators};

/// Level-two check: run the content verifier over the fetched files and
/// branch on the report.
pub struct VerifyDocumentContent {
    ctx: Collaborators,
}

impl VerifyDocumentContent {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for VerifyDocumentContent {
    fn name(&self) -> &'static str {
        "verify-document-content"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::FileCheckMailSent]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::VerificationPassed, Topic::VerificationFailed]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;

        let files: Vec<StoredFile> = record
            .ocr_data
            .get("drive_files_found")
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .ok_or_else(|| {
                StepError::Halted("no fetched file listing on record".to_string())
            })?;

        let report = self.ctx.verifier.verify(&VerificationRequest {
            token: token.clone(),
            candidate_name: record.name.clone(),
            files,
        })?;

        let mut scratch = BTreeMap::new();
        scratch.insert("verifier_report".to_string(), json!(report));
        scratch.insert("processed".to_string(), json!(true));
        if let Some(name) = &report.extracted_name {
            scratch.insert("extracted_name".to_string(), json!(name));
        }
        if let Some(aadhaar) = &report.aadhaar_number {
            scratch.insert("extracted_aadhaar".to_string(), json!(aadhaar));
        }
        if let Some(pan) = &report.pan_number {
            scratch.insert("extracted_pan".to_string(), json!(pan));
        }

        let passed = report.status == CheckOutcome::Pass;
        scratch.insert(
            "status".to_string(),
            json!(if passed { "LEVEL2_PASSED" } else { "LEVEL2_FAILED" }),
        );
        self.ctx
            .store
            .apply_patch(token, RecordPatch::OcrData(scratch))?;

        let out = if passed {
            OnboardingEvent::VerificationPassed {
                token: token.clone(),
                report,
            }
        } else {
            OnboardingEvent::VerificationFailed {
                token: token.clone(),
                report,
            }
        };
        let next = state::apply(record.stage, &out)?;
        self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;
        self.ctx.store.apply_patch(
            token,
            RecordPatch::Verification(if passed {
                VerificationStatus::Passed
            } else {
                VerificationStatus::Failed
            }),
        )?;

        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::ContentCheck,
            if passed { "PASS" } else { "FAIL" },
        );
        record_update(
            self.ctx.ledger.as_ref(),
            token,
            LedgerColumn::LastUpdate,
            &timestamp_now(),
        );

        info!(token = %token, passed, "content verification finished");
        Ok(vec![out])
    }
}

/// Sends the verification-success mail and hands over to the details phase.
pub struct HandleVerificationPassed {
    ctx: Collaborators,
}

impl HandleVerificationPassed {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for HandleVerificationPassed {
    fn name(&self) -> &'static str {
        "handle-verification-passed"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::VerificationPassed]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::VerificationPassedMailSent]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;
        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::verification_passed_mail(&record.name, &record.email, token),
        );
        Ok(vec![OnboardingEvent::VerificationPassedMailSent {
            token: token.clone(),
        }])
    }
}

/// Explains what failed and asks for corrected documents.
pub struct HandleVerificationFailed {
    ctx: Collaborators,
}

impl HandleVerificationFailed {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for HandleVerificationFailed {
    fn name(&self) -> &'static str {
        "handle-verification-failed"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::VerificationFailed]
    }

    fn emits(&self) -> &'static [Topic] {
        &[]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let OnboardingEvent::VerificationFailed { token, report } = event else {
            return Ok(Vec::new());
        };
        let record = self.ctx.record(token)?;
        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::verification_failed_mail(
                &self.ctx.settings,
                &record.name,
                &record.email,
                &report.issues(),
                token,
            ),
        );
        Ok(Vec::new())
    }
}
