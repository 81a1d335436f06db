use std::collections::BTreeMap;

use serde_json::json;
use tracing::info;

use crate::workflows::onboarding::documents::{
    missing_documents, parse_folder_ref, FolderRef, REQUIRED_DOCUMENTS,
};
use crate::workflows::onboarding::domain::VerificationStatus;
use crate::workflows::onboarding::engine::{EventStep, StepError};
use crate::workflows::onboarding::events::{OnboardingEvent, Topic};
use crate::workflows::onboarding::ledger::{record_update, LedgerColumn};
use crate::workflows::onboarding::messages;
use crate::workflows::onboarding::notify::send_best_effort;
use crate::workflows::onboarding::state;
use crate::workflows::onboarding::store::RecordPatch;

use super::{timestamp_now, Collaborators};

/// Level-one check: list the shared folder and compare against the required
/// upload set. Complete folders move on to content verification; anything
/// else loops back through a resubmission request.
pub struct CheckSubmittedFiles {
    ctx: Collaborators,
}

impl CheckSubmittedFiles {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }

    fn folder_from(documents: &BTreeMap<String, String>) -> Option<FolderRef> {
        documents.values().find_map(|link| parse_folder_ref(link))
    }
}

impl EventStep for CheckSubmittedFiles {
    fn name(&self) -> &'static str {
        "check-submitted-files"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::DocumentsReceived]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::FilesFetched, Topic::DocumentsRetry]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;

        let Some(folder) = Self::folder_from(&record.documents) else {
            // No parseable folder link at all: ask for everything again.
            let missing: Vec<String> =
                REQUIRED_DOCUMENTS.iter().map(|name| name.to_string()).collect();
            let out = OnboardingEvent::DocumentsRetry {
                token: token.clone(),
                missing_files: missing.clone(),
            };
            let next = state::apply(record.stage, &out)?;
            self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;

            let mut scratch = BTreeMap::new();
            scratch.insert("status".to_string(), json!("LEVEL1_FAILED"));
            scratch.insert("missing_files".to_string(), json!(missing));
            self.ctx
                .store
                .apply_patch(token, RecordPatch::OcrData(scratch))?;

            record_update(self.ctx.ledger.as_ref(), token, LedgerColumn::FileCheck, "FAIL");
            info!(token = %token, "no shared folder link found in submission");
            return Ok(vec![out]);
        };

        let files = self.ctx.fetcher.list_folder(&folder)?;
        let missing = missing_documents(&files);

        if missing.is_empty() {
            let out = OnboardingEvent::FilesFetched {
                token: token.clone(),
                folder_id: folder.0.clone(),
                files: files.clone(),
            };
            let next = state::apply(record.stage, &out)?;
            self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;
            self.ctx.store.apply_patch(
                token,
                RecordPatch::Verification(VerificationStatus::FilesValidated),
            )?;

            let mut scratch = BTreeMap::new();
            scratch.insert("status".to_string(), json!("LEVEL1_PASSED"));
            scratch.insert("drive_files_found".to_string(), json!(files));
            scratch.insert("missing_files".to_string(), json!([]));
            self.ctx
                .store
                .apply_patch(token, RecordPatch::OcrData(scratch))?;

            record_update(self.ctx.ledger.as_ref(), token, LedgerColumn::FileCheck, "PASS");
            record_update(
                self.ctx.ledger.as_ref(),
                token,
                LedgerColumn::LastUpdate,
                &timestamp_now(),
            );
            info!(token = %token, files = files.len(), "all required documents present");
            Ok(vec![out])
        } else {
            let out = OnboardingEvent::DocumentsRetry {
                token: token.clone(),
                missing_files: missing.clone(),
            };
            let next = state::apply(record.stage, &out)?;
            self.ctx.store.apply_patch(token, RecordPatch::Stage(next))?;

            let mut scratch = BTreeMap::new();
            scratch.insert("status".to_string(), json!("LEVEL1_FAILED"));
            scratch.insert("missing_files".to_string(), json!(missing));
            self.ctx
                .store
                .apply_patch(token, RecordPatch::OcrData(scratch))?;

            record_update(self.ctx.ledger.as_ref(), token, LedgerColumn::FileCheck, "FAIL");
            info!(token = %token, missing = missing.len(), "documents missing; requesting resubmission");
            Ok(vec![out])
        }
    }
}

/// Tells the candidate the folder passed the listing check.
pub struct SendFileCheckSuccessMail {
    ctx: Collaborators,
}

impl SendFileCheckSuccessMail {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for SendFileCheckSuccessMail {
    fn name(&self) -> &'static str {
        "send-file-check-success-mail"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::FilesFetched]
    }

    fn emits(&self) -> &'static [Topic] {
        &[Topic::FileCheckMailSent]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let token = event.token();
        let record = self.ctx.record(token)?;
        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::file_check_success_mail(&record.name, &record.email, token),
        );
        Ok(vec![OnboardingEvent::FileCheckMailSent {
            token: token.clone(),
        }])
    }
}

/// Lists the missing files and points the candidate back at the upload form.
pub struct SendResubmissionRequest {
    ctx: Collaborators,
}

impl SendResubmissionRequest {
    pub fn new(ctx: Collaborators) -> Self {
        Self { ctx }
    }
}

impl EventStep for SendResubmissionRequest {
    fn name(&self) -> &'static str {
        "send-resubmission-request"
    }

    fn subscriptions(&self) -> &'static [Topic] {
        &[Topic::DocumentsRetry]
    }

    fn emits(&self) -> &'static [Topic] {
        &[]
    }

    fn handle(&self, event: &OnboardingEvent) -> Result<Vec<OnboardingEvent>, StepError> {
        let OnboardingEvent::DocumentsRetry {
            token,
            missing_files,
        } = event
        else {
            return Ok(Vec::new());
        };
        let record = self.ctx.record(token)?;
        send_best_effort(
            self.ctx.notifier.as_ref(),
            messages::resubmission_mail(
                &self.ctx.settings,
                &record.name,
                &record.email,
                missing_files,
                token,
            ),
        );
        Ok(Vec::new())
    }
}
