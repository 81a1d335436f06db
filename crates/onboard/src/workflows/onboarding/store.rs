use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::domain::{
    EmployeeRecord, NewEmployee, OfferStatus, OnboardingToken, VerificationStatus, WelcomeKit,
    WorkCredentials,
};
use super::state::Stage;

/// Field-group scoped mutation. Writers of different groups cannot clobber
/// each other; map variants merge into the existing entries.
#[derive(Debug, Clone)]
pub enum RecordPatch {
    Offer(OfferStatus),
    Stage(Stage),
    Verification(VerificationStatus),
    Documents(BTreeMap<String, String>),
    OcrData(BTreeMap<String, serde_json::Value>),
    Details(BTreeMap<String, String>),
    WelcomeKit(WelcomeKit),
    KitReceived { at: DateTime<Utc> },
    Credentials(WorkCredentials),
}

/// The authoritative record store. Every pipeline decision reads and writes
/// here first; ledger and mail are downstream of a successful store write.
pub trait RecordStore: Send + Sync {
    /// Validates the intake fields, mints a token, and persists the record.
    fn create(&self, intake: NewEmployee) -> Result<EmployeeRecord, StoreError>;
    fn find(&self, token: &OnboardingToken) -> Result<Option<EmployeeRecord>, StoreError>;
    fn apply_patch(
        &self,
        token: &OnboardingToken,
        patch: RecordPatch,
    ) -> Result<EmployeeRecord, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
    #[error("record not found")]
    NotFound,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Merges a patch into a record. Store implementations call this so the
/// merge semantics live in one place.
pub fn merge_patch(record: &mut EmployeeRecord, patch: RecordPatch) {
    match patch {
        RecordPatch::Offer(status) => record.offer_status = status,
        RecordPatch::Stage(stage) => record.stage = stage,
        RecordPatch::Verification(status) => record.verification_status = status,
        RecordPatch::Documents(entries) => record.documents.extend(entries),
        RecordPatch::OcrData(entries) => record.ocr_data.extend(entries),
        RecordPatch::Details(entries) => record.details.extend(entries),
        RecordPatch::WelcomeKit(kit) => record.welcome_kit = Some(kit),
        RecordPatch::KitReceived { at } => match record.welcome_kit.as_mut() {
            Some(kit) => {
                kit.status = super::domain::KitStatus::Received;
                kit.received_at = Some(at);
            }
            None => {
                record.welcome_kit = Some(WelcomeKit {
                    status: super::domain::KitStatus::Received,
                    tracking_number: String::new(),
                    label_url: None,
                    ordered_at: at,
                    received_at: Some(at),
                });
            }
        },
        RecordPatch::Credentials(credentials) => record.work_credentials = Some(credentials),
    }
    record.updated_at = Utc::now();
}
