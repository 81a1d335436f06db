//! The event-triggered pipeline steps, one module per phase. Registration
//! order in `standard_steps` follows the phases a candidate moves through,
//! though dispatch never depends on it.

mod credentials;
mod details;
mod documents;
mod kit;
mod offer;
mod verification;

use std::sync::Arc;

use chrono::Utc;

use crate::config::OnboardingConfig;

use super::domain::{EmployeeRecord, OnboardingToken};
use super::documents::DocumentFetcher;
use super::engine::{EventStep, StepError};
use super::fulfillment::FulfillmentService;
use super::ledger::AuditLedger;
use super::notify::Notifier;
use super::store::{RecordStore, StoreError};
use super::verifier::ContentVerifier;

pub use credentials::{GenerateWorkCredentials, SendJoiningLetter};
pub use details::SendDetailsForm;
pub use documents::{CheckSubmittedFiles, SendFileCheckSuccessMail, SendResubmissionRequest};
pub use kit::{OrderWelcomeKit, SendKitDispatchedMail};
pub use offer::{ProcessOfferResponse, SendAcceptanceMail, SendDocumentRequest, SendOfferMail};
pub use verification::{HandleVerificationFailed, HandleVerificationPassed, VerifyDocumentContent};

/// Shared handles every step works through. Cloning is cheap; the trait
/// objects are shared with the HTTP service.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn RecordStore>,
    pub ledger: Arc<dyn AuditLedger>,
    pub notifier: Arc<dyn Notifier>,
    pub fetcher: Arc<dyn DocumentFetcher>,
    pub verifier: Arc<dyn ContentVerifier>,
    pub fulfillment: Arc<dyn FulfillmentService>,
    pub settings: OnboardingConfig,
}

impl Collaborators {
    /// Loads the record or halts the step; every handler starts here.
    pub(crate) fn record(&self, token: &OnboardingToken) -> Result<EmployeeRecord, StepError> {
        self.store
            .find(token)?
            .ok_or(StepError::Store(StoreError::NotFound))
    }
}

pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}

/// The full pipeline, in the order the phases run.
pub fn standard_steps(ctx: Collaborators) -> Vec<Arc<dyn EventStep>> {
    vec![
        Arc::new(SendOfferMail::new(ctx.clone())),
        Arc::new(ProcessOfferResponse::new(ctx.clone())),
        Arc::new(SendAcceptanceMail::new(ctx.clone())),
        Arc::new(SendDocumentRequest::new(ctx.clone())),
        Arc::new(CheckSubmittedFiles::new(ctx.clone())),
        Arc::new(SendFileCheckSuccessMail::new(ctx.clone())),
        Arc::new(SendResubmissionRequest::new(ctx.clone())),
        Arc::new(VerifyDocumentContent::new(ctx.clone())),
        Arc::new(HandleVerificationPassed::new(ctx.clone())),
        Arc::new(HandleVerificationFailed::new(ctx.clone())),
        Arc::new(SendDetailsForm::new(ctx.clone())),
        Arc::new(OrderWelcomeKit::new(ctx.clone())),
        Arc::new(SendKitDispatchedMail::new(ctx.clone())),
        Arc::new(GenerateWorkCredentials::new(ctx.clone())),
        Arc::new(SendJoiningLetter::new(ctx)),
    ]
}
