use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::documents::StoredFile;
use super::domain::{OfferStatus, OnboardingToken};
use super::verifier::VerificationReport;

/// Dotted topic names the pipeline fans out over. These are wire-stable:
/// they appear in logs and match the step subscriptions one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    EmployeeDataReceived,
    OfferResponseReceived,
    OfferAccepted,
    DocumentRequestSent,
    DocumentsReceived,
    FilesFetched,
    DocumentsRetry,
    FileCheckMailSent,
    VerificationPassed,
    VerificationFailed,
    VerificationPassedMailSent,
    DetailsFormSent,
    DetailsReceived,
    KitOrdered,
    KitDispatchedMailSent,
    KitReceived,
    CredentialsGenerated,
    JoiningLetterSent,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::EmployeeDataReceived => "employee.data.received",
            Topic::OfferResponseReceived => "offer.response.received",
            Topic::OfferAccepted => "offer.accepted",
            Topic::DocumentRequestSent => "document.request.sent",
            Topic::DocumentsReceived => "documents.received",
            Topic::FilesFetched => "files.fetched",
            Topic::DocumentsRetry => "documents.retry",
            Topic::FileCheckMailSent => "step1.success.sent",
            Topic::VerificationPassed => "verification.passed",
            Topic::VerificationFailed => "verification.failed",
            Topic::VerificationPassedMailSent => "verification.passed.email.sent",
            Topic::DetailsFormSent => "details.form.sent",
            Topic::DetailsReceived => "details.received",
            Topic::KitOrdered => "kit.ordered",
            Topic::KitDispatchedMailSent => "kit.dispatched.mail.sent",
            Topic::KitReceived => "kit.received",
            Topic::CredentialsGenerated => "credentials.generated",
            Topic::JoiningLetterSent => "joining.letter.sent",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed event payloads. Every variant carries the candidate token; the
/// extra fields are exactly what downstream subscribers need so they never
/// have to guess at loosely-typed maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OnboardingEvent {
    EmployeeDataReceived {
        token: OnboardingToken,
    },
    OfferResponseReceived {
        token: OnboardingToken,
        status: OfferStatus,
    },
    OfferAccepted {
        token: OnboardingToken,
    },
    DocumentRequestSent {
        token: OnboardingToken,
    },
    DocumentsReceived {
        token: OnboardingToken,
        documents: BTreeMap<String, String>,
    },
    FilesFetched {
        token: OnboardingToken,
        folder_id: String,
        files: Vec<StoredFile>,
    },
    DocumentsRetry {
        token: OnboardingToken,
        missing_files: Vec<String>,
    },
    FileCheckMailSent {
        token: OnboardingToken,
    },
    VerificationPassed {
        token: OnboardingToken,
        report: VerificationReport,
    },
    VerificationFailed {
        token: OnboardingToken,
        report: VerificationReport,
    },
    VerificationPassedMailSent {
        token: OnboardingToken,
    },
    DetailsFormSent {
        token: OnboardingToken,
    },
    DetailsReceived {
        token: OnboardingToken,
        details: BTreeMap<String, String>,
    },
    KitOrdered {
        token: OnboardingToken,
        tracking_number: String,
        label_url: Option<String>,
    },
    KitDispatchedMailSent {
        token: OnboardingToken,
    },
    KitReceived {
        token: OnboardingToken,
    },
    CredentialsGenerated {
        token: OnboardingToken,
        full_name: String,
        personal_email: String,
        work_email: String,
    },
    JoiningLetterSent {
        token: OnboardingToken,
    },
}

impl OnboardingEvent {
    pub fn topic(&self) -> Topic {
        match self {
            OnboardingEvent::EmployeeDataReceived { .. } => Topic::EmployeeDataReceived,
            OnboardingEvent::OfferResponseReceived { .. } => Topic::OfferResponseReceived,
            OnboardingEvent::OfferAccepted { .. } => Topic::OfferAccepted,
            OnboardingEvent::DocumentRequestSent { .. } => Topic::DocumentRequestSent,
            OnboardingEvent::DocumentsReceived { .. } => Topic::DocumentsReceived,
            OnboardingEvent::FilesFetched { .. } => Topic::FilesFetched,
            OnboardingEvent::DocumentsRetry { .. } => Topic::DocumentsRetry,
            OnboardingEvent::FileCheckMailSent { .. } => Topic::FileCheckMailSent,
            OnboardingEvent::VerificationPassed { .. } => Topic::VerificationPassed,
            OnboardingEvent::VerificationFailed { .. } => Topic::VerificationFailed,
            OnboardingEvent::VerificationPassedMailSent { .. } => Topic::VerificationPassedMailSent,
            OnboardingEvent::DetailsFormSent { .. } => Topic::DetailsFormSent,
            OnboardingEvent::DetailsReceived { .. } => Topic::DetailsReceived,
            OnboardingEvent::KitOrdered { .. } => Topic::KitOrdered,
            OnboardingEvent::KitDispatchedMailSent { .. } => Topic::KitDispatchedMailSent,
            OnboardingEvent::KitReceived { .. } => Topic::KitReceived,
            OnboardingEvent::CredentialsGenerated { .. } => Topic::CredentialsGenerated,
            OnboardingEvent::JoiningLetterSent { .. } => Topic::JoiningLetterSent,
        }
    }

    pub fn token(&self) -> &OnboardingToken {
        match self {
            OnboardingEvent::EmployeeDataReceived { token }
            | OnboardingEvent::OfferResponseReceived { token, .. }
            | OnboardingEvent::OfferAccepted { token }
            | OnboardingEvent::DocumentRequestSent { token }
            | OnboardingEvent::DocumentsReceived { token, .. }
            | OnboardingEvent::FilesFetched { token, .. }
            | OnboardingEvent::DocumentsRetry { token, .. }
            | OnboardingEvent::FileCheckMailSent { token }
            | OnboardingEvent::VerificationPassed { token, .. }
            | OnboardingEvent::VerificationFailed { token, .. }
            | OnboardingEvent::VerificationPassedMailSent { token }
            | OnboardingEvent::DetailsFormSent { token }
            | OnboardingEvent::DetailsReceived { token, .. }
            | OnboardingEvent::KitOrdered { token, .. }
            | OnboardingEvent::KitDispatchedMailSent { token }
            | OnboardingEvent::KitReceived { token }
            | OnboardingEvent::CredentialsGenerated { token, .. }
            | OnboardingEvent::JoiningLetterSent { token } => token,
        }
    }
}
