use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::Stage;

/// Opaque reference a candidate carries through every link in the pipeline.
/// Minted once at intake and never reissued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OnboardingToken(pub String);

impl OnboardingToken {
    pub fn mint() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OnboardingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One-shot offer decision. Once it leaves `Pending` it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "PENDING",
            OfferStatus::Accepted => "ACCEPTED",
            OfferStatus::Rejected => "REJECTED",
        }
    }
}

/// Outcome of the document checks, tracked separately from the offer
/// decision so a failed content check never rewrites an accepted offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    NotStarted,
    FilesValidated,
    Passed,
    Failed,
}

impl VerificationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotStarted => "NOT_STARTED",
            VerificationStatus::FilesValidated => "FILES_VALIDATED",
            VerificationStatus::Passed => "PASSED",
            VerificationStatus::Failed => "FAILED",
        }
    }
}

/// Binary result of a document check level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckOutcome {
    Pass,
    Fail,
}

impl CheckOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::Pass => "PASS",
            CheckOutcome::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitStatus {
    Ordered,
    Failed,
    Received,
}

impl KitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            KitStatus::Ordered => "ORDERED",
            KitStatus::Failed => "FAILED",
            KitStatus::Received => "RECEIVED",
        }
    }
}

/// Welcome-kit shipment as last reported by fulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeKit {
    pub status: KitStatus,
    pub tracking_number: String,
    pub label_url: Option<String>,
    pub ordered_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}

/// Company account issued once the kit is confirmed delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCredentials {
    pub work_email: String,
    pub initial_password: String,
    pub generated_at: DateTime<Utc>,
}

/// Intake payload for a new hire. All four fields are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: String,
    pub package: String,
}

impl NewEmployee {
    /// Returns the name of the first empty field, if any.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else if self.role.trim().is_empty() {
            Some("role")
        } else if self.package.trim().is_empty() {
            Some("package")
        } else {
            None
        }
    }
}

/// Authoritative per-candidate record. The store owns it; the ledger only
/// mirrors it for HR visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub token: OnboardingToken,
    pub name: String,
    pub email: String,
    pub role: String,
    pub package: String,
    pub offer_status: OfferStatus,
    pub verification_status: VerificationStatus,
    pub stage: Stage,
    pub documents: BTreeMap<String, String>,
    pub ocr_data: BTreeMap<String, serde_json::Value>,
    pub details: BTreeMap<String, String>,
    pub welcome_kit: Option<WelcomeKit>,
    pub work_credentials: Option<WorkCredentials>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeRecord {
    pub fn new(token: OnboardingToken, intake: NewEmployee) -> Self {
        Self {
            token,
            name: intake.name,
            email: intake.email,
            role: intake.role,
            package: intake.package,
            offer_status: OfferStatus::Pending,
            verification_status: VerificationStatus::NotStarted,
            stage: Stage::IntakeReceived,
            documents: BTreeMap::new(),
            ocr_data: BTreeMap::new(),
            details: BTreeMap::new(),
            welcome_kit: None,
            work_credentials: None,
            updated_at: Utc::now(),
        }
    }

    /// Name the courier label should carry: the details form wins over the
    /// intake name when the candidate filled it in.
    pub fn shipping_name(&self) -> &str {
        self.details
            .get("fullName")
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.name)
    }
}
