use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::OnboardingToken;

/// Columns the HR tracking sheet keeps per candidate. The identity columns
/// are written once by `append_row`; these are the ones updated in place as
/// the pipeline advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerColumn {
    LastUpdate,
    OfferStatus,
    DocumentLink,
    LinkReceived,
    FileCheck,
    ContentCheck,
    DetailsReceived,
    KitStatus,
    KitReceived,
    JoiningLetter,
    JoiningDate,
}

impl LedgerColumn {
    pub fn heading(&self) -> &'static str {
        match self {
            LedgerColumn::LastUpdate => "Last Update",
            LedgerColumn::OfferStatus => "Offer Status",
            LedgerColumn::DocumentLink => "Document Link",
            LedgerColumn::LinkReceived => "Link Received",
            LedgerColumn::FileCheck => "Level 1 File Check",
            LedgerColumn::ContentCheck => "Level 2 Content Check",
            LedgerColumn::DetailsReceived => "Level 3 Details",
            LedgerColumn::KitStatus => "Kit Status",
            LedgerColumn::KitReceived => "Kit Received",
            LedgerColumn::JoiningLetter => "Joining Letter",
            LedgerColumn::JoiningDate => "Joining Date",
        }
    }
}

/// Identity row appended at intake.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub token: OnboardingToken,
    pub name: String,
    pub submitted_at: DateTime<Utc>,
    pub email: String,
    pub role: String,
    pub package: String,
    pub offer_status: String,
}

/// Best-effort audit surface for HR. Never authoritative: a failed ledger
/// write must not fail the pipeline, so callers go through the
/// `record_append`/`record_update` helpers which log and swallow.
pub trait AuditLedger: Send + Sync {
    fn append_row(&self, row: LedgerRow) -> Result<(), LedgerError>;
    fn update_field(
        &self,
        token: &OnboardingToken,
        column: LedgerColumn,
        value: &str,
    ) -> Result<(), LedgerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no ledger row for token")]
    RowNotFound,
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

pub fn record_append(ledger: &dyn AuditLedger, row: LedgerRow) {
    let token = row.token.clone();
    if let Err(err) = ledger.append_row(row) {
        warn!(token = %token, error = %err, "ledger append failed; continuing");
    }
}

pub fn record_update(
    ledger: &dyn AuditLedger,
    token: &OnboardingToken,
    column: LedgerColumn,
    value: &str,
) {
    if let Err(err) = ledger.update_field(token, column, value) {
        warn!(
            token = %token,
            column = column.heading(),
            error = %err,
            "ledger update failed; continuing"
        );
    }
}
