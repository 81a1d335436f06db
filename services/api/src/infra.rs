use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use onboard::config::OnboardingConfig;
use onboard::workflows::onboarding::documents::{
    DocumentFetcher, FetchError, FolderRef, StoredFile,
};
use onboard::workflows::onboarding::domain::{
    CheckOutcome, EmployeeRecord, NewEmployee, OnboardingToken,
};
use onboard::workflows::onboarding::fulfillment::{
    FulfillmentError, FulfillmentService, ShipmentConfirmation, ShipmentRequest,
};
use onboard::workflows::onboarding::ledger::{AuditLedger, LedgerColumn, LedgerError, LedgerRow};
use onboard::workflows::onboarding::notify::{Notifier, NotifyError, OutboundMessage};
use onboard::workflows::onboarding::store::{merge_patch, RecordPatch, RecordStore, StoreError};
use onboard::workflows::onboarding::verifier::{
    ContentVerifier, VerificationReport, VerificationRequest, VerifyError,
};
use onboard::workflows::onboarding::Collaborators;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    records: Arc<Mutex<HashMap<OnboardingToken, EmployeeRecord>>>,
}

impl RecordStore for InMemoryRecordStore {
    fn create(&self, intake: NewEmployee) -> Result<EmployeeRecord, StoreError> {
        if let Some(field) = intake.first_missing_field() {
            return Err(StoreError::MissingField(field));
        }
        let record = EmployeeRecord::new(OnboardingToken::mint(), intake);
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    fn find(&self, token: &OnboardingToken) -> Result<Option<EmployeeRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    fn apply_patch(
        &self,
        token: &OnboardingToken,
        patch: RecordPatch,
    ) -> Result<EmployeeRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard.get_mut(token).ok_or(StoreError::NotFound)?;
        merge_patch(record, patch);
        Ok(record.clone())
    }
}

struct LedgerEntry {
    row: LedgerRow,
    cells: HashMap<LedgerColumn, String>,
}

/// Stand-in for the HR tracking sheet. Keeps a token -> row index so
/// updates never scan.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditLedger {
    rows: Arc<Mutex<Vec<LedgerEntry>>>,
    index: Arc<Mutex<HashMap<OnboardingToken, usize>>>,
}

impl AuditLedger for InMemoryAuditLedger {
    fn append_row(&self, row: LedgerRow) -> Result<(), LedgerError> {
        let mut rows = self.rows.lock().expect("ledger mutex poisoned");
        let mut index = self.index.lock().expect("ledger index mutex poisoned");
        index.insert(row.token.clone(), rows.len());
        rows.push(LedgerEntry {
            row,
            cells: HashMap::new(),
        });
        Ok(())
    }

    fn update_field(
        &self,
        token: &OnboardingToken,
        column: LedgerColumn,
        value: &str,
    ) -> Result<(), LedgerError> {
        let index = self.index.lock().expect("ledger index mutex poisoned");
        let position = *index.get(token).ok_or(LedgerError::RowNotFound)?;
        let mut rows = self.rows.lock().expect("ledger mutex poisoned");
        let entry = rows.get_mut(position).ok_or(LedgerError::RowNotFound)?;
        entry.cells.insert(column, value.to_string());
        Ok(())
    }
}

impl InMemoryAuditLedger {
    pub(crate) fn cell(&self, token: &OnboardingToken, column: LedgerColumn) -> Option<String> {
        let index = self.index.lock().expect("ledger index mutex poisoned");
        let position = *index.get(token)?;
        let rows = self.rows.lock().expect("ledger mutex poisoned");
        rows.get(position)
            .and_then(|entry| entry.cells.get(&column).cloned())
    }

    pub(crate) fn row_name(&self, token: &OnboardingToken) -> Option<String> {
        let index = self.index.lock().expect("ledger index mutex poisoned");
        let position = *index.get(token)?;
        let rows = self.rows.lock().expect("ledger mutex poisoned");
        rows.get(position).map(|entry| entry.row.name.clone())
    }
}

/// Records every outbound mail and logs it instead of delivering.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl Notifier for LoggingNotifier {
    fn send(&self, message: OutboundMessage) -> Result<(), NotifyError> {
        tracing::info!(to = %message.to, subject = %message.subject, "mail (simulated)");
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(message);
        Ok(())
    }
}

impl LoggingNotifier {
    pub(crate) fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

/// Pre-seeded shared folders, keyed by folder id.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentFolders {
    folders: Arc<Mutex<HashMap<String, Vec<StoredFile>>>>,
}

impl InMemoryDocumentFolders {
    pub(crate) fn seed(&self, folder_id: &str, files: Vec<StoredFile>) {
        self.folders
            .lock()
            .expect("folders mutex poisoned")
            .insert(folder_id.to_string(), files);
    }
}

impl DocumentFetcher for InMemoryDocumentFolders {
    fn list_folder(&self, folder: &FolderRef) -> Result<Vec<StoredFile>, FetchError> {
        let guard = self.folders.lock().expect("folders mutex poisoned");
        guard
            .get(&folder.0)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(folder.0.clone()))
    }
}

/// Deterministic verifier: extracts the registered name and passes every
/// consistency check. Good enough for local runs and demos.
#[derive(Default, Clone)]
pub(crate) struct CannedVerifier;

impl ContentVerifier for CannedVerifier {
    fn verify(&self, request: &VerificationRequest) -> Result<VerificationReport, VerifyError> {
        Ok(VerificationReport {
            status: CheckOutcome::Pass,
            extracted_name: Some(request.candidate_name.clone()),
            aadhaar_number: Some("XXXX-XXXX-0000".to_string()),
            pan_number: Some("XXXXX0000X".to_string()),
            date_of_birth: None,
            is_aadhaar_present: true,
            is_pan_present: true,
            is_name_consistent: true,
            is_dob_consistent: true,
            consistency_notes: String::new(),
        })
    }
}

/// Hands out sequential tracking numbers.
#[derive(Default)]
pub(crate) struct SequentialFulfillment {
    sequence: AtomicU64,
}

impl FulfillmentService for SequentialFulfillment {
    fn order_kit(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentConfirmation, FulfillmentError> {
        if request.address_line.trim().is_empty() {
            return Err(FulfillmentError::Rejected(
                "shipping address is empty".to_string(),
            ));
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(ShipmentConfirmation {
            tracking_number: format!("SHIP-{id:06}"),
            label_url: Some(format!("https://labels.example.com/{id:06}.pdf")),
        })
    }
}

/// The full in-memory stack plus handles kept for introspection (demo
/// output, route tests).
pub(crate) struct InMemoryStack {
    pub(crate) collaborators: Collaborators,
    pub(crate) ledger: InMemoryAuditLedger,
    pub(crate) notifier: LoggingNotifier,
    pub(crate) folders: InMemoryDocumentFolders,
}

pub(crate) fn in_memory_stack(settings: OnboardingConfig) -> InMemoryStack {
    let ledger = InMemoryAuditLedger::default();
    let notifier = LoggingNotifier::default();
    let folders = InMemoryDocumentFolders::default();

    let collaborators = Collaborators {
        store: Arc::new(InMemoryRecordStore::default()),
        ledger: Arc::new(ledger.clone()),
        notifier: Arc::new(notifier.clone()),
        fetcher: Arc::new(folders.clone()),
        verifier: Arc::new(CannedVerifier),
        fulfillment: Arc::new(SequentialFulfillment::default()),
        settings,
    };

    InMemoryStack {
        collaborators,
        ledger,
        notifier,
        folders,
    }
}
