//! Shared in-memory collaborators for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

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
use onboard::workflows::onboarding::{Collaborators, OnboardingService};

pub const FOLDER_ID: &str = "folder-1";

pub fn folder_link() -> String {
    format!("https://drive.example.com/drive/folders/{FOLDER_ID}?usp=sharing")
}

pub fn settings() -> OnboardingConfig {
    OnboardingConfig {
        company_domain: "unity.com".to_string(),
        frontend_url: "http://localhost:5173".to_string(),
        hr_email: "hr@unity.com".to_string(),
    }
}

pub fn stored_file(name: &str) -> StoredFile {
    StoredFile {
        id: format!("id-{name}"),
        name: name.to_string(),
        mime_type: None,
    }
}

pub fn complete_folder() -> Vec<StoredFile> {
    [
        "aadhaar.pdf",
        "pan.pdf",
        "10thmarksheet.pdf",
        "12thmarksheet.pdf",
        "photo.jpg",
    ]
    .into_iter()
    .map(stored_file)
    .collect()
}

pub fn intake() -> NewEmployee {
    NewEmployee {
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        role: "Software Engineer".to_string(),
        package: "12 LPA".to_string(),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<OnboardingToken, EmployeeRecord>>,
}

impl RecordStore for MemoryStore {
    fn create(&self, intake: NewEmployee) -> Result<EmployeeRecord, StoreError> {
        if let Some(field) = intake.first_missing_field() {
            return Err(StoreError::MissingField(field));
        }
        let record = EmployeeRecord::new(OnboardingToken::mint(), intake);
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(record.token.clone(), record.clone());
        Ok(record)
    }

    fn find(&self, token: &OnboardingToken) -> Result<Option<EmployeeRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .get(token)
            .cloned())
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

#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<Vec<LedgerRow>>,
    cells: Mutex<HashMap<(OnboardingToken, LedgerColumn), String>>,
}

impl MemoryLedger {
    pub fn cell(&self, token: &OnboardingToken, column: LedgerColumn) -> Option<String> {
        self.cells
            .lock()
            .expect("cells mutex poisoned")
            .get(&(token.clone(), column))
            .cloned()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().expect("rows mutex poisoned").len()
    }
}

impl AuditLedger for MemoryLedger {
    fn append_row(&self, row: LedgerRow) -> Result<(), LedgerError> {
        self.rows.lock().expect("rows mutex poisoned").push(row);
        Ok(())
    }

    fn update_field(
        &self,
        token: &OnboardingToken,
        column: LedgerColumn,
        value: &str,
    ) -> Result<(), LedgerError> {
        let known = self
            .rows
            .lock()
            .expect("rows mutex poisoned")
            .iter()
            .any(|row| &row.token == token);
        if !known {
            return Err(LedgerError::RowNotFound);
        }
        self.cells
            .lock()
            .expect("cells mutex poisoned")
            .insert((token.clone(), column), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct CapturingNotifier {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl CapturingNotifier {
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("sent mutex poisoned").clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|message| message.subject)
            .collect()
    }

    pub fn count_subject(&self, subject: &str) -> usize {
        self.sent()
            .iter()
            .filter(|message| message.subject == subject)
            .count()
    }
}

impl Notifier for CapturingNotifier {
    fn send(&self, message: OutboundMessage) -> Result<(), NotifyError> {
        self.sent.lock().expect("sent mutex poisoned").push(message);
        Ok(())
    }
}

#[derive(Default)]
pub struct FolderStub {
    folders: Mutex<HashMap<String, Vec<StoredFile>>>,
}

impl FolderStub {
    pub fn seed(&self, folder_id: &str, files: Vec<StoredFile>) {
        self.folders
            .lock()
            .expect("folders mutex poisoned")
            .insert(folder_id.to_string(), files);
    }
}

impl DocumentFetcher for FolderStub {
    fn list_folder(&self, folder: &FolderRef) -> Result<Vec<StoredFile>, FetchError> {
        self.folders
            .lock()
            .expect("folders mutex poisoned")
            .get(&folder.0)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(folder.0.clone()))
    }
}

pub fn passing_report() -> VerificationReport {
    VerificationReport {
        status: CheckOutcome::Pass,
        extracted_name: None,
        aadhaar_number: Some("1234-5678-9012".to_string()),
        pan_number: Some("ABCDE1234F".to_string()),
        date_of_birth: None,
        is_aadhaar_present: true,
        is_pan_present: true,
        is_name_consistent: true,
        is_dob_consistent: true,
        consistency_notes: String::new(),
    }
}

/// Returns whatever report it was last scripted with; extracted name
/// defaults to the registered candidate name.
pub struct ScriptedVerifier {
    next: Mutex<VerificationReport>,
}

impl Default for ScriptedVerifier {
    fn default() -> Self {
        Self {
            next: Mutex::new(passing_report()),
        }
    }
}

impl ScriptedVerifier {
    pub fn script(&self, report: VerificationReport) {
        *self.next.lock().expect("report mutex poisoned") = report;
    }
}

impl ContentVerifier for ScriptedVerifier {
    fn verify(&self, request: &VerificationRequest) -> Result<VerificationReport, VerifyError> {
        let mut report = self.next.lock().expect("report mutex poisoned").clone();
        if report.extracted_name.is_none() {
            report.extracted_name = Some(request.candidate_name.clone());
        }
        Ok(report)
    }
}

#[derive(Default)]
pub struct StubFulfillment {
    fail_next: AtomicBool,
    sequence: AtomicU64,
}

impl StubFulfillment {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::Relaxed);
    }

    pub fn orders_placed(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

impl FulfillmentService for StubFulfillment {
    fn order_kit(
        &self,
        _request: &ShipmentRequest,
    ) -> Result<ShipmentConfirmation, FulfillmentError> {
        if self.fail_next.swap(false, Ordering::Relaxed) {
            return Err(FulfillmentError::Rejected("courier rejected order".to_string()));
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(ShipmentConfirmation {
            tracking_number: format!("KIT-{id:04}"),
            label_url: None,
        })
    }
}

/// Everything a test needs: the service wired to in-memory collaborators,
/// plus handles onto each of them.
pub struct Harness {
    pub service: OnboardingService,
    pub ctx: Collaborators,
    pub store: Arc<MemoryStore>,
    pub ledger: Arc<MemoryLedger>,
    pub notifier: Arc<CapturingNotifier>,
    pub folders: Arc<FolderStub>,
    pub verifier: Arc<ScriptedVerifier>,
    pub fulfillment: Arc<StubFulfillment>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let ledger = Arc::new(MemoryLedger::default());
        let notifier = Arc::new(CapturingNotifier::default());
        let folders = Arc::new(FolderStub::default());
        let verifier = Arc::new(ScriptedVerifier::default());
        let fulfillment = Arc::new(StubFulfillment::default());

        let ctx = Collaborators {
            store: store.clone(),
            ledger: ledger.clone(),
            notifier: notifier.clone(),
            fetcher: folders.clone(),
            verifier: verifier.clone(),
            fulfillment: fulfillment.clone(),
            settings: settings(),
        };

        Self {
            service: OnboardingService::new(ctx.clone()),
            ctx,
            store,
            ledger,
            notifier,
            folders,
            verifier,
            fulfillment,
        }
    }

    pub fn record(&self, token: &OnboardingToken) -> EmployeeRecord {
        self.store
            .find(token)
            .expect("store available")
            .expect("record present")
    }
}
