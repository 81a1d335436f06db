use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::info;

use super::domain::{EmployeeRecord, NewEmployee, OfferStatus, OnboardingToken};
use super::engine::{EventStep, StepEngine};
use super::events::OnboardingEvent;
use super::ledger::{record_append, record_update, LedgerColumn, LedgerRow};
use super::state;
use super::steps::{standard_steps, Collaborators};
use super::store::{RecordPatch, StoreError};

/// Front door of the pipeline. Each operation does the authoritative store
/// write first, mirrors it to the ledger best-effort, then hands the event
/// to the engine; by the time an HTTP response leaves, every synchronous
/// consequence has run.
pub struct OnboardingService {
    ctx: Collaborators,
    engine: StepEngine,
}

impl OnboardingService {
    pub fn new(ctx: Collaborators) -> Self {
        let engine = StepEngine::new(standard_steps(ctx.clone()));
        Self { ctx, engine }
    }

    /// Same service with a caller-chosen step set. Used by tests that need
    /// to observe dispatch without the full pipeline.
    pub fn with_steps(ctx: Collaborators, steps: Vec<Arc<dyn EventStep>>) -> Self {
        Self {
            ctx,
            engine: StepEngine::new(steps),
        }
    }

    /// Registers a new hire and kicks the pipeline off.
    pub fn intake(&self, intake: NewEmployee) -> Result<EmployeeRecord, ServiceError> {
        if let Some(field) = intake.first_missing_field() {
            return Err(ServiceError::InvalidInput(format!(
                "required field '{field}' is missing"
            )));
        }

        let record = self.ctx.store.create(intake)?;
        record_append(
            self.ctx.ledger.as_ref(),
            LedgerRow {
                token: record.token.clone(),
                name: record.name.clone(),
                submitted_at: Utc::now(),
                email: record.email.clone(),
                role: record.role.clone(),
                package: record.package.clone(),
                offer_status: record.offer_status.label().to_string(),
            },
        );

        info!(token = %record.token, name = %record.name, "employee intake recorded");
        self.engine.dispatch(OnboardingEvent::EmployeeDataReceived {
            token: record.token.clone(),
        });

        // Steps have advanced the record; return the fresh view.
        self.ctx
            .store
            .find(&record.token)?
            .ok_or(ServiceError::Store(StoreError::NotFound))
    }

    /// Records the one-shot offer decision.
    pub fn respond(
        &self,
        token: Option<String>,
        action: Option<String>,
    ) -> Result<OfferStatus, ServiceError> {
        let token = required(token, "token")?;
        let action = required(action, "action")?;

        let status = match action.as_str() {
            "yes" => OfferStatus::Accepted,
            "no" => OfferStatus::Rejected,
            other => {
                return Err(ServiceError::InvalidInput(format!(
                    "action must be 'yes' or 'no', got '{other}'"
                )))
            }
        };

        let token = OnboardingToken(token);
        let record = self
            .ctx
            .store
            .find(&token)?
            .ok_or(ServiceError::UnknownToken)?;

        if record.offer_status != OfferStatus::Pending {
            return Err(ServiceError::Conflict(format!(
                "offer already {}",
                record.offer_status.label()
            )));
        }

        let event = OnboardingEvent::OfferResponseReceived {
            token: token.clone(),
            status,
        };
        let next = state::apply(record.stage, &event)
            .map_err(|err| ServiceError::Conflict(err.to_string()))?;

        self.ctx
            .store
            .apply_patch(&token, RecordPatch::Offer(status))?;
        self.ctx
            .store
            .apply_patch(&token, RecordPatch::Stage(next))?;
        record_update(
            self.ctx.ledger.as_ref(),
            &token,
            LedgerColumn::OfferStatus,
            status.label(),
        );
        record_update(
            self.ctx.ledger.as_ref(),
            &token,
            LedgerColumn::LastUpdate,
            &Utc::now().to_rfc3339(),
        );

        info!(token = %token, status = status.label(), "offer response recorded");
        self.engine.dispatch(event);
        Ok(status)
    }

    /// Merges submitted document links and triggers the file check.
    pub fn submit_documents(
        &self,
        token: Option<String>,
        documents: BTreeMap<String, String>,
    ) -> Result<usize, ServiceError> {
        let token = OnboardingToken(required(token, "token")?);
        let cleaned = clean_entries(documents);
        if cleaned.is_empty() {
            return Err(ServiceError::InvalidInput(
                "no document links provided".to_string(),
            ));
        }

        let record = self.ctx.store.find(&token)?.ok_or(ServiceError::NotFound)?;

        let event = OnboardingEvent::DocumentsReceived {
            token: token.clone(),
            documents: cleaned.clone(),
        };
        let next = state::apply(record.stage, &event)
            .map_err(|err| ServiceError::Conflict(err.to_string()))?;

        let accepted = cleaned.len();
        self.ctx
            .store
            .apply_patch(&token, RecordPatch::Documents(cleaned))?;
        self.ctx
            .store
            .apply_patch(&token, RecordPatch::Stage(next))?;
        record_update(
            self.ctx.ledger.as_ref(),
            &token,
            LedgerColumn::LinkReceived,
            "RECEIVED",
        );

        info!(token = %token, accepted, "document links received");
        self.engine.dispatch(event);
        Ok(accepted)
    }

    /// Merges the details-form submission and triggers kit fulfillment.
    pub fn submit_details(
        &self,
        token: Option<String>,
        details: BTreeMap<String, String>,
    ) -> Result<usize, ServiceError> {
        let token = OnboardingToken(required(token, "token")?);
        let cleaned = clean_entries(details);
        if cleaned.is_empty() {
            return Err(ServiceError::InvalidInput(
                "no details provided".to_string(),
            ));
        }

        let record = self.ctx.store.find(&token)?.ok_or(ServiceError::NotFound)?;

        let event = OnboardingEvent::DetailsReceived {
            token: token.clone(),
            details: cleaned.clone(),
        };
        let next = state::apply(record.stage, &event)
            .map_err(|err| ServiceError::Conflict(err.to_string()))?;

        let accepted = cleaned.len();
        self.ctx
            .store
            .apply_patch(&token, RecordPatch::Details(cleaned))?;
        self.ctx
            .store
            .apply_patch(&token, RecordPatch::Stage(next))?;
        record_update(
            self.ctx.ledger.as_ref(),
            &token,
            LedgerColumn::DetailsReceived,
            "RECEIVED",
        );

        info!(token = %token, accepted, "candidate details received");
        self.engine.dispatch(event);
        Ok(accepted)
    }

    /// Candidate confirmation that the kit arrived; unlocks credentials.
    pub fn confirm_kit_received(&self, token: Option<String>) -> Result<(), ServiceError> {
        let token = OnboardingToken(required(token, "token")?);

        // Unknown token surfaces as a store failure here, matching the
        // public contract of this endpoint.
        let record = self
            .ctx
            .store
            .find(&token)?
            .ok_or(ServiceError::Store(StoreError::NotFound))?;

        let event = OnboardingEvent::KitReceived {
            token: token.clone(),
        };
        let next = state::apply(record.stage, &event)
            .map_err(|err| ServiceError::Conflict(err.to_string()))?;

        let now = Utc::now();
        self.ctx
            .store
            .apply_patch(&token, RecordPatch::KitReceived { at: now })?;
        self.ctx
            .store
            .apply_patch(&token, RecordPatch::Stage(next))?;
        record_update(
            self.ctx.ledger.as_ref(),
            &token,
            LedgerColumn::KitReceived,
            "YES",
        );
        record_update(
            self.ctx.ledger.as_ref(),
            &token,
            LedgerColumn::LastUpdate,
            &now.to_rfc3339(),
        );

        info!(token = %token, "kit delivery confirmed");
        self.engine.dispatch(event);
        Ok(())
    }

    /// Read-only view for diagnostics and tests.
    pub fn record(&self, token: &OnboardingToken) -> Result<Option<EmployeeRecord>, ServiceError> {
        Ok(self.ctx.store.find(token)?)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ServiceError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ServiceError::InvalidInput(format!(
            "required field '{field}' is missing"
        ))),
    }
}

/// Trims keys and values, dropping entries with an empty side.
fn clean_entries(entries: BTreeMap<String, String>) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            if key.is_empty() || value.is_empty() {
                None
            } else {
                Some((key, value))
            }
        })
        .collect()
}

/// Error raised by the onboarding operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidInput(String),
    #[error("unrecognized token")]
    UnknownToken,
    #[error("no onboarding record for token")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::UnknownToken => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
