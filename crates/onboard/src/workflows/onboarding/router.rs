use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::{OnboardingService, ServiceError};

/// Router builder exposing the candidate-facing pipeline endpoints.
pub fn onboarding_router(service: Arc<OnboardingService>) -> Router {
    Router::new()
        .route("/first", post(intake_handler))
        .route("/onboarding/respond", post(respond_handler))
        .route("/onboarding/documents", post(documents_handler))
        .route("/onboarding/details", post(details_handler))
        .route("/onboarding/kit-received", get(kit_received_handler))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IntakeBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    package: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenAction {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DocumentsBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    documents: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DetailsBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    details: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenQuery {
    #[serde(default)]
    token: Option<String>,
}

fn error_response(err: ServiceError) -> Response {
    let status = err.status_code();
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) async fn intake_handler(
    State(service): State<Arc<OnboardingService>>,
    body: Option<Json<IntakeBody>>,
) -> Response {
    let Json(body) = body.unwrap_or_default();
    let intake = crate::workflows::onboarding::domain::NewEmployee {
        name: body.name.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        role: body.role.unwrap_or_default(),
        package: body.package.unwrap_or_default(),
    };

    match service.intake(intake) {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({
                "status": "received",
                "token": record.token.as_str(),
                "stage": record.stage.label(),
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Accepts the token/action pair from the JSON body or the query string,
/// body values winning, so both mail links and form posts work.
pub(crate) async fn respond_handler(
    State(service): State<Arc<OnboardingService>>,
    Query(query): Query<TokenAction>,
    body: Option<Json<TokenAction>>,
) -> Response {
    let Json(body) = body.unwrap_or_default();
    let token = body.token.or(query.token);
    let action = body.action.or(query.action);

    match service.respond(token, action) {
        Ok(status) => (
            StatusCode::OK,
            Json(json!({ "status": status.label() })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn documents_handler(
    State(service): State<Arc<OnboardingService>>,
    body: Option<Json<DocumentsBody>>,
) -> Response {
    let Json(body) = body.unwrap_or_default();
    match service.submit_documents(body.token, body.documents.unwrap_or_default()) {
        Ok(accepted) => (
            StatusCode::OK,
            Json(json!({ "status": "received", "documents": accepted })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn details_handler(
    State(service): State<Arc<OnboardingService>>,
    body: Option<Json<DetailsBody>>,
) -> Response {
    let Json(body) = body.unwrap_or_default();
    match service.submit_details(body.token, body.details.unwrap_or_default()) {
        Ok(accepted) => (
            StatusCode::OK,
            Json(json!({ "status": "received", "fields": accepted })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn kit_received_handler(
    State(service): State<Arc<OnboardingService>>,
    Query(query): Query<TokenQuery>,
) -> Response {
    match service.confirm_kit_received(query.token) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "confirmed" })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
