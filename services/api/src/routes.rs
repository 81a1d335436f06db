use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use onboard::workflows::onboarding::{onboarding_router, OnboardingService};

/// Pipeline endpoints plus the operational trio every deployment gets.
pub(crate) fn with_onboarding_routes(service: Arc<OnboardingService>) -> axum::Router {
    onboarding_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::in_memory_stack;
    use axum::body::Body;
    use axum::http::Request;
    use axum_prometheus::PrometheusMetricLayer;
    use onboard::config::OnboardingConfig;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn demo_settings() -> OnboardingConfig {
        OnboardingConfig {
            company_domain: "unity.com".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            hr_email: "hr@unity.com".to_string(),
        }
    }

    #[tokio::test]
    async fn router_serves_health_alongside_pipeline_routes() {
        let stack = in_memory_stack(demo_settings());
        let service = Arc::new(OnboardingService::new(stack.collaborators));
        let app = with_onboarding_routes(service);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_is_unavailable_until_flagged() {
        let (_layer, handle) = PrometheusMetricLayer::pair();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(handle),
        };

        let response = readiness_endpoint(Extension(state.clone())).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Relaxed);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
