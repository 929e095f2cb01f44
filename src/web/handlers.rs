//! HTTP request handlers

use super::state::AppState;
use crate::credentials::ProviderCredentials;
use crate::dispatch::{RequestToken, ScanError, ScanOutcome, ScanRequest};
use crate::error::{ClassifiedError, ErrorKind};
use crate::providers::{ProviderAbout, ProviderKind};
use crate::results::{AnalysisReport, NormalizedResult};
use crate::templates::QueryTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /search`
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
    pub provider: ProviderKind,
    #[serde(default)]
    pub keys: ProviderCredentials,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub token: RequestToken,
    pub summary: String,
    pub number_of_results: usize,
    pub results: Vec<NormalizedResult>,
}

/// Body of `POST /analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    pub target: String,
    #[serde(default)]
    pub results: Vec<NormalizedResult>,
    pub provider: ProviderKind,
    #[serde(default)]
    pub keys: ProviderCredentials,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub token: RequestToken,
    pub report: AnalysisReport,
}

/// Body of `POST /scan`
#[derive(Debug, Deserialize)]
pub struct ScanBody {
    #[serde(flatten)]
    pub request: ScanRequest,
    #[serde(default)]
    pub keys: ProviderCredentials,
}

#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    pub id: ProviderKind,
    pub name: String,
    pub search: bool,
    pub analysis: bool,
    pub about: ProviderAbout,
}

/// Keys from the request body, completed from the environment
fn credentials(keys: ProviderCredentials) -> ProviderCredentials {
    keys.with_env_fallback(&ProviderKind::all_names())
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Network => StatusCode::BAD_GATEWAY,
        ErrorKind::AuthInvalid => StatusCode::UNAUTHORIZED,
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::ProviderServerError => StatusCode::BAD_GATEWAY,
        ErrorKind::ProviderUnsupported => StatusCode::BAD_REQUEST,
        ErrorKind::MalformedResponse => StatusCode::BAD_GATEWAY,
        ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ClassifiedError {
    fn into_response(self) -> Response {
        (status_for(self.kind), Json(self)).into_response()
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        match self {
            ScanError::Provider(e) => e.into_response(),
            ScanError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "kind": "InvalidRequest",
                    "message": message
                })),
            )
                .into_response(),
        }
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.settings.general.instance_name,
        "version": crate::VERSION
    }))
}

/// Enabled providers and what they can do
pub async fn providers(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    let providers = state
        .dispatcher
        .registry()
        .providers()
        .into_iter()
        .map(|p| ProviderInfo {
            id: p.kind(),
            name: p.name().to_string(),
            search: p.supports_search(),
            analysis: p.supports_analysis(),
            about: p.about(),
        })
        .collect();
    Json(providers)
}

pub async fn templates(State(state): State<AppState>) -> Json<Vec<QueryTemplate>> {
    Json(state.scanner.templates().to_vec())
}

pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResponse>, ClassifiedError> {
    let keys = credentials(body.keys);
    let dispatched = state.dispatcher.search(&body.query, body.provider, &keys).await;
    let token = dispatched.token;
    let outcome = dispatched.into_result()?;

    Ok(Json(SearchResponse {
        token,
        summary: outcome.summary,
        number_of_results: outcome.results.len(),
        results: outcome.results,
    }))
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalyzeResponse>, ClassifiedError> {
    let keys = credentials(body.keys);
    let dispatched = state
        .dispatcher
        .analyze(&body.target, &body.results, body.provider, &keys)
        .await;
    let token = dispatched.token;
    let report = dispatched.into_result()?;

    Ok(Json(AnalyzeResponse { token, report }))
}

pub async fn scan(
    State(state): State<AppState>,
    Json(body): Json<ScanBody>,
) -> Result<Json<ScanOutcome>, ScanError> {
    let keys = credentials(body.keys);
    let outcome = state.scanner.scan(&body.request, &keys).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::network::HttpClient;
    use crate::providers::ProviderLoader;
    use crate::web::create_router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let settings = Settings::default();
        let registry = ProviderLoader::load(&settings.providers).unwrap();
        create_router(AppState::new(settings, registry, HttpClient::new().unwrap()))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::AuthInvalid), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_for(ErrorKind::ProviderUnsupported), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Unknown), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["instance"], "dorkscope");
    }

    #[tokio::test]
    async fn test_providers_lists_capabilities() {
        let response = router()
            .oneshot(Request::get("/providers").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        let brave = body
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == "brave")
            .unwrap();
        assert_eq!(brave["search"], true);
        assert_eq!(brave["analysis"], false);
    }

    #[tokio::test]
    async fn test_analyze_on_search_only_provider_is_bad_request() {
        let body = serde_json::json!({
            "target": "example.com",
            "results": [{"title": "t", "url": "u", "snippet": "s", "source": "Brave Search"}],
            "provider": "brave",
            "keys": {"brave": "BSA-test"}
        });
        let response = router()
            .oneshot(
                Request::post("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "ProviderUnsupported");
        assert_eq!(body["provider"], "Brave Search");
    }

    #[tokio::test]
    async fn test_scan_with_unknown_template() {
        let body = serde_json::json!({
            "target": "example.com",
            "template": "No Such Template",
            "provider": "gemini"
        });
        let response = router()
            .oneshot(
                Request::post("/scan")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "InvalidRequest");
    }
}
