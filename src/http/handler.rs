//! HTTP handlers for the country API

use super::envelope::{failure, ok, ApiEnvelope, ApiErrorBody};
use super::AppState;
use crate::country::{CountryDetail, CountryFacts, SearchHit};
use crate::error::{GaiaError, GaiaResult, StatusClass};
use crate::knowledge::KnowledgeFields;
use crate::summary::SummaryRecord;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

type ApiResult<T> = GaiaResult<Json<ApiEnvelope<T>>>;

/// Undecodable `:code` segments (e.g. invalid UTF-8) are malformed codes
fn code_param(path: Result<Path<String>, PathRejection>) -> GaiaResult<String> {
    path.map(|Path(code)| code)
        .map_err(|e| GaiaError::InvalidCode(e.body_text()))
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Request body of `POST /summary`
#[derive(Deserialize)]
pub struct SummaryRequest {
    pub country: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// `GET /search?q=`
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Vec<SearchHit>> {
    let Query(params) = params.map_err(|e| GaiaError::InvalidQuery(e.body_text()))?;
    let term = params.q.unwrap_or_default();
    if term.trim().is_empty() {
        return Err(GaiaError::InvalidQuery("search term is required".to_string()));
    }
    Ok(ok(state.search.search(&term).await?))
}

/// `GET /countries`
pub async fn list_countries_handler(State(state): State<AppState>) -> ApiResult<Vec<SearchHit>> {
    Ok(ok(state.search.list_all().await?))
}

/// `GET /countries/:code`
pub async fn country_handler(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<CountryDetail> {
    let code = code_param(code)?;
    Ok(ok(state.aggregator.fetch_country_detail(&code).await?))
}

/// `GET /countries/:code/facts`
pub async fn facts_handler(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<CountryFacts> {
    let code = code_param(code)?;
    Ok(ok(state.aggregator.fetch_facts(&code).await?))
}

/// `GET /countries/:code/knowledge`; a fully degraded lookup is `{}`
pub async fn knowledge_handler(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<KnowledgeFields> {
    let code = code_param(code)?;
    let outcome = state.aggregator.fetch_knowledge(&code).await?;
    Ok(ok(outcome.into_fields().unwrap_or_default()))
}

/// `POST /summary`
pub async fn summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> ApiResult<SummaryRecord> {
    let Json(request) = payload.map_err(|e| GaiaError::InvalidRequest(e.body_text()))?;
    Ok(ok(state.summaries.get_summary(&request.country).await?))
}

/// `GET /status`
pub async fn status_handler() -> Json<ApiEnvelope<StatusResponse>> {
    ok(StatusResponse {
        status: "healthy",
        service: "gaia",
        version: crate::VERSION,
    })
}

/// Unknown routes still answer with an envelope
pub async fn fallback_handler(uri: Uri) -> Response {
    failure(
        StatusCode::NOT_FOUND,
        ApiErrorBody::new(
            "NOT_FOUND",
            format!("No route for {}", uri.path()),
            StatusClass::ClientError,
        ),
    )
}
