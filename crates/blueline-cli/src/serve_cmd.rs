//! `blueline serve`: a local JSON API over one shared session.
//!
//! This is the surface a browser dashboard talks to. The session sits
//! behind a mutex, so a second submission waits for the first to finish
//! instead of racing it.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use blueline_core::analysis::AnalysisResult;
use blueline_core::error::{ServiceError, SessionError, ValidationError};
use blueline_core::plan::{Bounds, PlanCategory, PlanRecord, classify};
use blueline_core::session::{SearchQuery, Session};

use crate::search_cmd::{SearchBy, build_query};

pub type SharedSession = Arc<Mutex<Session>>;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let status = match &err {
            SessionError::Validation(_) => StatusCode::BAD_REQUEST,
            SessionError::Service(ServiceError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            SessionError::Service(_) => StatusCode::BAD_GATEWAY,
            SessionError::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub identifier: String,
    pub category: PlanCategory,
    pub label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub by: Option<SearchBy>,
}

#[derive(Debug, Deserialize)]
pub struct AreaParams {
    pub south: Option<f64>,
    pub west: Option<f64>,
    pub north: Option<f64>,
    pub east: Option<f64>,
}

impl AreaParams {
    /// All four edges, or none of them.
    fn bounds(&self) -> Result<Option<Bounds>, AppError> {
        match (self.south, self.west, self.north, self.east) {
            (None, None, None, None) => Ok(None),
            (Some(s), Some(w), Some(n), Some(e)) => Bounds::new(s, w, n, e)
                .map(Some)
                .map_err(|err| AppError::bad_request(err.to_string())),
            _ => Err(AppError::bad_request(
                "give all of south, west, north, east or none of them",
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanRecord>,
    pub selected: Option<PlanRecord>,
}

#[derive(Debug, Serialize)]
pub struct CurrentResponse {
    pub plan: Option<PlanRecord>,
    pub analysis: Option<AnalysisResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentResponse {
    pub recent_searches: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub configured: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(session: SharedSession) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/classify/{identifier}", get(classify_handler))
        .route("/api/plans", get(search_plans))
        .route("/api/plans/area", get(search_area))
        .route("/api/current", get(current))
        .route("/api/current/{index}", put(select))
        .route("/api/analyze", post(analyze))
        .route("/api/export", get(export))
        .route("/api/recent", get(recent))
        .route("/api/settings/api-key", put(set_api_key))
        .layer(CorsLayer::permissive())
        .with_state(session)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(session: Session, bind: &str, port: u16) -> Result<()> {
    let app = build_router(Arc::new(Mutex::new(session)));
    let listener = bind_listener(bind, port).await?;
    tracing::info!("blueline serve listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("blueline serve shut down");
    Ok(())
}

/// Bind `bind` (an IP literal such as `::1`, or a host name such as
/// `localhost`) on `port`.
async fn bind_listener(bind: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((bind, port))
        .await
        .with_context(|| format!("failed to bind {bind} port {port}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C; shutting down");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(session): State<SharedSession>) -> Html<String> {
    let session = session.lock().await;
    let recent = if session.recent_searches().is_empty() {
        "<li>none</li>".to_string()
    } else {
        session
            .recent_searches()
            .iter()
            .map(|t| format!("<li>{}</li>", escape_html(t)))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let current = session
        .current_plan()
        .map(|p| format!("{} ({})", escape_html(&p.plan_name), escape_html(&p.plan_number)))
        .unwrap_or_else(|| "none".to_string());

    Html(format!(
        "<!DOCTYPE html>\
<html dir=\"rtl\"><head><meta charset=\"utf-8\"><title>blueline</title></head><body>\
<h1>מנתח קווים כחולים</h1>\
<p><a href=\"/api/current\">/api/current</a> | <a href=\"/api/recent\">/api/recent</a> | \
<a href=\"/api/plans/area\">/api/plans/area</a></p>\
<p>Current plan: {current}</p>\
<h2>Recent searches</h2><ul>{recent}</ul>\
</body></html>"
    ))
}

async fn classify_handler(
    identifier: Result<Path<String>, PathRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let Path(identifier) = identifier?;
    let category = classify(&identifier);
    Ok(Json(ClassifyResponse {
        identifier,
        category,
        label: category.label(),
    }))
}

async fn search_plans(
    State(session): State<SharedSession>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<PlansResponse>, AppError> {
    let Query(params) = params?;
    run_search(&session, build_query(&params.q, params.by)).await
}

async fn search_area(
    State(session): State<SharedSession>,
    params: Result<Query<AreaParams>, QueryRejection>,
) -> Result<Json<PlansResponse>, AppError> {
    let Query(params) = params?;
    let bounds = params.bounds()?;
    run_search(&session, SearchQuery::Area(bounds)).await
}

async fn run_search(
    session: &SharedSession,
    query: SearchQuery,
) -> Result<Json<PlansResponse>, AppError> {
    let mut session = session.lock().await;
    let plans = session.search(query).await?.to_vec();
    Ok(Json(PlansResponse {
        plans,
        selected: session.current_plan().cloned(),
    }))
}

async fn current(State(session): State<SharedSession>) -> Json<CurrentResponse> {
    let session = session.lock().await;
    Json(CurrentResponse {
        plan: session.current_plan().cloned(),
        analysis: session.current_analysis().cloned(),
    })
}

async fn select(
    State(session): State<SharedSession>,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Json<CurrentResponse>, AppError> {
    let Path(index) = index?;
    let mut session = session.lock().await;
    if session.select(index).is_none() {
        return Err(AppError::not_found(format!(
            "no result at index {index}; the last search returned {}",
            session.results().len()
        )));
    }
    Ok(Json(CurrentResponse {
        plan: session.current_plan().cloned(),
        analysis: session.current_analysis().cloned(),
    }))
}

async fn analyze(
    State(session): State<SharedSession>,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut session = session.lock().await;
    let analysis = session.analyze().await?.clone();
    Ok(Json(analysis))
}

async fn export(State(session): State<SharedSession>) -> Result<Response, AppError> {
    let doc = session.lock().await.export(Utc::now())?;
    let disposition = content_disposition(&doc.file_name());
    let header_value = HeaderValue::from_str(&disposition)
        .map_err(|e| AppError::internal(anyhow::Error::new(e)))?;
    Ok(([(header::CONTENT_DISPOSITION, header_value)], Json(doc)).into_response())
}

async fn recent(State(session): State<SharedSession>) -> Json<RecentResponse> {
    let session = session.lock().await;
    Json(RecentResponse {
        recent_searches: session.recent_searches().as_slice().to_vec(),
    })
}

async fn set_api_key(
    State(session): State<SharedSession>,
    body: Result<Json<ApiKeyRequest>, JsonRejection>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let Json(body) = body?;
    let mut session = session.lock().await;
    session.set_api_key(body.api_key)?;
    Ok(Json(ApiKeyResponse {
        configured: session.credential().is_some(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `attachment` disposition with an ASCII fallback name and an RFC 5987
/// UTF-8 name, since plan numbers are usually Hebrew.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
