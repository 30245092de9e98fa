//! Request handlers for the `/api` routes.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::form_urlencoded;

use resreg_store::{Bytes, ResumeRecord};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// File name offered for current-version downloads.
pub const CURRENT_FILE_NAME: &str = "current.txt";

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Body of a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub version: u64,
    pub email: String,
    pub size: usize,
}

fn require_email(email: Option<String>) -> ApiResult<String> {
    match email {
        Some(email) if !email.is_empty() => Ok(email),
        _ => {
            tracing::warn!("request rejected: missing email");
            Err(ApiError::bad_request("Required parameter 'email' is missing"))
        }
    }
}

/// Relative URL of one stored version, e.g. `/api/resume/2?email=a%40b.io`.
pub fn version_location(record: &ResumeRecord) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("email", record.email())
        .finish();
    format!("/api/resume/{}?{query}", record.version())
}

fn file_response(record: &ResumeRecord, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={file_name}"),
            ),
            (header::CONTENT_LENGTH, record.size().to_string()),
        ],
        record.body().clone(),
    )
        .into_response()
}

/// `POST /api/resume` with multipart fields `email` and `body`.
///
/// `email` may also be given as a query parameter; the form field wins.
pub async fn upload_handler(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;
    let mut multipart = multipart?;
    let mut email = query.email;
    let mut body: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("email") => email = Some(field.text().await?),
            Some("body") => body = Some(field.bytes().await?),
            _ => {}
        }
    }

    let email = require_email(email)?;
    let Some(body) = body else {
        tracing::warn!(%email, "upload rejected: missing body part");
        return Err(ApiError::bad_request("Required part 'body' is missing"));
    };

    tracing::info!(%email, size = body.len(), "uploading resume");
    let record = state.store().submit(&email, body);
    tracing::info!(%email, version = record.version(), "resume created");

    let response = SubmitResponse {
        version: record.version(),
        email: record.email().to_string(),
        size: record.size(),
    };
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, version_location(&record))],
        Json(response),
    )
        .into_response())
}

/// `GET /api/resume/current?email=...`
pub async fn current_handler(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;
    let email = require_email(query.email)?;
    tracing::info!(%email, "looking up current resume");

    match state.store().find_current(&email) {
        Some(record) => {
            tracing::info!(%email, version = record.version(), "resume found");
            Ok(file_response(&record, CURRENT_FILE_NAME))
        }
        None => {
            tracing::info!(%email, "resume not found");
            Err(ApiError::not_found(format!("No resumes for email {email} found")))
        }
    }
}

/// `GET /api/resume/{version}?email=...`
///
/// Zero and negative versions are reported as not found rather than
/// rejected; only a segment that is not an integer is a bad request.
pub async fn version_handler(
    State(state): State<AppState>,
    Path(version): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;
    let email = require_email(query.email)?;
    let version: i64 = version.parse().map_err(|_| {
        tracing::warn!(%email, %version, "request rejected: bad version");
        ApiError::bad_request(format!("Invalid resume version '{version}'"))
    })?;
    tracing::info!(%email, version, "looking up resume version");

    let found = u64::try_from(version)
        .ok()
        .and_then(|v| state.store().find_by_version(&email, v));
    match found {
        Some(record) => {
            tracing::info!(%email, version, "resume found");
            Ok(file_response(&record, &record.versioned_file_name()))
        }
        None => {
            tracing::info!(%email, version, "resume not found");
            Err(ApiError::not_found(format!(
                "No resume with version {version} for email {email} found"
            )))
        }
    }
}

/// `DELETE /api/resume/delete?email=...`; always 204 for a valid request.
pub async fn delete_handler(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let Query(query) = query?;
    let email = require_email(query.email)?;
    tracing::info!(%email, "deleting resumes");
    let existed = state.store().delete_all(&email);
    tracing::info!(%email, existed, "resume records deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stats = state.store().stats();
    Json(json!({
        "name": "resreg-server",
        "version": env!("CARGO_PKG_VERSION"),
        "identities": stats.identities,
        "records": stats.records,
    }))
}
