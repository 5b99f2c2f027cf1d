//! Saved reports and generated report downloads

use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};

use shoestore_core::audit::AuditEvent;
use shoestore_core::domain::{NewReport, ReportFormat, ReportKind, SavedReport};

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::response::{created, ApiResponse};
use crate::state::AppState;

pub async fn save_report(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<NewReport>,
) -> Result<Response, ApiError> {
    let owner = payload.user_id.unwrap_or(identity.user_id);
    let report = state.reports.save(payload, owner).await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("CREATE")
            .entity("report")
            .entity_id(report.id)
            .details(format!("Saved report: {}", report.report_name)),
    );
    Ok(created(report))
}

pub async fn list_reports(State(state): State<AppState>) -> Result<ApiResponse<Vec<SavedReport>>, ApiError> {
    Ok(ApiResponse::success(state.repos.reports.list().await?))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<SavedReport>, ApiError> {
    let report = state
        .repos
        .reports
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Report"))?;
    Ok(ApiResponse::success(report))
}

/// GET /reports/{kind}/{format}
pub async fn generate_report(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path((kind, format)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let kind = ReportKind::parse(&kind)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown report type: {}", kind)))?;
    let format = ReportFormat::parse(&format)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown report format: {}", format)))?;

    let report = state.reports.generate(kind, format).await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new(format.audit_action())
            .entity("report")
            .details(format!("Generated {}", report.filename)),
    );

    Ok((
        [
            (CONTENT_TYPE, report.content_type.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", report.filename)),
        ],
        report.bytes,
    )
        .into_response())
}
