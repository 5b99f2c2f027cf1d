//! Database backup administration

use axum::{
    extract::{Multipart, Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use shoestore_core::audit::AuditEvent;
use shoestore_core::DomainError;

use crate::dto::{BackupCreated, BackupInfo};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::response::Ack;
use crate::state::AppState;

/// POST /admin/backup
pub async fn create_backup(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<BackupCreated>, ApiError> {
    let file = state.backups.create().await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("BACKUP")
            .entity("database")
            .details(format!("Created backup {} ({:.2} MB)", file.filename, file.size_mb)),
    );
    Ok(Json(BackupCreated {
        message: "Backup created successfully".into(),
        success: true,
        file_path: file.path,
    }))
}

/// GET /admin/backup/info
pub async fn backup_info(State(state): State<AppState>) -> Result<Json<BackupInfo>, ApiError> {
    let files = state.backups.list().await?;
    Ok(Json(BackupInfo {
        total_files: files.len(),
        backup_files: files,
        backup_directory: state.backups.directory().display().to_string(),
    }))
}

/// POST /admin/backup/restore, multipart field `file`
pub async fn restore_backup(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<Ack>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Could not read upload: {}", e)))?;
        upload = Some((name, bytes));
        break;
    }

    let (name, bytes) = upload.ok_or_else(|| ApiError::BadRequest("Backup file is required".into()))?;
    state.backups.restore(&name, &bytes).await?;

    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("RESTORE")
            .entity("database")
            .details(format!("Restored database from {}", name)),
    );
    Ok(Json(Ack::ok("Database restored successfully")))
}

/// GET /admin/backup/download/{filename}
pub async fn download_backup(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state.backups.locate(&filename).await?;
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        warn!("Could not read backup {}: {}", filename, e);
        DomainError::from(e)
    })?;

    Ok((
        [
            (CONTENT_TYPE, "application/sql".to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        bytes,
    )
        .into_response())
}

/// DELETE /admin/backup/{filename}
pub async fn delete_backup(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(filename): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.backups.delete(&filename).await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("DELETE")
            .entity("backup")
            .details(format!("Deleted backup {}", filename)),
    );
    Ok(StatusCode::NO_CONTENT)
}
