//! Roster import handler.
//!
//! - POST /admin/students/import — roster upload, runs the pipeline and
//!   returns the batch report.

use axum::{Extension, Json};
use std::sync::Arc;

use kardex_db::RosterStore;

use crate::error::RosterImportError;
use crate::invite::InviteSender;
use crate::models::{BatchReport, Delimiter};
use crate::services::import_service;

/// Maximum accepted roster size (5 MB). Files are held in memory.
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// POST /admin/students/import
///
/// Multipart upload: a `file` field with the roster (.csv) and an optional
/// `delimiter` field (`,`, `;`, `\t`, `|`). The pipeline runs to completion
/// before the response; the report reflects what was durably stored.
pub async fn import_roster(
    Extension(store): Extension<Arc<dyn RosterStore>>,
    Extension(invite_sender): Extension<Arc<dyn InviteSender>>,
    mut multipart: axum_extra::extract::Multipart,
) -> Result<Json<BatchReport>, RosterImportError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut delimiter = Delimiter::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RosterImportError::Internal(format!("Multipart read error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(std::string::ToString::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    RosterImportError::Internal(format!("Failed to read file: {e}"))
                })?;
                file_data = Some(bytes.to_vec());
            }
            "delimiter" => {
                let text = field.text().await.map_err(|e| {
                    RosterImportError::Internal(format!("Failed to read field: {e}"))
                })?;
                delimiter =
                    Delimiter::parse(text.trim()).map_err(RosterImportError::InvalidUpload)?;
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let data = file_data.ok_or_else(|| {
        RosterImportError::InvalidUpload("No 'file' field found in multipart upload".to_string())
    })?;

    if data.len() > MAX_FILE_SIZE {
        return Err(RosterImportError::InvalidUpload(format!(
            "File size {} bytes exceeds maximum of {MAX_FILE_SIZE} bytes",
            data.len()
        )));
    }

    let fname = file_name.unwrap_or_else(|| "roster.csv".to_string());
    if !fname.to_lowercase().ends_with(".csv") {
        return Err(RosterImportError::InvalidUpload(
            "File must have a .csv extension".to_string(),
        ));
    }

    // The upload widget declares UTF-8; undecodable bytes degrade to the
    // replacement character instead of failing the batch.
    let text = String::from_utf8_lossy(&data);

    tracing::info!(file_name = %fname, bytes = data.len(), "Roster upload received");

    let report =
        import_service::import_roster(store.as_ref(), invite_sender.as_ref(), &text, delimiter)
            .await?;

    Ok(Json(report))
}
