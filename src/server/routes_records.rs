//! Record upload, listing, edit, and delete routes.
//!
//! Handlers read multipart forms into a [`RecordForm`] and hand them to the
//! [`RecordService`](crate::records::RecordService) on the blocking pool,
//! since the stores do synchronous file I/O.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use menagerie_common::{Record, RecordId};
use serde::Deserialize;

use super::{ApiError, AppContext};
use crate::records::{RecordForm, RecordService, UploadedFile, IMAGE_FIELD};

/// Create record routes.
pub fn record_routes() -> Router<AppContext> {
    Router::new()
        .route("/upload", post(upload_record))
        .route("/uploads-data", get(list_records))
        .route("/uploads-data/", get(list_records))
        .route("/edit", put(edit_record))
        .route("/delete", delete(delete_record))
}

// ============================================================================
// Request types
// ============================================================================

/// Query parameters for the delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a record from a multipart form with six text fields and an image.
async fn upload_record(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Json<Record>, ApiError> {
    let form = read_form(multipart).await?;
    let record = run_blocking(&ctx, move |records| records.create(form)).await?;
    Ok(Json(record))
}

/// List every record in insertion order.
async fn list_records(State(ctx): State<AppContext>) -> Json<Vec<Record>> {
    Json(ctx.records.list_all())
}

/// Overwrite a record's fields, replacing its image if one is attached.
async fn edit_record(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Json<Record>, ApiError> {
    let form = read_form(multipart).await?;
    let id = form.record_id()?;
    let record = run_blocking(&ctx, move |records| records.update(id, form)).await?;
    Ok(Json(record))
}

/// Delete a record and its image.
async fn delete_record(
    State(ctx): State<AppContext>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(query.id.as_deref())?;
    run_blocking(&ctx, move |records| records.delete(id)).await?;
    Ok(StatusCode::OK)
}

// ============================================================================
// Helpers
// ============================================================================

/// Collect the text fields and the image of a multipart body.
///
/// Unknown fields are skipped.
async fn read_form(mut multipart: Multipart) -> Result<RecordForm, ApiError> {
    let mut form = RecordForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            form.set_image(UploadedFile::new(file_name, data))?;
        } else {
            let value = field.text().await?;
            if !form.set_text(&name, value) {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

fn parse_id(raw: Option<&str>) -> Result<RecordId, ApiError> {
    let raw = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("missing required query parameter: id"))?;
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid id: {raw:?}")))
}

/// Run a record operation on the blocking thread pool.
async fn run_blocking<T, F>(ctx: &AppContext, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&RecordService) -> menagerie_common::Result<T> + Send + 'static,
{
    let records = ctx.records.clone();
    tokio::task::spawn_blocking(move || op(records.as_ref()))
        .await
        .map_err(|e| ApiError::internal(format!("record task failed: {e}")))?
        .map_err(ApiError::from)
}
