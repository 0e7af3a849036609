//! API route definitions

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::warn;

use super::types::{ApiError, MessageResponse, ModelResponse, UpdateModelRequest};
use super::AppState;
use crate::error::{CatalogError, CoverError, StorageError};

/// Largest accepted multipart payload (photos and templates)
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/models", get(get_models))
        .route("/generated_covers", get(get_generated_covers))
        .route("/generated_covers/:filename", get(get_generated_cover))
        .route("/add_model", post(add_model))
        .route("/update_model/:id", put(update_model))
        .route("/delete_model/:id", delete(delete_model))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

// ============================================================================
// Upload Handler
// ============================================================================

async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut image_bytes: Option<Vec<u8>> = None;
    let mut image_filename: Option<String> = None;
    let mut model_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("image") => {
                image_filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Invalid multipart payload: {}", e)))?;
                image_bytes = Some(bytes.to_vec());
            }
            Some("model") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Invalid multipart payload: {}", e)))?;
                model_name = Some(text);
            }
            _ => {}
        }
    }

    let image_bytes = image_bytes.ok_or_else(|| bad_request("No image uploaded!"))?;

    let model = match model_name {
        Some(name) => state.catalog.read().await.find_by_name(&name).cloned(),
        None => None,
    };
    let model = model.ok_or_else(|| bad_request("Invalid mobile model!"))?;

    let filename = image_filename
        .filter(|name| !name.is_empty())
        .ok_or_else(|| bad_request("No selected file!"))?;

    // The composite is pure CPU work, so keep it off the async workers
    let generator = state.generator.clone();
    let cover = tokio::task::spawn_blocking(move || generator.generate(&model, &filename, &image_bytes))
        .await
        .map_err(|e| internal(format!("Error processing images: {}", e)))?
        .map_err(|e| match e {
            CoverError::Storage(StorageError::TemplateNotFound { .. }) => {
                internal("Mobile cover template not found!")
            }
            other => {
                warn!("Cover generation failed: {}", other);
                internal(format!("Error processing images: {}", other))
            }
        })?;

    Ok(png_response(cover.png_bytes))
}

// ============================================================================
// Model Handlers
// ============================================================================

async fn get_models(State(state): State<AppState>) -> Json<Vec<ModelResponse>> {
    let catalog = state.catalog.read().await;
    Json(catalog.list().iter().map(ModelResponse::from).collect())
}

async fn add_model(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let mut model_name: Option<String> = None;
    let mut template_filename: Option<String> = None;
    let mut template_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("model_name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Invalid multipart payload: {}", e)))?;
                model_name = Some(text);
            }
            Some("template_file") => {
                template_filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Invalid multipart payload: {}", e)))?;
                template_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let (name, filename, bytes) = match (model_name, template_filename, template_bytes) {
        (Some(name), Some(filename), Some(bytes)) if !name.is_empty() && !filename.is_empty() => {
            (name, filename, bytes)
        }
        _ => return Err(bad_request("Model name and template file are required")),
    };

    let mut catalog = state.catalog.write().await;
    if catalog.find_by_name(&name).is_some() {
        return Err(bad_request("Model already exists"));
    }

    let stored_filename = state
        .storage
        .save_template(&filename, &bytes)
        .map_err(|e| match e {
            CoverError::Storage(StorageError::UnsafeFilename { name }) => {
                bad_request(format!("Invalid template filename: {}", name))
            }
            other => internal(other.to_string()),
        })?;
    catalog
        .add_model(&name, &stored_filename)
        .map_err(map_catalog_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "Model {} added successfully!",
            name
        ))),
    ))
}

async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateModelRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let mut catalog = state.catalog.write().await;
    let updated = catalog
        .update_model(id, req.model_name.as_deref(), req.template_filename.as_deref())
        .map_err(map_catalog_error)?;

    Ok(Json(MessageResponse::new(format!(
        "Model {} updated successfully!",
        updated.model_name
    ))))
}

async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let mut catalog = state.catalog.write().await;
    let removed = catalog.delete_model(id).map_err(map_catalog_error)?;

    Ok(Json(MessageResponse::new(format!(
        "Model {} deleted successfully!",
        removed.model_name
    ))))
}

// ============================================================================
// Generated Cover Handlers
// ============================================================================

async fn get_generated_covers(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let names = state
        .storage
        .list_generated()
        .map_err(|e| internal(format!("Error retrieving covers: {}", e)))?;

    Ok(Json(
        names
            .into_iter()
            .map(|name| format!("/generated_covers/{}", name))
            .collect(),
    ))
}

async fn get_generated_cover(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let bytes = state.storage.read_generated(&filename).map_err(|e| match e {
        CoverError::Storage(StorageError::CoverNotFound { name }) => {
            not_found(format!("Generated cover not found: {}", name))
        }
        CoverError::Storage(StorageError::UnsafeFilename { name }) => {
            bad_request(format!("Invalid cover filename: {}", name))
        }
        other => internal(format!("Error retrieving cover: {}", other)),
    })?;

    Ok(png_response(bytes))
}

// ============================================================================
// Helpers
// ============================================================================

fn png_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

fn map_catalog_error(error: CoverError) -> (StatusCode, Json<ApiError>) {
    match error {
        CoverError::Catalog(CatalogError::ModelNotFound { .. }) => not_found("Model not found"),
        CoverError::Catalog(CatalogError::DuplicateName { .. }) => {
            bad_request("Model name already exists")
        }
        other => internal(other.to_string()),
    }
}

fn bad_request<S: Into<String>>(message: S) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(message)))
}

fn not_found<S: Into<String>>(message: S) -> (StatusCode, Json<ApiError>) {
    (StatusCode::NOT_FOUND, Json(ApiError::new(message)))
}

fn internal<S: Into<String>>(message: S) -> (StatusCode, Json<ApiError>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError::new(message)))
}
