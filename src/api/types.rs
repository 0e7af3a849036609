//! API request/response types
//!
//! These types are used for JSON serialization in API endpoints.

use serde::{Deserialize, Serialize};

use crate::catalog::MobileModel;

// ============================================================================
// Error Body
// ============================================================================

/// JSON error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// ============================================================================
// Model Types
// ============================================================================

/// A catalog record as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    pub id: i64,
    pub model_name: String,
    pub template_filename: String,
    pub created_at: String,
}

impl From<&MobileModel> for ModelResponse {
    fn from(model: &MobileModel) -> Self {
        Self {
            id: model.id,
            model_name: model.model_name.clone(),
            template_filename: model.template_filename.clone(),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Partial update for an existing model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateModelRequest {
    pub model_name: Option<String>,
    pub template_filename: Option<String>,
}

// ============================================================================
// Message Types
// ============================================================================

/// Simple confirmation body for mutating endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}
