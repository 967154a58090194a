//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("un étudiant avec le même nom et prénom existe déjà")]
    Duplicate,
    #[error("données invalides: {0}")]
    InvalidData(String),
    #[error("erreur de mise à jour: {0}")]
    UpdateRejected(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("étudiant non trouvé")]
    NotFound,
    #[error("identifiant invalide: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Collapse a storage failure during create into the create-time
    /// client error, keeping the underlying cause; conditions that are
    /// already client-visible pass through. Create and update never
    /// answer 500.
    pub fn into_create_failure(self) -> AppError {
        match self {
            AppError::Db(e) => AppError::InvalidData(e.to_string()),
            AppError::InvalidId(e) => AppError::InvalidData(e.to_string()),
            other => other,
        }
    }

    /// Same collapsing for update: storage faults and unparseable ids
    /// surface as the update rejection.
    pub fn into_update_failure(self) -> AppError {
        match self {
            AppError::Db(e) => AppError::UpdateRejected(e.to_string()),
            AppError::InvalidId(e) => AppError::UpdateRejected(e.to_string()),
            other => other,
        }
    }

    /// Status plus the user-facing message and optional raw cause.
    fn parts(&self) -> (StatusCode, String, Option<String>) {
        match self {
            AppError::Duplicate => (
                StatusCode::BAD_REQUEST,
                "Un étudiant avec le même nom et prénom existe déjà".into(),
                None,
            ),
            AppError::InvalidData(detail) => (
                StatusCode::BAD_REQUEST,
                "Données invalides".into(),
                Some(detail.clone()),
            ),
            AppError::UpdateRejected(detail) => (
                StatusCode::BAD_REQUEST,
                "Erreur de mise à jour".into(),
                Some(detail.clone()),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone(), None),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Étudiant non trouvé".into(), None),
            // Id parsing happens in the storage layer; on read/delete
            // paths its failure is a server fault, not a client error.
            AppError::InvalidId(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erreur serveur".into(),
                Some(e.to_string()),
            ),
            AppError::Db(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erreur serveur".into(),
                Some(e.to_string()),
            ),
        }
    }
}

/// Failure half of the response envelope: `success` is always false,
/// `error` carries the underlying cause when there is one.
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, error) = self.parts();
        let body = ErrorBody {
            success: false,
            message,
            error,
        };
        (status, Json(body)).into_response()
    }
}
