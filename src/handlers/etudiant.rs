//! Étudiant CRUD handlers: create, list, read, update, delete, plus the
//! two filtered lookups (filière, free-text search).
//!
//! Each handler performs one storage call and converts the outcome into
//! the response envelope; create additionally runs the duplicate
//! pre-check before inserting.

use crate::error::AppError;
use crate::model::{NewEtudiant, UpdateEtudiant};
use crate::response;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

pub async fn list(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let etudiants = state.store.find_all().await?;
    Ok(response::success_many(etudiants))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    tracing::info!(body = %body, "création d'un étudiant");
    let mut payload: NewEtudiant =
        serde_json::from_value(body).map_err(|e| AppError::InvalidData(e.to_string()))?;
    payload.strip_reserved();

    // Pre-insert lookup only; two concurrent creates with the same names
    // can both pass this check.
    if state
        .store
        .find_by_nom_prenom(&payload.nom, &payload.prenom)
        .await
        .map_err(AppError::into_create_failure)?
        .is_some()
    {
        return Err(AppError::Duplicate);
    }

    let etudiant = state
        .store
        .insert(payload)
        .await
        .map_err(AppError::into_create_failure)?;
    Ok(response::created("Étudiant créé avec succès", etudiant))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    tracing::debug!(%id, "recherche par id");
    let etudiant = state.store.find_by_id(&id).await?.ok_or(AppError::NotFound)?;
    Ok(response::success_one(etudiant))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    tracing::info!(%id, body = %body, "mise à jour");
    let mut payload: UpdateEtudiant =
        serde_json::from_value(body).map_err(|e| AppError::UpdateRejected(e.to_string()))?;
    payload.strip_reserved();
    // No duplicate-name re-check here; only create guards the pair.
    let etudiant = state
        .store
        .update(&id, payload)
        .await
        .map_err(AppError::into_update_failure)?
        .ok_or(AppError::NotFound)?;
    Ok(response::success_one_with_message(
        "Étudiant mis à jour avec succès",
        etudiant,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    tracing::info!(%id, "suppression");
    if !state.store.delete(&id).await? {
        return Err(AppError::NotFound);
    }
    Ok(response::success_one_with_message(
        "Étudiant supprimé avec succès",
        serde_json::json!({}),
    ))
}

pub async fn by_filiere(
    State(state): State<AppState>,
    Path(filiere): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    tracing::debug!(%filiere, "recherche par filière");
    let etudiants = state.store.find_by_filiere(&filiere).await?;
    Ok(response::success_many_filiere(&filiere, etudiants))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let q = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("Le paramètre de recherche q est requis".into())
        })?;
    tracing::debug!(%q, "recherche par nom ou prénom");
    let etudiants = state.store.search(q).await?;
    Ok(response::success_many(etudiants))
}
