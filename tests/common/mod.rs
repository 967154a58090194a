//! Shared test support: an in-memory `EtudiantStore` and a router factory.

use async_trait::async_trait;
use chrono::Utc;
use etudiants_api::{
    etudiant_routes, AppError, AppState, Etudiant, EtudiantStore, NewEtudiant, UpdateEtudiant,
};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory store with the same observable behavior as the PostgreSQL
/// implementation: ids are parsed here, lookups distinguish missing from
/// fault, search is a case-insensitive substring match.
#[derive(Default)]
pub struct MemStore {
    records: Mutex<Vec<Etudiant>>,
}

#[async_trait]
impl EtudiantStore for MemStore {
    async fn find_all(&self) -> Result<Vec<Etudiant>, AppError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Etudiant>, AppError> {
        let id = Uuid::from_str(id)?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_by_nom_prenom(
        &self,
        nom: &str,
        prenom: &str,
    ) -> Result<Option<Etudiant>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.nom == nom && e.prenom == prenom)
            .cloned())
    }

    async fn find_by_filiere(&self, filiere: &str) -> Result<Vec<Etudiant>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.filiere.as_deref() == Some(filiere))
            .cloned()
            .collect())
    }

    async fn search(&self, q: &str) -> Result<Vec<Etudiant>, AppError> {
        let q = q.to_lowercase();
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                e.nom.to_lowercase().contains(&q) || e.prenom.to_lowercase().contains(&q)
            })
            .cloned()
            .collect())
    }

    async fn insert(&self, payload: NewEtudiant) -> Result<Etudiant, AppError> {
        let now = Utc::now();
        let etudiant = Etudiant {
            id: Uuid::new_v4(),
            nom: payload.nom,
            prenom: payload.prenom,
            filiere: payload.filiere,
            extra: payload.extra,
            created_at: now,
            updated_at: now,
        };
        self.records.lock().unwrap().push(etudiant.clone());
        Ok(etudiant)
    }

    async fn update(
        &self,
        id: &str,
        payload: UpdateEtudiant,
    ) -> Result<Option<Etudiant>, AppError> {
        let id = Uuid::from_str(id)?;
        let mut records = self.records.lock().unwrap();
        let Some(e) = records.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(nom) = payload.nom {
            e.nom = nom;
        }
        if let Some(prenom) = payload.prenom {
            e.prenom = prenom;
        }
        if let Some(filiere) = payload.filiere {
            e.filiere = Some(filiere);
        }
        for (k, v) in payload.extra {
            e.extra.insert(k, v);
        }
        e.updated_at = Utc::now();
        Ok(Some(e.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let id = Uuid::from_str(id)?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|e| e.id != id);
        Ok(records.len() < before)
    }
}

/// Router wired exactly as in `main`, backed by a fresh in-memory store.
pub fn test_app() -> axum::Router {
    let state = AppState::new(Arc::new(MemStore::default()));
    axum::Router::new().nest("/api/etudiants", etudiant_routes(state))
}
