//! Étudiants API: REST CRUD backend for student records.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::AppError;
pub use model::{Etudiant, NewEtudiant, UpdateEtudiant};
pub use routes::{common_routes_with_ready, etudiant_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_etudiants_table, EtudiantStore, PgEtudiantStore};
