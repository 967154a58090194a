//! Persistence layer: the `EtudiantStore` seam and its PostgreSQL
//! implementation, plus the startup DDL.

use crate::error::AppError;
use crate::model::{Etudiant, NewEtudiant, UpdateEtudiant};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

/// Storage operations the handlers depend on. One method per persistence
/// call; identifiers arrive as raw path segments and are parsed here, so
/// a malformed id surfaces as a storage fault rather than a client error.
#[async_trait]
pub trait EtudiantStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Etudiant>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Etudiant>, AppError>;
    async fn find_by_nom_prenom(
        &self,
        nom: &str,
        prenom: &str,
    ) -> Result<Option<Etudiant>, AppError>;
    async fn find_by_filiere(&self, filiere: &str) -> Result<Vec<Etudiant>, AppError>;
    /// Case-insensitive substring match on `nom` or `prenom`.
    async fn search(&self, q: &str) -> Result<Vec<Etudiant>, AppError>;
    async fn insert(&self, payload: NewEtudiant) -> Result<Etudiant, AppError>;
    /// Applies only the provided fields. Returns `None` when no record has
    /// this id.
    async fn update(
        &self,
        id: &str,
        payload: UpdateEtudiant,
    ) -> Result<Option<Etudiant>, AppError>;
    /// Returns `false` when no record had this id.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

const COLUMNS: &str = "id, nom, prenom, filiere, extra, created_at, updated_at";

/// `EtudiantStore` over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgEtudiantStore {
    pool: PgPool,
}

impl PgEtudiantStore {
    pub fn new(pool: PgPool) -> Self {
        PgEtudiantStore { pool }
    }
}

#[async_trait]
impl EtudiantStore for PgEtudiantStore {
    async fn find_all(&self) -> Result<Vec<Etudiant>, AppError> {
        let sql = format!("SELECT {} FROM etudiants ORDER BY created_at", COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_etudiant).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Etudiant>, AppError> {
        let id = Uuid::from_str(id)?;
        let sql = format!("SELECT {} FROM etudiants WHERE id = $1", COLUMNS);
        tracing::debug!(sql = %sql, %id, "query");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_etudiant).transpose()
    }

    async fn find_by_nom_prenom(
        &self,
        nom: &str,
        prenom: &str,
    ) -> Result<Option<Etudiant>, AppError> {
        let sql = format!(
            "SELECT {} FROM etudiants WHERE nom = $1 AND prenom = $2",
            COLUMNS
        );
        tracing::debug!(sql = %sql, nom, prenom, "query");
        let row = sqlx::query(&sql)
            .bind(nom)
            .bind(prenom)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_etudiant).transpose()
    }

    async fn find_by_filiere(&self, filiere: &str) -> Result<Vec<Etudiant>, AppError> {
        let sql = format!(
            "SELECT {} FROM etudiants WHERE filiere = $1 ORDER BY created_at",
            COLUMNS
        );
        tracing::debug!(sql = %sql, filiere, "query");
        let rows = sqlx::query(&sql)
            .bind(filiere)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_etudiant).collect()
    }

    async fn search(&self, q: &str) -> Result<Vec<Etudiant>, AppError> {
        let pattern = format!("%{}%", escape_like(q));
        let sql = format!(
            "SELECT {} FROM etudiants WHERE nom ILIKE $1 OR prenom ILIKE $1 ORDER BY created_at",
            COLUMNS
        );
        tracing::debug!(sql = %sql, q, "query");
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_etudiant).collect()
    }

    async fn insert(&self, payload: NewEtudiant) -> Result<Etudiant, AppError> {
        let sql = format!(
            "INSERT INTO etudiants (id, nom, prenom, filiere, extra) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        let id = Uuid::new_v4();
        tracing::debug!(sql = %sql, %id, "query");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&payload.nom)
            .bind(&payload.prenom)
            .bind(&payload.filiere)
            .bind(Value::Object(payload.extra))
            .fetch_one(&self.pool)
            .await?;
        row_to_etudiant(&row)
    }

    async fn update(
        &self,
        id: &str,
        payload: UpdateEtudiant,
    ) -> Result<Option<Etudiant>, AppError> {
        let id = Uuid::from_str(id)?;
        let sql = format!(
            "UPDATE etudiants SET \
             nom = COALESCE($2, nom), \
             prenom = COALESCE($3, prenom), \
             filiere = COALESCE($4, filiere), \
             extra = extra || $5, \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, %id, "query");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&payload.nom)
            .bind(&payload.prenom)
            .bind(&payload.filiere)
            .bind(Value::Object(payload.extra))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_etudiant).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let id = Uuid::from_str(id)?;
        let sql = "DELETE FROM etudiants WHERE id = $1 RETURNING id";
        tracing::debug!(sql = %sql, %id, "query");
        let row = sqlx::query(sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }
}

fn row_to_etudiant(row: &PgRow) -> Result<Etudiant, AppError> {
    let extra: Value = row.try_get("extra")?;
    let extra = match extra {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    Ok(Etudiant {
        id: row.try_get("id")?,
        nom: row.try_get("nom")?,
        prenom: row.try_get("prenom")?,
        filiere: row.try_get("filiere")?,
        extra,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Escape LIKE metacharacters in user input so the query matches them
/// literally (backslash is the default escape character).
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Create the etudiants table if absent. Ids are generated in Rust at
/// insert time, so the table carries no default for `id`.
///
/// `(nom, prenom)` intentionally has no unique index: duplicate detection
/// is a pre-insert lookup in the create handler, and two concurrent
/// creates can still race past it.
pub async fn ensure_etudiants_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = r#"
        CREATE TABLE IF NOT EXISTS etudiants (
            id UUID PRIMARY KEY,
            nom TEXT NOT NULL,
            prenom TEXT NOT NULL,
            filiere TEXT,
            extra JSONB NOT NULL DEFAULT '{}'::jsonb,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#;
    sqlx::query(ddl).execute(pool).await?;
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not.
/// Connects to the default `postgres` database to run CREATE DATABASE.
/// Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await
            .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_passes_plain_text() {
        assert_eq!(escape_like("ali"), "ali");
    }

    #[test]
    fn escape_like_quotes_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn db_name_extracted_from_url() {
        let (admin, name) = parse_db_name_from_url("postgres://localhost/etudiants").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres");
        assert_eq!(name, "etudiants");
    }

    #[test]
    fn db_name_ignores_query_string() {
        let (_, name) =
            parse_db_name_from_url("postgres://localhost/etudiants?sslmode=disable").unwrap();
        assert_eq!(name, "etudiants");
    }
}
