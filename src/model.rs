//! Record and payload types for the étudiant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored student record. Fields beyond the known schema travel in
/// `extra` and are flattened back into the JSON object on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Etudiant {
    pub id: Uuid,
    pub nom: String,
    pub prenom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filiere: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload: `nom` and `prenom` are required, everything else is
/// optional and unknown keys are accepted verbatim.
#[derive(Clone, Debug, Deserialize)]
pub struct NewEtudiant {
    pub nom: String,
    pub prenom: String,
    #[serde(default)]
    pub filiere: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Update payload: every field optional. An absent (or null) field leaves
/// the stored value unchanged; `extra` keys are merged over stored ones.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateEtudiant {
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    #[serde(default)]
    pub filiere: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys owned by the storage layer. Clients cannot set them; left in
/// `extra` they would collide with the named fields on serialization.
const RESERVED_KEYS: &[&str] = &["id", "created_at", "updated_at"];

impl NewEtudiant {
    pub fn strip_reserved(&mut self) {
        for key in RESERVED_KEYS {
            self.extra.remove(*key);
        }
    }
}

impl UpdateEtudiant {
    pub fn strip_reserved(&mut self) {
        for key in RESERVED_KEYS {
            self.extra.remove(*key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_requires_nom_and_prenom() {
        let err = serde_json::from_value::<NewEtudiant>(json!({ "prenom": "Ben" })).unwrap_err();
        assert!(err.to_string().contains("nom"));
    }

    #[test]
    fn create_payload_accepts_unknown_fields() {
        let p: NewEtudiant = serde_json::from_value(json!({
            "nom": "Ali",
            "prenom": "Ben",
            "age": 21,
            "email": "ali@example.com"
        }))
        .unwrap();
        assert_eq!(p.nom, "Ali");
        assert!(p.filiere.is_none());
        assert_eq!(p.extra["age"], json!(21));
        assert_eq!(p.extra["email"], json!("ali@example.com"));
    }

    #[test]
    fn update_payload_may_carry_a_single_field() {
        let p: UpdateEtudiant = serde_json::from_value(json!({ "filiere": "X" })).unwrap();
        assert_eq!(p.filiere.as_deref(), Some("X"));
        assert!(p.nom.is_none());
        assert!(p.prenom.is_none());
        assert!(p.extra.is_empty());
    }

    #[test]
    fn reserved_keys_are_dropped_from_payload_extras() {
        let mut p: NewEtudiant = serde_json::from_value(json!({
            "nom": "Ali",
            "prenom": "Ben",
            "id": "11111111-1111-1111-1111-111111111111",
            "created_at": "2026-01-01T00:00:00Z",
            "age": 21
        }))
        .unwrap();
        p.strip_reserved();
        assert!(p.extra.get("id").is_none());
        assert!(p.extra.get("created_at").is_none());
        assert_eq!(p.extra["age"], json!(21));
    }

    #[test]
    fn record_serializes_extra_fields_inline() {
        let mut extra = Map::new();
        extra.insert("age".into(), json!(21));
        let now = Utc::now();
        let e = Etudiant {
            id: Uuid::new_v4(),
            nom: "Ali".into(),
            prenom: "Ben".into(),
            filiere: None,
            extra,
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["age"], json!(21));
        assert_eq!(v["nom"], "Ali");
        // absent filière is omitted, not null
        assert!(v.get("filiere").is_none());
    }
}
