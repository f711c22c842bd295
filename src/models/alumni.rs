// ============================================================================
// MODÈLE : ALUMNI
// ============================================================================
//
// Description:
//   Un profil d'ancien élève. Table "alumni", créée au démarrage à partir de
//   cette entité si elle n'existe pas encore (voir db::postgres).
//
// Colonnes de la table alumni:
//   - id (UUID, PRIMARY KEY) - UUID v4 généré par le service
//   - name, batch, current_company, job_role, location (VARCHAR, NOT NULL)
//   - email (VARCHAR, UNIQUE, NOT NULL) - toujours stocké en minuscules
//   - phone, linked_in, bio (NULL si absent)
//   - skills (JSONB) - tableau de chaînes, [] par défaut
//   - is_verified (BOOLEAN) - false à l'inscription
//   - created_at / updated_at (TIMESTAMPTZ)
//
// Points d'attention:
//   - L'unicité de l'email repose sur la contrainte UNIQUE (insert atomique)
//   - updated_at ne recule jamais, voir next_write_time()
//   - Le JSON exposé est en camelCase (currentCompany, isVerified, ...)
//
// ============================================================================

use chrono::{DurationRound, Utc};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alumni")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub batch: String,
    pub current_company: String,
    pub job_role: String,
    pub location: String,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: Skills,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Compétences d'un profil, dans l'ordre saisi. Stockées en JSONB.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Skills(pub Vec<String>);

impl From<Vec<String>> for Skills {
    fn from(skills: Vec<String>) -> Self {
        Self(skills)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Heure courante tronquée à la microseconde (précision de TIMESTAMPTZ),
/// pour que la valeur relue en base soit identique à celle écrite.
pub fn now_micros() -> DateTimeUtc {
    let now = Utc::now();
    now.duration_trunc(chrono::Duration::microseconds(1))
        .unwrap_or(now)
}

/// Horodatage d'une écriture: `now`, mais toujours strictement après `previous`.
pub fn next_write_time(previous: DateTimeUtc, now: DateTimeUtc) -> DateTimeUtc {
    let floor = previous + chrono::Duration::microseconds(1);
    if now >= floor { now } else { floor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_write_time_moves_forward() {
        let previous = now_micros();

        let later = previous + chrono::Duration::seconds(3);
        assert_eq!(next_write_time(previous, later), later);

        // horloge figée ou en retard
        assert_eq!(
            next_write_time(previous, previous),
            previous + chrono::Duration::microseconds(1)
        );
        let earlier = previous - chrono::Duration::seconds(1);
        assert!(next_write_time(previous, earlier) > previous);
    }

    #[test]
    fn test_now_micros_has_no_sub_microsecond_part() {
        let now = now_micros();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_model_serializes_in_camel_case() {
        let now = now_micros();
        let model = Model {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            batch: "2020".to_string(),
            current_company: "Acme".to_string(),
            job_role: "Engineer".to_string(),
            location: "London".to_string(),
            phone: None,
            linked_in: Some("https://linkedin.com/in/ada".to_string()),
            skills: Skills(vec!["rust".to_string(), "sql".to_string()]),
            bio: None,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["currentCompany"], "Acme");
        assert_eq!(json["jobRole"], "Engineer");
        assert_eq!(json["linkedIn"], "https://linkedin.com/in/ada");
        assert_eq!(json["isVerified"], false);
        assert_eq!(json["skills"], serde_json::json!(["rust", "sql"]));

        let back: Model = serde_json::from_value(json).unwrap();
        assert_eq!(back, model);
    }
}
