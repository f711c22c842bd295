//pour les requêtes et la réponse structurée
use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::alumni::{self, Skills};

// ============================================================================
// REQUÊTES
// ============================================================================

/// Corps de POST /api/alumni/register.
/// Les champs requis absents du JSON arrivent vides et sont rejetés par validate().
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAlumniRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Please provide a valid email")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Batch year is required"))]
    pub batch: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Current company is required"))]
    pub current_company: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Job role is required"))]
    pub job_role: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// texte libre (ex: linkedin.com/in/x), aucun format imposé
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
}

impl RegisterAlumniRequest {
    /// Trim des champs texte (sauf bio, gardée telle quelle), email en minuscules,
    /// compétences vides retirées. Un champ optionnel vide après trim devient None.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.email);
        self.email = self.email.to_lowercase();
        trim_in_place(&mut self.batch);
        trim_in_place(&mut self.current_company);
        trim_in_place(&mut self.job_role);
        trim_in_place(&mut self.location);
        self.phone = clean_optional(self.phone.take());
        self.linked_in = clean_optional(self.linked_in.take());
        self.bio = blank_to_none(self.bio.take());
        self.skills = clean_skills(std::mem::take(&mut self.skills));
    }

    /// Construit l'enregistrement à insérer (isVerified = false, createdAt = updatedAt = now).
    pub fn into_record(self, id: Uuid, now: DateTimeUtc) -> alumni::Model {
        alumni::Model {
            id,
            name: self.name,
            email: self.email,
            batch: self.batch,
            current_company: self.current_company,
            job_role: self.job_role,
            location: self.location,
            phone: self.phone,
            linked_in: self.linked_in,
            skills: Skills(self.skills),
            bio: self.bio,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Corps de PUT /api/alumni/{id}: seuls les champs fournis sont vérifiés et modifiés.
/// id, createdAt et isVerified ne font pas partie du DTO et sont ignorés.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlumniRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Batch year is required"))]
    pub batch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Current company is required"))]
    pub current_company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Job role is required"))]
    pub job_role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,

    /// "" efface le téléphone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// "" efface le lien
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,

    /// "" efface la bio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
}

impl UpdateAlumniRequest {
    /// Même nettoyage que l'inscription. Les champs requis vides restent Some("")
    /// pour être rejetés par validate(); les optionnels vides restent Some("")
    /// et signifient "effacer" (voir into_changes).
    pub fn normalize(&mut self) {
        for field in [
            &mut self.name,
            &mut self.email,
            &mut self.batch,
            &mut self.current_company,
            &mut self.job_role,
            &mut self.location,
            &mut self.phone,
            &mut self.linked_in,
        ]
        .into_iter()
        .flatten()
        {
            trim_in_place(field);
        }
        if let Some(email) = self.email.as_mut() {
            *email = email.to_lowercase();
        }
        self.skills = self.skills.take().map(clean_skills);
    }

    /// À appeler après validate().
    pub fn into_changes(self) -> AlumniChanges {
        AlumniChanges {
            name: self.name,
            email: self.email,
            batch: self.batch,
            current_company: self.current_company,
            job_role: self.job_role,
            location: self.location,
            phone: self.phone.map(|v| clean_optional(Some(v))),
            linked_in: self.linked_in.map(|v| clean_optional(Some(v))),
            skills: self.skills,
            bio: self.bio.map(|v| blank_to_none(Some(v))),
            is_verified: None,
        }
    }
}

/// Modifications validées appliquées à un enregistrement existant.
/// `Some(None)` sur un champ optionnel l'efface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlumniChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub batch: Option<String>,
    pub current_company: Option<String>,
    pub job_role: Option<String>,
    pub location: Option<String>,
    pub phone: Option<Option<String>>,
    pub linked_in: Option<Option<String>>,
    pub skills: Option<Vec<String>>,
    pub bio: Option<Option<String>>,
    pub is_verified: Option<bool>,
}

impl AlumniChanges {
    pub fn verify() -> Self {
        Self {
            is_verified: Some(true),
            ..Default::default()
        }
    }

    /// Applique les champs fournis; updated_at passe à `updated_at`.
    pub fn apply(self, record: &mut alumni::Model, updated_at: DateTimeUtc) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(batch) = self.batch {
            record.batch = batch;
        }
        if let Some(current_company) = self.current_company {
            record.current_company = current_company;
        }
        if let Some(job_role) = self.job_role {
            record.job_role = job_role;
        }
        if let Some(location) = self.location {
            record.location = location;
        }
        if let Some(phone) = self.phone {
            record.phone = phone;
        }
        if let Some(linked_in) = self.linked_in {
            record.linked_in = linked_in;
        }
        if let Some(skills) = self.skills {
            record.skills = Skills(skills);
        }
        if let Some(bio) = self.bio {
            record.bio = bio;
        }
        if let Some(is_verified) = self.is_verified {
            record.is_verified = is_verified;
        }
        record.updated_at = updated_at;
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// la bio compte ses espaces pour la limite de 500
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ============================================================================
// RÉPONSES
// ============================================================================

/// Enveloppe commune à toutes les réponses: { success, message?, data?, count?, error? }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    // pas de `default` ici: il exigerait T: Default pour décoder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

impl ApiResponse<()> {
    /// Succès sans data (ex: suppression)
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            count: None,
            error: None,
        }
    }
}

/// Résultat de la liste filtrée du répertoire
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pub alumni: Vec<alumni::Model>,
    pub count: usize,
}

// le dashboard admin lit `_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    #[serde(rename = "_id")]
    pub key: String,
    pub count: u64,
}

impl GroupCount {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlumniStats {
    pub total_alumni: u64,
    pub verified_alumni: u64,
    pub unverified_alumni: u64,
    pub batch_stats: Vec<GroupCount>,
    pub top_companies: Vec<GroupCount>,
}

impl AlumniStats {
    pub fn new(
        total_alumni: u64,
        verified_alumni: u64,
        batch_stats: Vec<GroupCount>,
        top_companies: Vec<GroupCount>,
    ) -> Self {
        Self {
            total_alumni,
            verified_alumni,
            // les deux comptages ne sont pas faits dans un même snapshot
            unverified_alumni: total_alumni.saturating_sub(verified_alumni),
            batch_stats,
            top_companies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterAlumniRequest {
        RegisterAlumniRequest {
            name: "  A B ".to_string(),
            email: " AB@X.com ".to_string(),
            batch: "2020".to_string(),
            current_company: "Acme".to_string(),
            job_role: "Eng".to_string(),
            location: "NY".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let mut request = valid_request();
        request.phone = Some("   ".to_string());
        request.skills = vec![" rust ".to_string(), "".to_string(), "sql".to_string()];

        request.normalize();

        assert_eq!(request.name, "A B");
        assert_eq!(request.email, "ab@x.com");
        assert_eq!(request.phone, None);
        assert_eq!(request.skills, vec!["rust", "sql"]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_missing_required_fields_are_reported() {
        let mut request: RegisterAlumniRequest =
            serde_json::from_value(serde_json::json!({ "name": "   ", "email": "ab@x.com" })).unwrap();
        request.normalize();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["name", "batch", "location"] {
            assert!(fields.contains_key(field), "{field} should be rejected");
        }
        assert!(fields.contains_key("current_company") || fields.contains_key("currentCompany"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_email_must_be_well_formed() {
        let mut request = valid_request();
        request.email = "not-an-email".to_string();
        request.normalize();

        assert!(request.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_bio_limit_is_500_characters() {
        let mut request = valid_request();
        request.bio = Some("é".repeat(500));
        request.normalize();
        assert!(request.validate().is_ok());

        request.bio = Some("a".repeat(501));
        assert!(request.validate().unwrap_err().field_errors().contains_key("bio"));
    }

    #[test]
    fn test_linked_in_is_free_text() {
        for link in ["linkedin.com/in/ab", "www.linkedin.com/in/ab", "https://www.linkedin.com/in/ab"] {
            let mut request = valid_request();
            request.linked_in = Some(format!(" {link} "));
            request.normalize();

            assert!(request.validate().is_ok(), "{link} should be accepted");
            assert_eq!(request.linked_in.as_deref(), Some(link));
        }
    }

    #[test]
    fn test_bio_is_not_trimmed_before_length_check() {
        let mut request = valid_request();
        request.bio = Some(format!("{}  ", "a".repeat(499)));
        request.normalize();

        assert_eq!(request.bio.as_ref().map(|b| b.len()), Some(501));
        assert!(request.validate().unwrap_err().field_errors().contains_key("bio"));

        let mut update = UpdateAlumniRequest {
            bio: Some(" hello ".to_string()),
            ..Default::default()
        };
        update.normalize();
        assert_eq!(update.into_changes().bio, Some(Some(" hello ".to_string())));
    }

    #[test]
    fn test_envelope_decodes_without_data() {
        // GroupCount n'implémente pas Default
        fn decode<T: serde::de::DeserializeOwned>(json: serde_json::Value) -> ApiResponse<T> {
            serde_json::from_value(json).unwrap()
        }

        let failure: ApiResponse<GroupCount> =
            decode(serde_json::json!({ "success": false, "message": "Alumni not found" }));
        assert!(!failure.success);
        assert!(failure.data.is_none());
        assert_eq!(failure.message.as_deref(), Some("Alumni not found"));

        let ok: ApiResponse<GroupCount> =
            decode(serde_json::json!({ "success": true, "data": { "_id": "2020", "count": 2 } }));
        assert_eq!(ok.data, Some(GroupCount::new("2020", 2)));
    }

    #[test]
    fn test_update_only_checks_supplied_fields() {
        let mut update = UpdateAlumniRequest {
            job_role: Some(" Staff Eng ".to_string()),
            ..Default::default()
        };
        update.normalize();
        assert!(update.validate().is_ok());
        assert_eq!(update.job_role.as_deref(), Some("Staff Eng"));

        let mut blank = UpdateAlumniRequest {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        blank.normalize();
        assert!(blank.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn test_update_blank_optional_clears_field() {
        let mut update = UpdateAlumniRequest {
            phone: Some(" ".to_string()),
            linked_in: Some("".to_string()),
            ..Default::default()
        };
        update.normalize();
        assert!(update.validate().is_ok());

        let changes = update.into_changes();
        assert_eq!(changes.phone, Some(None));
        assert_eq!(changes.linked_in, Some(None));
        assert_eq!(changes.bio, None);
        assert_eq!(changes.name, None);
    }

    #[test]
    fn test_update_ignores_protected_fields() {
        let update: UpdateAlumniRequest = serde_json::from_value(serde_json::json!({
            "id": "whatever",
            "isVerified": true,
            "createdAt": "2001-01-01T00:00:00Z",
            "location": "Paris"
        }))
        .unwrap();

        let changes = update.into_changes();
        assert_eq!(changes.is_verified, None);
        assert_eq!(changes.location.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_envelope_skips_absent_fields() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("Route not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "message": "Route not found" })
        );

        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2]).with_count(2)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": [1, 2], "count": 2 }));
    }

    #[test]
    fn test_stats_shape() {
        let stats = AlumniStats::new(5, 3, vec![GroupCount::new("2020", 5)], vec![]);
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["totalAlumni"], 5);
        assert_eq!(json["unverifiedAlumni"], 2);
        assert_eq!(json["batchStats"][0], serde_json::json!({ "_id": "2020", "count": 5 }));
        assert_eq!(json["topCompanies"], serde_json::json!([]));
    }
}
