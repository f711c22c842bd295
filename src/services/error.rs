use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

use crate::db::StoreError;
use crate::models::dto::ApiResponse;

/// Un champ refusé par la validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Erreurs métier du service alumni.
/// Les routes les transforment directement en réponse HTTP (ResponseError).
#[derive(Debug, Error)]
pub enum AlumniError {
    /// entrée invalide, à corriger avant de renvoyer
    #[error("{}", join_messages(.0))]
    Validation(Vec<FieldError>),

    #[error("Email already exists!")]
    DuplicateEmail,

    #[error("Alumni not found")]
    NotFound,

    /// panne du stockage; le détail reste dans les logs
    #[error("storage failure: {0}")]
    Storage(String),
}

fn join_messages(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ValidationErrors> for AlumniError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, field_errors)| {
                let field = camel_case(&field.to_string());
                field_errors.first().map(|error| FieldError {
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid")),
                    field,
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AlumniError::Validation(fields)
    }
}

impl From<StoreError> for AlumniError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UniqueViolation => AlumniError::DuplicateEmail,
            StoreError::Backend(detail) => AlumniError::Storage(detail),
        }
    }
}

impl ResponseError for AlumniError {
    fn status_code(&self) -> StatusCode {
        match self {
            AlumniError::Validation(_) | AlumniError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AlumniError::NotFound => StatusCode::NOT_FOUND,
            AlumniError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AlumniError::Validation(fields) => HttpResponse::build(status).json(ApiResponse {
                success: false,
                message: Some(self.to_string()),
                data: Some(fields),
                count: None,
                error: None,
            }),
            // jamais l'erreur brute de la BD côté client
            AlumniError::Storage(_) => HttpResponse::build(status).json(
                ApiResponse::failure("Something went wrong!").with_error("storage unavailable"),
            ),
            _ => HttpResponse::build(status).json(ApiResponse::failure(self.to_string())),
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
