// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Liste des modules:
//   - alumni : Profils des anciens (table alumni, SeaORM)
//   - dto : Requêtes (inscription, mise à jour) et enveloppe des réponses API
//   - health : Health check API
//
// ============================================================================

pub mod alumni;
pub mod dto;
pub mod health;
