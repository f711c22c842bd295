/*
services/
├─ alumni_service.rs   ← register / list / get / update / delete / verify / stats
├─ query.rs            ← filtres du répertoire, ordre, agrégats des stats
└─ error.rs            ← AlumniError → statut HTTP + enveloppe
*/
pub mod alumni_service;
pub mod error;
pub mod query;
