use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::alumni;
use crate::models::dto::GroupCount;

/// Nombre d'entreprises gardées dans les stats admin
pub const TOP_COMPANIES_LIMIT: u64 = 10;

/// Filtres du répertoire (GET /api/alumni/directory?batch=&company=&search=&verified=).
/// Critères combinés en ET; un critère absent ou vide ne filtre rien.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryFilter {
    /// égalité exacte sur batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    /// sous-chaîne, insensible à la casse, sur currentCompany
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// sous-chaîne, insensible à la casse, sur name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// filtre de statut du dashboard admin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl DirectoryFilter {
    /// Trim des valeurs; les chaînes vides deviennent None.
    pub fn normalized(self) -> Self {
        Self {
            batch: non_blank(self.batch),
            company: non_blank(self.company),
            search: non_blank(self.search),
            verified: self.verified,
        }
    }

    /// Condition SeaORM équivalente à `matches` (store PostgreSQL).
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(batch) = &self.batch {
            condition = condition.add(alumni::Column::Batch.eq(batch.as_str()));
        }
        if let Some(company) = &self.company {
            condition = condition.add(contains_ignore_case(alumni::Column::CurrentCompany, company));
        }
        if let Some(search) = &self.search {
            condition = condition.add(contains_ignore_case(alumni::Column::Name, search));
        }
        if let Some(verified) = self.verified {
            condition = condition.add(alumni::Column::IsVerified.eq(verified));
        }

        condition
    }

    /// Prédicat en mémoire (store de test / mode memory).
    pub fn matches(&self, record: &alumni::Model) -> bool {
        if let Some(batch) = &self.batch {
            if record.batch != *batch {
                return false;
            }
        }
        if let Some(company) = &self.company {
            if !record.current_company.to_lowercase().contains(&company.to_lowercase()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !record.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(verified) = self.verified {
            if record.is_verified != verified {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// LOWER(col) LIKE '%needle%' ESCAPE '\'; le motif est pris littéralement.
fn contains_ignore_case(column: alumni::Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Ordre du répertoire: plus récents d'abord, id décroissant en cas d'égalité.
pub fn newest_first(a: &alumni::Model, b: &alumni::Model) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Comptages par batch, batch décroissant.
pub fn sort_batch_stats(mut groups: Vec<GroupCount>) -> Vec<GroupCount> {
    groups.sort_by(|a, b| b.key.cmp(&a.key));
    groups
}

/// Comptages par entreprise: count décroissant, nom croissant à égalité, top 10.
pub fn rank_top_companies(mut groups: Vec<GroupCount>) -> Vec<GroupCount> {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    groups.truncate(TOP_COMPANIES_LIMIT as usize);
    groups
}
