use async_trait::async_trait;
use sea_orm::prelude::DateTimeUtc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Schema, Select,
    Set, SqlErr, TransactionTrait, sqlx,
};
use tracing::debug;
use uuid::Uuid;

use super::{AlumniStore, StoreError};
use crate::models::alumni::{self, Entity as Alumni, next_write_time};
use crate::models::dto::{AlumniChanges, AlumniStats, GroupCount};
use crate::services::query::{DirectoryFilter, TOP_COMPANIES_LIMIT};

/// SQLSTATE unique_violation
const UNIQUE_VIOLATION: &str = "23505";

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if is_unique_violation(&err) {
            StoreError::UniqueViolation
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    // sql_err() ne reconnaît que PgDatabaseError; le code SQLSTATE suffit
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => {
            e.code().as_deref() == Some(UNIQUE_VIOLATION)
        }
        _ => false,
    }
}

// "C": même ordre octet par octet que le stockage mémoire
fn batch_stats_query() -> Select<Alumni> {
    count_by(alumni::Column::Batch).order_by_desc(Expr::cust(r#""batch" COLLATE "C""#))
}

fn top_companies_query() -> Select<Alumni> {
    count_by(alumni::Column::CurrentCompany)
        .order_by_desc(Expr::col(alumni::Column::Id).count())
        .order_by_asc(Expr::cust(r#""current_company" COLLATE "C""#))
        .limit(TOP_COMPANIES_LIMIT)
}

fn count_by(column: alumni::Column) -> Select<Alumni> {
    Alumni::find()
        .select_only()
        .column(column)
        .column_as(Expr::col(alumni::Column::Id).count(), "count")
        .group_by(column)
}

/// Stockage PostgreSQL via SeaORM
pub struct PostgresStore {
    db: DatabaseConnection,
}

impl PostgresStore {
    /// Connexion + création de la table alumni si absente
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db = Database::connect(database_url).await?;
        let store = Self { db };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_schema(&self) -> Result<(), DbErr> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut table = schema.create_table_from_entity(Alumni);
        table.if_not_exists();
        self.db.execute(backend.build(&table)).await?;

        debug!("alumni table ready");
        Ok(())
    }

    async fn group_counts(&self, query: Select<Alumni>) -> Result<Vec<GroupCount>, DbErr> {
        let rows = query.into_tuple::<(String, i64)>().all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|(key, count)| GroupCount::new(key, u64::try_from(count).unwrap_or(0)))
            .collect())
    }
}

// toutes les colonnes à Set: l'update réécrit la ligne complète
fn to_active_model(record: alumni::Model) -> alumni::ActiveModel {
    alumni::ActiveModel {
        id: Set(record.id),
        name: Set(record.name),
        email: Set(record.email),
        batch: Set(record.batch),
        current_company: Set(record.current_company),
        job_role: Set(record.job_role),
        location: Set(record.location),
        phone: Set(record.phone),
        linked_in: Set(record.linked_in),
        skills: Set(record.skills),
        bio: Set(record.bio),
        is_verified: Set(record.is_verified),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    }
}

#[async_trait]
impl AlumniStore for PostgresStore {
    async fn insert(&self, record: alumni::Model) -> Result<alumni::Model, StoreError> {
        Ok(to_active_model(record).insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<alumni::Model>, StoreError> {
        Ok(Alumni::find_by_id(id).one(&self.db).await?)
    }

    async fn find(&self, filter: &DirectoryFilter) -> Result<Vec<alumni::Model>, StoreError> {
        let records = Alumni::find()
            .filter(filter.condition())
            .order_by_desc(alumni::Column::CreatedAt)
            .order_by_desc(alumni::Column::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AlumniChanges,
        now: DateTimeUtc,
    ) -> Result<Option<alumni::Model>, StoreError> {
        // ligne verrouillée jusqu'au commit; un rollback implicite si l'UPDATE échoue
        let txn = self.db.begin().await?;

        let Some(mut record) = Alumni::find_by_id(id).lock_exclusive().one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let updated_at = next_write_time(record.updated_at, now);
        changes.apply(&mut record, updated_at);
        let saved = to_active_model(record).update(&txn).await?;

        txn.commit().await?;
        Ok(Some(saved))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = Alumni::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn stats(&self) -> Result<AlumniStats, StoreError> {
        let total = Alumni::find().count(&self.db).await?;
        let verified = Alumni::find()
            .filter(alumni::Column::IsVerified.eq(true))
            .count(&self.db)
            .await?;

        let batch_stats = self.group_counts(batch_stats_query()).await?;
        let top_companies = self.group_counts(top_companies_query()).await?;

        Ok(AlumniStats::new(total, verified, batch_stats, top_companies))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(self.db.ping().await?)
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(self.db.close_by_ref().await?)
    }
}
