use crate::domain::{
    loan::Loan,
    value_objects::{BookId, LoanId, UserId},
};
use crate::ports::loan_store::{LoanStore as LoanStoreTrait, LoanStoreError, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

const LOAN_COLUMNS: &str = r#"
    loan_id,
    user_id,
    book_id,
    loan_date,
    expiry_date,
    is_active,
    price
"#;

impl From<sqlx::Error> for LoanStoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                LoanStoreError::Conflict
            }
            _ => LoanStoreError::Unavailable(Box::new(err)),
        }
    }
}

/// PostgreSQLの行データをLoanに変換する
fn map_row_to_loan(row: &PgRow) -> Loan {
    Loan {
        loan_id: LoanId::from_uuid(row.get("loan_id")),
        user_id: UserId::from_uuid(row.get("user_id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        loan_date: row.get("loan_date"),
        expiry_date: row.get("expiry_date"),
        is_active: row.get("is_active"),
        price: row.get("price"),
    }
}

/// PostgreSQL implementation of LoanStore
///
/// Inserts are serialized per user and per book with transaction-scoped
/// advisory locks, so the eligibility re-check and the INSERT cannot
/// interleave with another process writing for the same key.
pub struct LoanStore {
    pool: PgPool,
}

impl LoanStore {
    /// Create a new LoanStore with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Take a transaction-scoped advisory lock for a namespaced key
    async fn lock_key(tx: &mut Transaction<'_, Postgres>, key: String) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(key)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn fetch_loans(&self, filter: &str, binds: &[uuid::Uuid]) -> Result<Vec<Loan>> {
        let sql = format!("SELECT {LOAN_COLUMNS} FROM loans WHERE {filter} ORDER BY loan_date DESC");
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(*value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_row_to_loan).collect())
    }
}

#[async_trait]
impl LoanStoreTrait for LoanStore {
    /// Guarded insert
    ///
    /// Locks the user key then the book key (the same order the service
    /// uses in-process), re-checks for an overlapping flagged-active loan
    /// and inserts within the same transaction.
    async fn insert(&self, loan: &Loan) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        Self::lock_key(&mut tx, format!("loan:user:{}", loan.user_id)).await?;
        Self::lock_key(&mut tx, format!("loan:book:{}", loan.book_id)).await?;

        let overlapping: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM loans
                WHERE is_active
                  AND expiry_date > $3
                  AND (user_id = $1 OR book_id = $2)
            )
            "#,
        )
        .bind(loan.user_id.value())
        .bind(loan.book_id.value())
        .bind(loan.loan_date)
        .fetch_one(&mut *tx)
        .await?;

        if overlapping {
            tx.rollback().await?;
            return Err(LoanStoreError::Conflict);
        }

        sqlx::query(
            r#"
            INSERT INTO loans (
                loan_id,
                user_id,
                book_id,
                loan_date,
                expiry_date,
                is_active,
                price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.user_id.value())
        .bind(loan.book_id.value())
        .bind(loan.loan_date)
        .bind(loan.expiry_date)
        .bind(loan.is_active)
        .bind(loan.price)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Uses the partial index on (user_id) WHERE is_active
    async fn find_flagged_active_by_user(&self, user_id: UserId) -> Result<Vec<Loan>> {
        self.fetch_loans("is_active AND user_id = $1", &[user_id.value()])
            .await
    }

    async fn find_flagged_active_by_book(&self, book_id: BookId) -> Result<Vec<Loan>> {
        self.fetch_loans("is_active AND book_id = $1", &[book_id.value()])
            .await
    }

    async fn find_flagged_active_by_user_and_book(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<Vec<Loan>> {
        self.fetch_loans(
            "is_active AND user_id = $1 AND book_id = $2",
            &[user_id.value(), book_id.value()],
        )
        .await
    }

    async fn find_all_flagged_active(&self) -> Result<Vec<Loan>> {
        self.fetch_loans("is_active", &[]).await
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Loan>> {
        self.fetch_loans("user_id = $1", &[user_id.value()]).await
    }
}
