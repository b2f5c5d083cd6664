//! Customer repository for database operations.
//!
//! Provides CRUD and search over the `customer` table, keyed by IDPEL.
//! The table carries a UNIQUE constraint on `idpel`; it is the backstop for
//! the check-then-insert race in the service layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gardu_core::{CustomerId, EmailList, Idpel};

use super::RepositoryError;
use crate::models::customer::Customer;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    idpel: String,
    name: String,
    email: String,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let idpel = Idpel::parse(&row.idpel).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid IDPEL in database: {e}"))
        })?;

        let email = EmailList::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            idpel,
            name: row.name,
            email,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new customer and return its surrogate ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the IDPEL already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        idpel: &Idpel,
        name: &str,
        email: &EmailList,
        phone: &str,
    ) -> Result<CustomerId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO customer (idpel, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(idpel.as_str())
        .bind(name)
        .bind(email.to_string())
        .bind(phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("IDPEL already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(CustomerId::new(id))
    }

    /// List all customers, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, idpel, name, email, phone, created_at, updated_at
            FROM customer
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List customers whose name contains `term` as a case-sensitive substring.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, idpel, name, email, phone, created_at, updated_at
            FROM customer
            WHERE name LIKE '%' || $1 || '%'
            ORDER BY id
            ",
        )
        .bind(term)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a customer by IDPEL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_idpel(&self, idpel: &Idpel) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, idpel, name, email, phone, created_at, updated_at
            FROM customer
            WHERE idpel = $1
            ",
        )
        .bind(idpel.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Replace the mutable fields of a customer, returning the affected count.
    ///
    /// A return value of 0 means no customer with that IDPEL exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        idpel: &Idpel,
        name: &str,
        email: &EmailList,
        phone: &str,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer
            SET name = $1, email = $2, phone = $3, updated_at = now()
            WHERE idpel = $4
            ",
        )
        .bind(name)
        .bind(email.to_string())
        .bind(phone)
        .bind(idpel.as_str())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a customer by IDPEL, returning the affected count.
    ///
    /// A return value of 0 means no customer with that IDPEL exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, idpel: &Idpel) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE idpel = $1")
            .bind(idpel.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count customers with the given IDPEL (0 or 1 given the unique constraint).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_idpel(&self, idpel: &Idpel) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer WHERE idpel = $1")
            .bind(idpel.as_str())
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
