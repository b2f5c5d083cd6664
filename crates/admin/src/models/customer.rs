//! Customer domain types.

use chrono::{DateTime, Utc};

use gardu_core::{CustomerId, EmailList, Idpel};

/// A billed customer (domain type).
///
/// `idpel` is the unique business key used for all lookups; the surrogate
/// `id` is assigned by the store and not used for addressing.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Surrogate ID assigned by the store.
    pub id: CustomerId,
    /// Installation number; unique, immutable once assigned.
    pub idpel: Idpel,
    /// Customer display name.
    pub name: String,
    /// Billing contact addresses.
    pub email: EmailList,
    /// Contact phone number, free-form.
    pub phone: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}
