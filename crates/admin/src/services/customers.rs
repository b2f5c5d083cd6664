//! Customer service.
//!
//! Validates and mutates customer records, enforces IDPEL uniqueness, and
//! orchestrates the upload-and-notify workflow.

use gardu_core::{CustomerId, EmailList, EmailListError, Idpel, IdpelError};
use sqlx::PgPool;

use crate::config::EmailConfig;
use crate::db::RepositoryError;
use crate::db::customers::CustomerRepository;
use crate::error::{AppError, FieldError};
use crate::models::customer::Customer;
use crate::services::email::NotificationGateway;
use crate::services::storage::{FileStore, StagedFile};

// =============================================================================
// Form Input
// =============================================================================

/// Raw create-form input, before validation.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub idpel: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Raw update-form input, before validation. IDPEL comes from the path and
/// is immutable.
#[derive(Debug, Clone)]
pub struct CustomerFields {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Validated mutable customer fields.
#[derive(Debug, Clone)]
pub struct CustomerDraft {
    pub name: String,
    pub email: EmailList,
    pub phone: String,
}

/// An uploaded invoice file, as received from the multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename.
    pub file_name: String,
    /// File contents.
    pub contents: Vec<u8>,
}

// =============================================================================
// Validation
// =============================================================================

/// Validate the mutable customer fields, collecting every failure.
///
/// `name` must be non-empty after trimming; `email` must be a comma-separated
/// list where every entry has the `local@domain.tld` shape. `phone` is
/// free-form.
///
/// # Errors
///
/// Returns the full list of field errors when any field is malformed.
pub fn validate_customer_fields(
    name: &str,
    email: &str,
    phone: &str,
) -> Result<CustomerDraft, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Customer name is required"));
    }

    let email = match EmailList::parse(email) {
        Ok(list) => Some(list),
        Err(err) => {
            errors.push(FieldError::new("email", email_list_message(&err)));
            None
        }
    };

    match email {
        Some(email) if errors.is_empty() => Ok(CustomerDraft {
            name: name.to_owned(),
            email,
            phone: phone.trim().to_owned(),
        }),
        _ => Err(errors),
    }
}

/// Validate a complete new-customer submission.
///
/// # Errors
///
/// Returns the full list of field errors when any field is malformed.
pub fn validate_new_customer(
    input: &CustomerInput,
) -> Result<(Idpel, CustomerDraft), Vec<FieldError>> {
    let mut errors = Vec::new();

    let idpel = match Idpel::parse(input.idpel.trim()) {
        Ok(idpel) => Some(idpel),
        Err(err) => {
            errors.push(FieldError::new("idpel", idpel_message(&err)));
            None
        }
    };

    let draft = match validate_customer_fields(&input.name, &input.email, &input.phone) {
        Ok(draft) => Some(draft),
        Err(mut field_errors) => {
            errors.append(&mut field_errors);
            None
        }
    };

    match (idpel, draft) {
        (Some(idpel), Some(draft)) if errors.is_empty() => Ok((idpel, draft)),
        _ => Err(errors),
    }
}

fn idpel_message(err: &IdpelError) -> String {
    match err {
        IdpelError::Empty => "IDPEL is required".to_owned(),
        IdpelError::ContainsWhitespace => "IDPEL cannot contain whitespace".to_owned(),
    }
}

fn email_list_message(err: &EmailListError) -> String {
    match err {
        EmailListError::Empty => "At least one email address is required".to_owned(),
        EmailListError::InvalidEntry { entry, .. } => format!("Invalid email format: {entry}"),
    }
}

// =============================================================================
// Service
// =============================================================================

/// Customer service.
///
/// The only component that touches both the customer repository and the
/// notification gateway.
pub struct CustomerService<'a> {
    customers: CustomerRepository<'a>,
    gateway: &'a dyn NotificationGateway,
    files: &'a FileStore,
    email: &'a EmailConfig,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub fn new(
        pool: &'a PgPool,
        gateway: &'a dyn NotificationGateway,
        files: &'a FileStore,
        email: &'a EmailConfig,
    ) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            gateway,
            files,
            email,
        }
    }

    /// List all customers, or only those whose name contains `filter` as a
    /// case-sensitive substring. Rows come back in store order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<Customer>, AppError> {
        let customers = match filter.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => self.customers.search_by_name(term).await?,
            None => self.customers.list_all().await?,
        };
        Ok(customers)
    }

    /// Get a customer by IDPEL.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no record matches.
    pub async fn get(&self, idpel: &str) -> Result<Customer, AppError> {
        let idpel = parse_lookup_idpel(idpel)?;
        self.customers
            .get_by_idpel(&idpel)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {idpel}")))
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if any field is malformed, and
    /// `AppError::Conflict` if the IDPEL is already taken.
    pub async fn create(&self, input: &CustomerInput) -> Result<CustomerId, AppError> {
        let (idpel, draft) = validate_new_customer(input).map_err(AppError::Validation)?;

        // The pre-check gives a friendly error; two concurrent creates can
        // both pass it, so the UNIQUE constraint on idpel is the backstop.
        if self.customers.count_by_idpel(&idpel).await? > 0 {
            return Err(AppError::Conflict("IDPEL already exists".to_owned()));
        }

        let id = self
            .customers
            .insert(&idpel, &draft.name, &draft.email, &draft.phone)
            .await
            .map_err(map_repository_error)?;

        tracing::info!(idpel = %idpel, "Customer created");
        Ok(id)
    }

    /// Replace the mutable fields of a customer wholesale.
    ///
    /// Returns the affected count; 0 means no customer with that IDPEL
    /// exists and callers should treat it as not found.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if any field is malformed.
    pub async fn update(&self, idpel: &str, fields: &CustomerFields) -> Result<u64, AppError> {
        let draft = validate_customer_fields(&fields.name, &fields.email, &fields.phone)
            .map_err(AppError::Validation)?;
        let idpel = parse_lookup_idpel(idpel)?;

        let affected = self
            .customers
            .update(&idpel, &draft.name, &draft.email, &draft.phone)
            .await?;
        Ok(affected)
    }

    /// Delete a customer by IDPEL.
    ///
    /// Returns the affected count; 0 means no customer with that IDPEL
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn delete(&self, idpel: &str) -> Result<u64, AppError> {
        let idpel = parse_lookup_idpel(idpel)?;
        let affected = self.customers.delete(&idpel).await?;
        if affected > 0 {
            tracing::info!(idpel = %idpel, "Customer deleted");
        }
        Ok(affected)
    }

    /// Stage the uploaded files and email them to the customer's stored
    /// addresses as invoice attachments.
    ///
    /// Either the single send call succeeds or the whole action fails; on
    /// failure the staged files are cleaned up, best effort.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the customer does not exist,
    /// `AppError::Validation` if no files were uploaded, and
    /// `AppError::Notification` if the gateway fails to deliver.
    pub async fn upload_and_notify(
        &self,
        idpel: &str,
        uploads: &[UploadedFile],
    ) -> Result<(), AppError> {
        let customer = self.get(idpel).await?;

        if uploads.is_empty() {
            return Err(AppError::field("files", "At least one file is required"));
        }

        let mut staged = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let file = self
                .files
                .stage(&customer.idpel, &upload.file_name, &upload.contents)
                .await
                .map_err(|e| AppError::Internal(format!("failed to stage upload: {e}")))?;
            staged.push(file);
        }

        notify_with_staged(self.gateway, self.files, self.email, &customer, &staged).await
    }
}

/// Send the invoice email for already-staged files, removing them again if
/// the send fails.
async fn notify_with_staged(
    gateway: &dyn NotificationGateway,
    files: &FileStore,
    email: &EmailConfig,
    customer: &Customer,
    staged: &[StagedFile],
) -> Result<(), AppError> {
    match gateway
        .send_invoice(
            &customer.email,
            &email.invoice_subject,
            &email.invoice_body,
            staged,
        )
        .await
    {
        Ok(()) => {
            tracing::info!(idpel = %customer.idpel, files = staged.len(), "Invoice notification sent");
            Ok(())
        }
        Err(err) => {
            // The action failed as a whole; don't leave orphaned files behind.
            for file in staged {
                if let Err(io_err) = files.remove(file).await {
                    tracing::warn!(
                        path = %file.path.display(),
                        error = %io_err,
                        "Failed to clean up staged file"
                    );
                }
            }
            Err(AppError::Notification(err))
        }
    }
}

/// Parse a path-supplied IDPEL. Anything unparseable cannot name an existing
/// record, so it maps to not-found rather than a validation failure.
fn parse_lookup_idpel(raw: &str) -> Result<Idpel, AppError> {
    Idpel::parse(raw).map_err(|_| AppError::NotFound(format!("customer {raw}")))
}

fn map_repository_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(msg) => AppError::Conflict(msg),
        other => AppError::Database(other),
    }
}
