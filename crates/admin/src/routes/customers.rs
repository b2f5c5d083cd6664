//! Customer route handlers.
//!
//! The roster page doubles as the search results page (`?q=`); mutations
//! redirect back with `?error=`/`?success=` messages. All routes require an
//! authenticated session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::customer::Customer;
use crate::models::session::CurrentUser;
use crate::services::customers::{CustomerFields, CustomerInput, UploadedFile};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Create form data.
#[derive(Debug, Deserialize)]
pub struct CreateForm {
    pub idpel: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Update form data. IDPEL comes from the path and is immutable.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the roster page.
#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    /// Name substring filter.
    pub q: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Query parameters for error display on sub-pages.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Customer roster page template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/index.html")]
pub struct CustomersTemplate {
    pub user: CurrentUser,
    pub customers: Vec<Customer>,
    pub q: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Customer edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/edit.html")]
pub struct EditTemplate {
    pub user: CurrentUser,
    pub customer: Customer,
    pub error: Option<String>,
}

/// Invoice upload form template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/upload.html")]
pub struct UploadTemplate {
    pub user: CurrentUser,
    pub customer: Customer,
    pub error: Option<String>,
}

// =============================================================================
// Roster
// =============================================================================

/// Display the customer roster, optionally filtered by name substring.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<RosterQuery>,
) -> Result<CustomersTemplate, AppError> {
    let customers = state.customer_service().list(query.q.as_deref()).await?;

    Ok(CustomersTemplate {
        user,
        customers,
        q: query.q.unwrap_or_default(),
        error: query.error,
        success: query.success,
    })
}

/// Handle create form submission.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<CreateForm>,
) -> Response {
    let input = CustomerInput {
        idpel: form.idpel,
        name: form.name,
        email: form.email,
        phone: form.phone,
    };

    match state.customer_service().create(&input).await {
        Ok(_) => redirect_to_roster_success("Customer created"),
        Err(e) => redirect_to_roster_error(&e),
    }
}

// =============================================================================
// Edit / Update
// =============================================================================

/// Display the edit form, prefilled from the stored record.
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(idpel): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<EditTemplate, AppError> {
    let customer = state.customer_service().get(&idpel).await?;

    Ok(EditTemplate {
        user,
        customer,
        error: query.error,
    })
}

/// Handle update form submission. Replaces name, email, and phone wholesale.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(idpel): Path<String>,
    Form(form): Form<UpdateForm>,
) -> Response {
    let fields = CustomerFields {
        name: form.name,
        email: form.email,
        phone: form.phone,
    };

    match state.customer_service().update(&idpel, &fields).await {
        Ok(0) => AppError::NotFound(format!("customer {idpel}")).into_response(),
        Ok(_) => redirect_to_roster_success("Customer updated"),
        Err(e @ AppError::Validation(_)) => {
            let redirect_url = format!(
                "/customers/{}/edit?error={}",
                urlencoding::encode(&idpel),
                urlencoding::encode(&e.summary())
            );
            Redirect::to(&redirect_url).into_response()
        }
        Err(e) => e.into_response(),
    }
}

// =============================================================================
// Delete
// =============================================================================

/// Handle delete form submission. Deletion is physical.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(idpel): Path<String>,
) -> Response {
    match state.customer_service().delete(&idpel).await {
        Ok(0) => AppError::NotFound(format!("customer {idpel}")).into_response(),
        Ok(_) => redirect_to_roster_success("Customer deleted"),
        Err(e) => e.into_response(),
    }
}

// =============================================================================
// Upload & Notify
// =============================================================================

/// Display the invoice upload form for a customer.
pub async fn upload_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(idpel): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<UploadTemplate, AppError> {
    let customer = state.customer_service().get(&idpel).await?;

    Ok(UploadTemplate {
        user,
        customer,
        error: query.error,
    })
}

/// Handle the multipart invoice upload: stage the files and email them to
/// the customer's stored addresses.
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(idpel): Path<String>,
    multipart: Multipart,
) -> Response {
    let uploads = match collect_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(e) => return e.into_response(),
    };

    match state
        .customer_service()
        .upload_and_notify(&idpel, &uploads)
        .await
    {
        Ok(()) => redirect_to_roster_success("Invoice email sent"),
        Err(e @ (AppError::Validation(_) | AppError::Notification(_))) => {
            let redirect_url = format!(
                "/customers/{}/upload?error={}",
                urlencoding::encode(&idpel),
                urlencoding::encode(&e.summary())
            );
            Redirect::to(&redirect_url).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Read every `files` part of the multipart form into memory.
async fn collect_uploads(mut multipart: Multipart) -> Result<Vec<UploadedFile>, AppError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::field("files", format!("Invalid upload: {e}")))?
    {
        if field.name() != Some("files") {
            continue;
        }

        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };

        let contents = field
            .bytes()
            .await
            .map_err(|e| AppError::field("files", format!("Failed to read upload: {e}")))?;

        // Browsers submit an empty part when no file was chosen.
        if contents.is_empty() {
            continue;
        }

        uploads.push(UploadedFile {
            file_name,
            contents: contents.to_vec(),
        });
    }

    Ok(uploads)
}

// =============================================================================
// Redirect Helpers
// =============================================================================

fn redirect_to_roster_success(message: &str) -> Response {
    Redirect::to(&format!(
        "/customers?success={}",
        urlencoding::encode(message)
    ))
    .into_response()
}

fn redirect_to_roster_error(error: &AppError) -> Response {
    Redirect::to(&format!(
        "/customers?error={}",
        urlencoding::encode(&error.summary())
    ))
    .into_response()
}
