//! Business logic services for the admin panel.
//!
//! Services sit between the route handlers and the repositories: they own
//! validation and error translation so no raw store or transport error
//! reaches a handler.

pub mod auth;
pub mod customers;
pub mod email;
pub mod storage;

pub use auth::AuthService;
pub use customers::CustomerService;
pub use email::{NotificationGateway, SmtpNotificationGateway};
pub use storage::FileStore;
