//! Core types for Gardu.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod idpel;

pub use email::{Email, EmailError, EmailList, EmailListError};
pub use id::*;
pub use idpel::{Idpel, IdpelError};
