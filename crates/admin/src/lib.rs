//! Gardu Admin library.
//!
//! This crate provides the customer-billing admin panel as a library,
//! allowing it to be tested and reused (the CLI reuses the repositories
//! and password hashing).
//!
//! # Security
//!
//! This crate manages staff credentials and customer contact data.
//! Only deploy on VPN-protected infrastructure.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
