//! Read-only lookup of the applications deployed in a Cloud Foundry space.
//!
//! `cfapps` logs in to a Cloud Foundry API endpoint, resolves an organization
//! and a space by name, and reports the applications deployed in that space.
//! It never modifies Cloud Foundry, so every report carries `changed: false`.
//!
//! # Architecture
//!
//! The lookup pipeline in [`api`] depends only on the
//! [`cf::CloudFoundryClient`] trait. The production implementation talks to
//! the v2 REST API over `reqwest`; tests substitute `mockall` doubles. The
//! password is carried as a [`secret::SecretString`] from the moment it is
//! read, so no configuration or request type can print it.
//!
//! # Modules
//!
//! - [`api`]: The lookup pipeline and its report types
//! - [`cf`]: Cloud Foundry client trait, HTTP implementation, and identifiers
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`error`]: Semantic error types for the application
//! - [`logging`]: Tracing subscriber initialisation
//! - [`secret`]: Redacting wrapper for credential material

pub mod api;
pub mod cf;
pub mod config;
pub mod error;
pub mod logging;
mod scalar;
pub mod secret;
