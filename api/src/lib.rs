//! Credence API service.
//!
//! Issues internship certificates from the admin console, renders them to
//! HTML and PDF, and answers the public `/verify?id=<id>` links printed on
//! every certificate.
//!
//! # Configuration
//!
//! See [`config::CredenceApiConfig`]. Admin routes are gated by a bearer
//! token when `CREDENCE_API_ADMIN_TOKEN` is set.
//!
//! # Rendering and export
//!
//! [`render`] turns a certificate into a themed layout and its HTML/PDF
//! forms; [`export`] hands those artifacts to a host environment (an HTTP
//! response, a directory on disk) and reports the outcome as a
//! notification.

pub mod auth;
pub mod config;
pub mod export;
pub mod render;
pub mod server;
pub mod verification;

pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod handlers;
