//! Types shared between the Credence API, its storage layer and the operator
//! CLI.
//!
//! [`views`] are the output shapes returned to clients, [`params`] are the
//! inputs they send, and [`form`] holds the certificate form rules (required
//! fields, defaults and id generation).

pub mod caller;
pub mod form;
pub mod params;
pub mod views;
