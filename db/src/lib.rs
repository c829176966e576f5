//! Certificate storage for Credence.
//!
//! Handlers only ever see the [`storage::Storage`] trait; the in-memory
//! implementation in [`storage::memory`] is the one the server wires up.

pub mod fixed_data;
pub mod models;
pub mod storage;
