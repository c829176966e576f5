//! Input parameters for the various functions within Credence.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

mod certificate;
pub use certificate::*;

/// Parameters for paginating through a list of records.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    /// The maximum number of results to return.
    pub limit: Option<u64>,
}
