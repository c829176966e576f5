pub mod error;
pub mod extractor;
pub mod manager;
pub mod provider;
pub mod providers;

pub use error::AuthError;
pub use extractor::Auth;
pub use manager::AuthManager;
pub use provider::AuthProvider;
pub use providers::{admin_token::AdminTokenProvider, open::OpenAccessProvider};
