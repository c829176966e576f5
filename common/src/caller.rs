use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallerError {
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("An unspecified error occurred: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CallerError {
    pub fn unauthorized(reason: Option<String>) -> Self {
        Self::Unauthorized {
            reason: reason.unwrap_or_else(|| "No reason provided".to_string()),
        }
    }
}

/// Permissions checked by the admin handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    CertificatesRead,
    CertificatesWrite,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CertificatesRead => "certificates:read",
            Permission::CertificatesWrite => "certificates:write",
        }
    }
}

/// Who is making a request.
///
/// The admin console is single-user, so an authenticated caller holds every
/// permission. A request that presents no credentials is `Anonymous` and
/// holds none; asking it for a permission is an authentication failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Admin,
    Anonymous,
}

impl Caller {
    #[tracing::instrument(skip(self))]
    pub fn can(&self, permission: Permission) -> bool {
        tracing::trace!(permission = permission.as_str(), "checking permission");
        match self {
            Caller::Admin => true,
            Caller::Anonymous => false,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn require(&self, permission: Permission) -> Result<(), CallerError> {
        if !self.can(permission) {
            return Err(CallerError::unauthorized(Some(format!(
                "credentials required for {}",
                permission.as_str()
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_permission() {
        assert!(Caller::Admin.require(Permission::CertificatesRead).is_ok());
        assert!(Caller::Admin.require(Permission::CertificatesWrite).is_ok());
    }

    #[test]
    fn anonymous_needs_credentials() {
        let err = Caller::Anonymous
            .require(Permission::CertificatesWrite)
            .unwrap_err();

        match err {
            CallerError::Unauthorized { reason } => {
                assert_eq!(reason, "credentials required for certificates:write")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
