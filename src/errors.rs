use crate::authz::policy::DenyReason;

pub type AuthzResult<T> = Result<T, AuthzError>;

/// Error taxonomy of the authorization core.
///
/// `Denied` is the only variant produced by a normal authorization
/// outcome; the other variants mark data-integrity or caller-contract
/// problems and must never be collapsed into a denial.
#[derive(thiserror::Error, Debug)]
pub enum AuthzError {
    #[error("permission denied: {0}")]
    Denied(DenyReason),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("invalid check: {0}")]
    InvalidCheck(String),
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl AuthzError {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn invalid_check(message: impl Into<String>) -> Self {
        Self::InvalidCheck(message.into())
    }

    /// True for the expected, data-driven denial outcome.
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Denied(reason) => Some(*reason),
            _ => None,
        }
    }
}
