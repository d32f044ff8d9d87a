use facade::FacadeError;
use std::sync::Arc;

/// Errors from resolving a validation request.
///
/// Each variant keeps the underlying parse error as its `source()` for
/// operators; [`ResolutionError::user_message`] is what end users see.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("unable to parse the diagnostic data: {0}")]
    DiagnosticParseFailure(#[source] FacadeError),
    #[error("default validation policy unavailable: {0}")]
    DefaultPolicyUnavailable(#[source] Arc<FacadeError>),
    #[error("unable to parse the provided validation policy: {0}")]
    InvalidUploadedPolicy(#[source] FacadeError),
}

impl ResolutionError {
    /// Message safe to show to the uploader.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolutionError::DiagnosticParseFailure(_) => {
                "Error while creating diagnostic data from given file"
            }
            ResolutionError::DefaultPolicyUnavailable(_) => {
                "Error while loading the default validation policy"
            }
            ResolutionError::InvalidUploadedPolicy(_) => {
                "Error while loading the provided validation policy"
            }
        }
    }

    /// `true` for deployment defects rather than bad input.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, ResolutionError::DefaultPolicyUnavailable(_))
    }
}

/// Errors reported by a process executor.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("validation engine failure: {0}")]
    Engine(String),
}

/// Errors from a full replay (resolution followed by execution).
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Execution(#[from] ExecutorError),
}

impl ReplayError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ReplayError::Resolution(e) => e.user_message(),
            ReplayError::Execution(_) => "Error while validating the diagnostic data",
        }
    }
}
