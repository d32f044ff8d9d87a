//! # Resolver: Validation Request Resolution
//!
//! **Role**: Turns an uploaded diagnostic-data snapshot (plus an optional
//! policy upload and two switches) into a fully configured
//! [`ValidationRequest`] for a [`ProcessExecutor`].
//!
//! ## Decisions
//! 1. **Process kind**: no signatures ⇒ certificate replay, otherwise signature replay.
//! 2. **Validation instant**: the recorded date, or "now" when the date is reset.
//! 3. **Policy**: the cached default when requested or when nothing was
//!    uploaded; otherwise the uploaded document. A broken upload is an
//!    error and never falls back to the default.
//! 4. **Target certificate** (certificate replays only): longest chain, first on ties.
//!
//! The resolver is a pure function of its inputs, the injected [`Clock`] and
//! the read-only [`DefaultPolicy`]. It never retries and never logs document
//! contents.

pub mod clock;
pub mod error;
pub mod executor;
pub mod form;
pub mod select;

pub use clock::{Clock, SystemClock};
pub use error::{ExecutorError, ReplayError, ResolutionError};
pub use executor::{replay, PlanExecutor, ProcessExecutor, ResolvedSummary};
pub use form::{ReplayForm, ReplayOptions};
pub use select::{select_process_kind, select_target_certificate};

use common::{DiagnosticDocument, PolicyDocument, PolicyOrigin, ValidationRequest};
use facade::{DiagnosticDataFacade, ValidationPolicyFacade};
use policy::DefaultPolicy;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Builds validation requests from replay uploads.
///
/// Cheap to share across threads; one instance can serve every request.
pub struct Resolver {
    default_policy: Arc<DefaultPolicy>,
    clock: Box<dyn Clock>,
}

impl Resolver {
    /// Creates a resolver reading wall-clock time.
    pub fn new(default_policy: Arc<DefaultPolicy>) -> Self {
        Self::with_clock(default_policy, SystemClock)
    }

    pub fn with_clock(default_policy: Arc<DefaultPolicy>, clock: impl Clock + 'static) -> Self {
        Self {
            default_policy,
            clock: Box::new(clock),
        }
    }

    /// Parses the uploaded diagnostic data, then [`resolve`](Self::resolve)s it.
    ///
    /// # Errors
    /// [`ResolutionError::DiagnosticParseFailure`] if the diagnostic upload is
    /// unreadable, plus every error of [`resolve`](Self::resolve).
    pub fn resolve_upload(&self, form: &ReplayForm) -> Result<ValidationRequest, ResolutionError> {
        let diagnostic = DiagnosticDataFacade::unmarshall_bytes(&form.diagnostic_file).map_err(|e| {
            warn!(error = %e, "unable to parse the diagnostic data");
            ResolutionError::DiagnosticParseFailure(e)
        })?;
        self.resolve(diagnostic, form.policy_bytes(), form.options)
    }

    /// Resolves a parsed snapshot into a validation request.
    ///
    /// `uploaded_policy` is the raw policy upload; `None` or an empty slice
    /// means nothing was uploaded.
    ///
    /// # Errors
    /// - [`ResolutionError::DefaultPolicyUnavailable`] if the default policy is needed but broken.
    /// - [`ResolutionError::InvalidUploadedPolicy`] if the upload is used and does not parse.
    pub fn resolve(
        &self,
        diagnostic: DiagnosticDocument,
        uploaded_policy: Option<&[u8]>,
        options: ReplayOptions,
    ) -> Result<ValidationRequest, ResolutionError> {
        let process = select_process_kind(&diagnostic);

        let validation_instant = if options.reset_validation_date {
            self.clock.now()
        } else {
            diagnostic.validation_date
        };

        let (policy, policy_origin) =
            self.select_policy(uploaded_policy, options.use_default_policy)?;

        debug!(
            process = process.label(),
            target = process.target_certificate_id().unwrap_or("-"),
            instant = %validation_instant,
            policy = %policy.name,
            "resolved validation request"
        );

        Ok(ValidationRequest {
            process,
            validation_instant,
            policy,
            policy_origin,
            diagnostic,
        })
    }

    fn select_policy(
        &self,
        uploaded_policy: Option<&[u8]>,
        use_default_policy: bool,
    ) -> Result<(Arc<PolicyDocument>, PolicyOrigin), ResolutionError> {
        match uploaded_policy.filter(|bytes| !bytes.is_empty()) {
            Some(bytes) if !use_default_policy => ValidationPolicyFacade::unmarshall_bytes(bytes)
                .map(|policy| (Arc::new(policy), PolicyOrigin::Uploaded))
                .map_err(|e| {
                    warn!(error = %e, "unable to parse the provided validation policy");
                    ResolutionError::InvalidUploadedPolicy(e)
                }),
            _ => self
                .default_policy
                .get()
                .map(|policy| (policy, PolicyOrigin::Default))
                .map_err(|e| {
                    error!(
                        source = %self.default_policy.describe_source(),
                        error = %e,
                        "default validation policy unavailable"
                    );
                    ResolutionError::DefaultPolicyUnavailable(e)
                }),
        }
    }
}
