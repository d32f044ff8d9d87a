use crate::error::{ExecutorError, ReplayError};
use crate::form::ReplayForm;
use crate::Resolver;
use chrono::{DateTime, Utc};
use common::{PolicyOrigin, ValidationRequest};
use serde::Serialize;

/// The validation engine seam.
///
/// Implementations receive a fully resolved request and produce their own
/// report type. A certificate request may carry no target certificate when
/// the snapshot lists none; the executor decides what that means.
pub trait ProcessExecutor {
    type Reports;

    fn execute(&self, request: &ValidationRequest) -> Result<Self::Reports, ExecutorError>;
}

/// Resolves `form` and hands the request to `executor`.
pub fn replay<E: ProcessExecutor>(
    resolver: &Resolver,
    executor: &E,
    form: &ReplayForm,
) -> Result<E::Reports, ReplayError> {
    let request = resolver.resolve_upload(form)?;
    let reports = executor.execute(&request)?;
    Ok(reports)
}

/// Serializable description of a resolved request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSummary {
    pub process: &'static str,
    pub target_certificate_id: Option<String>,
    pub validation_instant: DateTime<Utc>,
    pub policy_name: String,
    pub policy_origin: PolicyOrigin,
    pub document_name: Option<String>,
    pub signatures: usize,
    pub used_certificates: usize,
}

impl From<&ValidationRequest> for ResolvedSummary {
    fn from(request: &ValidationRequest) -> Self {
        Self {
            process: request.process.label(),
            target_certificate_id: request.process.target_certificate_id().map(str::to_string),
            validation_instant: request.validation_instant,
            policy_name: request.policy.name.clone(),
            policy_origin: request.policy_origin,
            document_name: request.diagnostic.document_name.clone(),
            signatures: request.diagnostic.signatures.len(),
            used_certificates: request.diagnostic.used_certificates.len(),
        }
    }
}

/// Dry-run executor: reports what would be validated without validating it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanExecutor;

impl ProcessExecutor for PlanExecutor {
    type Reports = ResolvedSummary;

    fn execute(&self, request: &ValidationRequest) -> Result<ResolvedSummary, ExecutorError> {
        Ok(ResolvedSummary::from(request))
    }
}
