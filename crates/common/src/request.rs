use crate::{DiagnosticDocument, PolicyDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which validation process replays a snapshot.
///
/// Only the certificate variant names a subject; a signature replay validates
/// every signature recorded in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessKind {
    Certificate {
        /// `None` when the snapshot lists no certificates at all.
        target_certificate_id: Option<String>,
    },
    Signature,
}

impl ProcessKind {
    pub fn is_certificate(&self) -> bool {
        matches!(self, ProcessKind::Certificate { .. })
    }

    /// Target certificate of a certificate replay.
    pub fn target_certificate_id(&self) -> Option<&str> {
        match self {
            ProcessKind::Certificate {
                target_certificate_id,
            } => target_certificate_id.as_deref(),
            ProcessKind::Signature => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessKind::Certificate { .. } => "certificate",
            ProcessKind::Signature => "signature",
        }
    }
}

/// Where the governing policy came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyOrigin {
    /// The process-wide default policy.
    Default,
    /// A policy document supplied with the request.
    Uploaded,
}

/// A fully configured validation request, ready for a process executor.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub process: ProcessKind,
    pub validation_instant: DateTime<Utc>,
    pub policy: Arc<PolicyDocument>,
    pub policy_origin: PolicyOrigin,
    pub diagnostic: DiagnosticDocument,
}
