use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference from a certificate chain to another used certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainItem {
    /// Identifier of the referenced certificate.
    pub certificate: String,
}

/// A certificate recorded in the diagnostic data, with the chain built for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedCertificate {
    pub id: String,
    pub common_name: Option<String>,
    /// Ordered chain entries. End-entity certificates carry the deepest chains;
    /// trust anchors usually carry none.
    pub certificate_chain: Vec<ChainItem>,
}

impl UsedCertificate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            common_name: None,
            certificate_chain: Vec::new(),
        }
    }

    /// Appends a chain entry pointing at `certificate_id`.
    pub fn with_chain_item(mut self, certificate_id: impl Into<String>) -> Self {
        self.certificate_chain.push(ChainItem {
            certificate: certificate_id.into(),
        });
        self
    }

    /// Number of chain entries (0 for an empty chain).
    pub fn chain_len(&self) -> usize {
        self.certificate_chain.len()
    }
}

/// A signature found while the diagnostic data was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub id: String,
    pub signature_filename: Option<String>,
}

impl SignatureRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            signature_filename: None,
        }
    }
}

/// An unmarshalled diagnostic-data snapshot.
///
/// Owned by the caller for one replay and never mutated while a request is
/// being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticDocument {
    pub document_name: Option<String>,
    /// Instant recorded when the diagnostic data was originally produced.
    pub validation_date: DateTime<Utc>,
    pub signatures: Vec<SignatureRecord>,
    pub used_certificates: Vec<UsedCertificate>,
}

impl DiagnosticDocument {
    /// Creates an empty snapshot recorded at `validation_date`.
    pub fn new(validation_date: DateTime<Utc>) -> Self {
        Self {
            document_name: None,
            validation_date,
            signatures: Vec::new(),
            used_certificates: Vec::new(),
        }
    }

    /// Returns `true` if the snapshot came from a signature validation run.
    pub fn has_signatures(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Finds a used certificate by identifier.
    pub fn certificate(&self, id: &str) -> Option<&UsedCertificate> {
        self.used_certificates.iter().find(|c| c.id == id)
    }
}
