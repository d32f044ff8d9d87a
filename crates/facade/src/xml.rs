//! Serde mirrors of the XML payloads.
//!
//! Attribute fields use quick-xml's `@` prefix. Wrapper elements default to
//! empty so that `<Signatures/>` and a missing `<Signatures>` read the same.

use serde::de::IgnoredAny;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct XmlDiagnosticData {
    #[serde(rename = "DocumentName", default)]
    pub document_name: Option<String>,
    #[serde(rename = "ValidationDate")]
    pub validation_date: String,
    #[serde(rename = "Signatures", default)]
    pub signatures: XmlSignatures,
    #[serde(rename = "UsedCertificates", default)]
    pub used_certificates: XmlUsedCertificates,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlSignatures {
    #[serde(rename = "Signature", default)]
    pub items: Vec<XmlSignature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlSignature {
    #[serde(rename = "@Id")]
    pub id: String,
    #[serde(rename = "SignatureFilename", default)]
    pub signature_filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlUsedCertificates {
    #[serde(rename = "Certificate", default)]
    pub items: Vec<XmlCertificate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlCertificate {
    #[serde(rename = "@Id")]
    pub id: String,
    #[serde(rename = "CommonName", default)]
    pub common_name: Option<String>,
    #[serde(rename = "CertificateChain", default)]
    pub certificate_chain: XmlCertificateChain,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlCertificateChain {
    #[serde(rename = "ChainItem", default)]
    pub items: Vec<XmlChainItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlChainItem {
    #[serde(rename = "@Certificate")]
    pub certificate: String,
}

/// `<ConstraintsParameters>` root of a validation policy.
///
/// Section bodies are skipped; only their presence is recorded.
#[derive(Debug, Deserialize)]
pub(crate) struct XmlConstraintsParameters {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "ContainerConstraints", default)]
    pub container_constraints: Option<IgnoredAny>,
    #[serde(rename = "SignatureConstraints", default)]
    pub signature_constraints: Option<IgnoredAny>,
    #[serde(rename = "CounterSignatureConstraints", default)]
    pub counter_signature_constraints: Option<IgnoredAny>,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<IgnoredAny>,
    #[serde(rename = "Revocation", default)]
    pub revocation: Option<IgnoredAny>,
    #[serde(rename = "Cryptographic", default)]
    pub cryptographic: Option<IgnoredAny>,
    #[serde(rename = "Model", default)]
    pub model: Option<IgnoredAny>,
    #[serde(rename = "eIDAS", default)]
    pub eidas: Option<IgnoredAny>,
}

impl XmlConstraintsParameters {
    pub fn present_sections(&self) -> Vec<String> {
        [
            ("ContainerConstraints", self.container_constraints.is_some()),
            ("SignatureConstraints", self.signature_constraints.is_some()),
            (
                "CounterSignatureConstraints",
                self.counter_signature_constraints.is_some(),
            ),
            ("Timestamp", self.timestamp.is_some()),
            ("Revocation", self.revocation.is_some()),
            ("Cryptographic", self.cryptographic.is_some()),
            ("Model", self.model.is_some()),
            ("eIDAS", self.eidas.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| name.to_string())
        .collect()
    }
}
