use crate::date::parse_validation_date;
use crate::xml::XmlDiagnosticData;
use crate::{decode, drain, FacadeError};
use common::{ChainItem, DiagnosticDocument, SignatureRecord, UsedCertificate};
use std::io::Read;
use tracing::debug;

/// Unmarshaller for `<DiagnosticData>` documents.
pub struct DiagnosticDataFacade;

impl DiagnosticDataFacade {
    /// Reads a diagnostic-data document from `reader`.
    ///
    /// The reader is consumed and released before parsing, whatever the outcome.
    pub fn unmarshall<R: Read>(reader: R) -> Result<DiagnosticDocument, FacadeError> {
        let bytes = drain(reader)?;
        Self::unmarshall_bytes(&bytes)
    }

    /// Parses an in-memory diagnostic-data document.
    pub fn unmarshall_bytes(bytes: &[u8]) -> Result<DiagnosticDocument, FacadeError> {
        let text = decode(bytes)?;
        let raw: XmlDiagnosticData = quick_xml::de::from_str(text)?;
        let validation_date = parse_validation_date(&raw.validation_date)?;

        let signatures: Vec<SignatureRecord> = raw
            .signatures
            .items
            .into_iter()
            .map(|s| SignatureRecord {
                id: s.id,
                signature_filename: s.signature_filename,
            })
            .collect();

        let used_certificates: Vec<UsedCertificate> = raw
            .used_certificates
            .items
            .into_iter()
            .map(|c| UsedCertificate {
                id: c.id,
                common_name: c.common_name,
                certificate_chain: c
                    .certificate_chain
                    .items
                    .into_iter()
                    .map(|item| ChainItem {
                        certificate: item.certificate,
                    })
                    .collect(),
            })
            .collect();

        debug!(
            signatures = signatures.len(),
            used_certificates = used_certificates.len(),
            "unmarshalled diagnostic data"
        );

        Ok(DiagnosticDocument {
            document_name: raw.document_name,
            validation_date,
            signatures,
            used_certificates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    const SIGNATURE_DIAG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DiagnosticData xmlns="http://dss.esig.europa.eu/validation/diagnostic">
    <DocumentName>contract.pdf</DocumentName>
    <ValidationDate>2019-06-19T09:45:32Z</ValidationDate>
    <Signatures>
        <Signature Id="S-1F2E">
            <SignatureFilename>contract.pdf</SignatureFilename>
            <SignatureFormat>PAdES-BASELINE-B</SignatureFormat>
        </Signature>
    </Signatures>
    <UsedCertificates>
        <Certificate Id="C-LEAF">
            <SubjectDistinguishedName Format="RFC2253">CN=Leaf</SubjectDistinguishedName>
            <CommonName>Leaf</CommonName>
            <CertificateChain>
                <ChainItem Certificate="C-LEAF"/>
                <ChainItem Certificate="C-ROOT"/>
            </CertificateChain>
        </Certificate>
        <Certificate Id="C-ROOT">
            <CommonName>Root</CommonName>
            <CertificateChain/>
        </Certificate>
    </UsedCertificates>
</DiagnosticData>"#;

    const CERTIFICATE_DIAG: &str = r#"<DiagnosticData>
    <ValidationDate>2021-03-01T12:00:00</ValidationDate>
    <Signatures/>
    <UsedCertificates>
        <Certificate Id="C-A"/>
    </UsedCertificates>
</DiagnosticData>"#;

    #[test]
    fn test_unmarshall_signature_snapshot() {
        let doc = DiagnosticDataFacade::unmarshall_bytes(SIGNATURE_DIAG.as_bytes()).unwrap();

        assert_eq!(doc.document_name.as_deref(), Some("contract.pdf"));
        assert_eq!(
            doc.validation_date,
            Utc.with_ymd_and_hms(2019, 6, 19, 9, 45, 32).unwrap()
        );
        assert_eq!(doc.signatures.len(), 1);
        assert_eq!(doc.signatures[0].id, "S-1F2E");
        assert_eq!(
            doc.signatures[0].signature_filename.as_deref(),
            Some("contract.pdf")
        );

        assert_eq!(doc.used_certificates.len(), 2);
        let leaf = &doc.used_certificates[0];
        assert_eq!(leaf.id, "C-LEAF");
        assert_eq!(leaf.common_name.as_deref(), Some("Leaf"));
        assert_eq!(leaf.chain_len(), 2);
        assert_eq!(leaf.certificate_chain[1].certificate, "C-ROOT");
        assert_eq!(doc.used_certificates[1].chain_len(), 0);
    }

    #[test]
    fn test_unmarshall_certificate_snapshot() {
        let doc = DiagnosticDataFacade::unmarshall_bytes(CERTIFICATE_DIAG.as_bytes()).unwrap();

        assert!(doc.signatures.is_empty());
        assert_eq!(doc.used_certificates.len(), 1);
        assert_eq!(doc.used_certificates[0].chain_len(), 0);
        assert!(doc.document_name.is_none());
    }

    #[test]
    fn test_missing_sections_read_as_empty() {
        let xml = "<DiagnosticData><ValidationDate>2020-01-01T00:00:00Z</ValidationDate></DiagnosticData>";
        let doc = DiagnosticDataFacade::unmarshall_bytes(xml.as_bytes()).unwrap();
        assert!(doc.signatures.is_empty());
        assert!(doc.used_certificates.is_empty());
    }

    #[test]
    fn test_missing_validation_date_rejected() {
        let xml = "<DiagnosticData><Signatures/></DiagnosticData>";
        assert!(matches!(
            DiagnosticDataFacade::unmarshall_bytes(xml.as_bytes()),
            Err(FacadeError::XmlError(_))
        ));
    }

    #[test]
    fn test_bad_validation_date_rejected() {
        let xml = "<DiagnosticData><ValidationDate>soon</ValidationDate></DiagnosticData>";
        assert!(matches!(
            DiagnosticDataFacade::unmarshall_bytes(xml.as_bytes()),
            Err(FacadeError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_truncated_document_rejected() {
        let truncated = &SIGNATURE_DIAG[..SIGNATURE_DIAG.len() / 2];
        assert!(DiagnosticDataFacade::unmarshall_bytes(truncated.as_bytes()).is_err());
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(
            DiagnosticDataFacade::unmarshall_bytes(b"  \n"),
            Err(FacadeError::EmptyDocument)
        ));
    }

    #[test]
    fn test_unmarshall_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CERTIFICATE_DIAG.as_bytes()).unwrap();

        let reader = std::fs::File::open(file.path()).unwrap();
        let doc = DiagnosticDataFacade::unmarshall(reader).unwrap();
        assert_eq!(doc.used_certificates[0].id, "C-A");
    }
}
