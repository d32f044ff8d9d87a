//! # Facade: XML Unmarshalling
//!
//! Turns uploaded diagnostic-data and validation-policy XML into the domain
//! model from `common`.
//!
//! ## Stream handling
//! Every `unmarshall` call takes its reader by value. The reader is drained
//! into memory and dropped before parsing starts, so the underlying file or
//! upload handle is released on every exit path, including parse failures.
//!
//! Schema validation is not performed: unknown elements are skipped and only
//! the fields the replay needs are mapped.
//!
//! ## Encoding
//! Uploads must be UTF-8 (or plain ASCII). Bytes that do not decode as UTF-8
//! are rejected with [`FacadeError::NotUtf8`] whatever the XML declaration
//! claims; re-encode Latin-1 or UTF-16 documents before uploading.

mod date;
pub mod diagnostic;
pub mod policy;
mod xml;

pub use diagnostic::DiagnosticDataFacade;
pub use policy::ValidationPolicyFacade;

use std::io::Read;

/// Errors from unmarshalling operations.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Malformed XML: {0}")]
    XmlError(#[from] quick_xml::DeError),
    #[error("Invalid validation date: {0:?}")]
    InvalidDate(String),
    #[error("Document is not UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("Empty document")]
    EmptyDocument,
}

/// Drains `reader` and releases it before returning.
fn drain<R: Read>(mut reader: R) -> Result<Vec<u8>, FacadeError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    drop(reader);
    Ok(buf)
}

/// Decodes an upload as UTF-8, rejecting blank documents.
fn decode(bytes: &[u8]) -> Result<&str, FacadeError> {
    let text = std::str::from_utf8(bytes)?;
    if text.trim().is_empty() {
        return Err(FacadeError::EmptyDocument);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Reader that records when it is dropped.
    struct TrackedReader {
        inner: Cursor<Vec<u8>>,
        released: Arc<AtomicBool>,
    }

    impl TrackedReader {
        fn new(bytes: &[u8]) -> (Self, Arc<AtomicBool>) {
            let released = Arc::new(AtomicBool::new(false));
            let reader = Self {
                inner: Cursor::new(bytes.to_vec()),
                released: released.clone(),
            };
            (reader, released)
        }
    }

    impl Read for TrackedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Drop for TrackedReader {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_reader_released_on_policy_parse_failure() {
        let (reader, released) = TrackedReader::new(b"<ConstraintsParameters Name=\"x\">");
        assert!(ValidationPolicyFacade::unmarshall(reader).is_err());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_reader_released_on_diagnostic_parse_failure() {
        let (reader, released) = TrackedReader::new(b"<DiagnosticData><Signatures/>");
        assert!(DiagnosticDataFacade::unmarshall(reader).is_err());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_reader_released_on_success() {
        let (reader, released) = TrackedReader::new(
            b"<DiagnosticData><ValidationDate>2020-01-01T00:00:00Z</ValidationDate></DiagnosticData>",
        );
        assert!(DiagnosticDataFacade::unmarshall(reader).is_ok());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_latin1_bytes_rejected_as_not_utf8() {
        let mut xml = br#"<?xml version="1.0" encoding="ISO-8859-1"?><ConstraintsParameters Name="Fran"#.to_vec();
        xml.push(0xE7); // 'ç' in Latin-1
        xml.extend_from_slice(br#"ais"/>"#);
        assert!(matches!(
            ValidationPolicyFacade::unmarshall_bytes(&xml),
            Err(FacadeError::NotUtf8(_))
        ));
    }

    #[test]
    fn test_blank_is_empty_document() {
        assert!(matches!(decode(b" \r\n\t"), Err(FacadeError::EmptyDocument)));
    }
}
