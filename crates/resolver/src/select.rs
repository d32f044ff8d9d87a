//! Pure selection rules. No I/O, no clock, no policy.

use common::{DiagnosticDocument, ProcessKind, UsedCertificate};

/// Decides which validation process replays `diagnostic`.
///
/// A signature validation run always records at least one signature; a bare
/// certificate-chain run never does.
pub fn select_process_kind(diagnostic: &DiagnosticDocument) -> ProcessKind {
    if diagnostic.has_signatures() {
        ProcessKind::Signature
    } else {
        ProcessKind::Certificate {
            target_certificate_id: select_target_certificate(&diagnostic.used_certificates)
                .map(|c| c.id.clone()),
        }
    }
}

/// Picks the subject of a certificate replay: the certificate with the longest chain.
///
/// # Algorithm
/// Walk the certificates in input order. The first one seeds the choice; a
/// later one replaces it only with a strictly longer chain, so ties go to
/// the earliest entry. Returns `None` for an empty set.
///
/// # Examples
/// ```
/// # use common::UsedCertificate;
/// # use resolver::select_target_certificate;
/// let certs = vec![
///     UsedCertificate::new("C-ROOT"),
///     UsedCertificate::new("C-LEAF").with_chain_item("C-LEAF").with_chain_item("C-ROOT"),
/// ];
/// assert_eq!(select_target_certificate(&certs).unwrap().id, "C-LEAF");
/// ```
pub fn select_target_certificate(certificates: &[UsedCertificate]) -> Option<&UsedCertificate> {
    let mut selected: Option<&UsedCertificate> = None;
    for certificate in certificates {
        match selected {
            Some(current) if certificate.chain_len() <= current.chain_len() => {}
            _ => selected = Some(certificate),
        }
    }
    selected
}
