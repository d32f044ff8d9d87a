use crate::xml::XmlConstraintsParameters;
use crate::{decode, drain, FacadeError};
use common::PolicyDocument;
use std::io::Read;
use tracing::debug;

/// Unmarshaller for `<ConstraintsParameters>` validation policies.
pub struct ValidationPolicyFacade;

impl ValidationPolicyFacade {
    /// Reads a validation policy from `reader`, releasing it before parsing.
    pub fn unmarshall<R: Read>(reader: R) -> Result<PolicyDocument, FacadeError> {
        let bytes = drain(reader)?;
        Self::unmarshall_bytes(&bytes)
    }

    /// Parses an in-memory validation policy.
    pub fn unmarshall_bytes(bytes: &[u8]) -> Result<PolicyDocument, FacadeError> {
        let text = decode(bytes)?;
        let raw: XmlConstraintsParameters = quick_xml::de::from_str(text)?;
        let constraint_sections = raw.present_sections();

        debug!(
            policy = %raw.name,
            sections = constraint_sections.len(),
            "unmarshalled validation policy"
        );

        Ok(PolicyDocument {
            name: raw.name,
            description: raw
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            constraint_sections,
            constraints_xml: text.to_string(),
        })
    }
}
