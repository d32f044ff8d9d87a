use serde::{Deserialize, Serialize};

/// Acceptance-constraint rules for a validation run.
///
/// The rules themselves travel as the complete constraint document in
/// `constraints_xml`; evaluating them is the executor's business. `name`,
/// `description` and `constraint_sections` are read from that document for
/// logs and summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub name: String,
    pub description: Option<String>,
    /// Top-level constraint sections present in the document, in canonical order.
    pub constraint_sections: Vec<String>,
    /// The constraint document as uploaded or loaded, UTF-8.
    pub constraints_xml: String,
}

impl PolicyDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            constraint_sections: Vec::new(),
            constraints_xml: String::new(),
        }
    }
}
