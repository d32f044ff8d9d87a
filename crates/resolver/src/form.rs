/// Per-request replay switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Ignore any uploaded policy and use the process-wide default.
    pub use_default_policy: bool,
    /// Replay at the current instant instead of the recorded validation date.
    pub reset_validation_date: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            use_default_policy: true,
            reset_validation_date: false,
        }
    }
}

/// An uploaded replay: diagnostic bytes, optional policy bytes and switches.
///
/// A fresh form defaults to the default policy, matching the pre-filled upload form.
#[derive(Debug, Clone)]
pub struct ReplayForm {
    pub diagnostic_file: Vec<u8>,
    pub policy_file: Option<Vec<u8>>,
    pub options: ReplayOptions,
}

impl ReplayForm {
    pub fn new(diagnostic_file: impl Into<Vec<u8>>) -> Self {
        Self {
            diagnostic_file: diagnostic_file.into(),
            policy_file: None,
            options: ReplayOptions::default(),
        }
    }

    /// Attaches a policy upload and opts out of the default policy.
    pub fn with_policy(mut self, policy_file: impl Into<Vec<u8>>) -> Self {
        self.policy_file = Some(policy_file.into());
        self.options.use_default_policy = false;
        self
    }

    pub fn use_default_policy(mut self, yes: bool) -> Self {
        self.options.use_default_policy = yes;
        self
    }

    pub fn reset_date(mut self, yes: bool) -> Self {
        self.options.reset_validation_date = yes;
        self
    }

    /// The uploaded policy, if one with content was supplied.
    ///
    /// A zero-length upload counts as no upload.
    pub fn policy_bytes(&self) -> Option<&[u8]> {
        self.policy_file.as_deref().filter(|b| !b.is_empty())
    }
}
