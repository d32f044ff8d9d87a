//! # Policy: The Process-Wide Default Validation Policy
//!
//! A replay that does not bring its own policy is judged against the default
//! one. Loading it is a deployment concern, so it happens at most once per
//! process and the result is shared read-only by every in-flight replay.
//!
//! ## Sources
//! - [`EmbeddedPolicy`]: the constraint document compiled into the binary.
//! - [`FilePolicy`]: an operator-supplied constraint document on disk.
//!
//! ## Caching
//! [`DefaultPolicy`] wraps a source in a `OnceLock`. Concurrent first callers
//! block until the single load finishes; later callers read the cached
//! outcome without synchronization. A failed load is cached too: a broken
//! default is a deployment defect and retrying cannot fix it.

use common::PolicyDocument;
use facade::{FacadeError, ValidationPolicyFacade};
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error};

/// The default constraint document shipped with the binary.
const EMBEDDED_POLICY_XML: &str = include_str!("../assets/constraint.xml");

/// Where the default policy is loaded from.
pub trait PolicySource: Send + Sync {
    /// Human-readable origin, used in operator logs.
    fn describe(&self) -> String;

    /// Loads and parses the policy. Called at most once per [`DefaultPolicy`].
    fn load(&self) -> Result<PolicyDocument, FacadeError>;
}

/// The compiled-in default policy.
pub struct EmbeddedPolicy;

impl PolicySource for EmbeddedPolicy {
    fn describe(&self) -> String {
        "embedded constraint.xml".to_string()
    }

    fn load(&self) -> Result<PolicyDocument, FacadeError> {
        ValidationPolicyFacade::unmarshall_bytes(EMBEDDED_POLICY_XML.as_bytes())
    }
}

/// A default policy read from disk.
pub struct FilePolicy {
    path: PathBuf,
}

impl FilePolicy {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PolicySource for FilePolicy {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<PolicyDocument, FacadeError> {
        let file = File::open(&self.path)?;
        ValidationPolicyFacade::unmarshall(file)
    }
}

/// Lazily loaded, read-only default policy.
///
/// Inject one instance (usually behind an `Arc`) into every resolver that
/// should share it.
pub struct DefaultPolicy {
    source: Box<dyn PolicySource>,
    cell: OnceLock<Result<Arc<PolicyDocument>, Arc<FacadeError>>>,
    loads: AtomicUsize,
}

impl DefaultPolicy {
    pub fn new(source: impl PolicySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cell: OnceLock::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Default policy backed by the compiled-in constraint document.
    pub fn embedded() -> Self {
        Self::new(EmbeddedPolicy)
    }

    /// Returns the cached default policy, loading it on first use.
    ///
    /// # Errors
    /// Returns the (cached) load failure if the source could not be read or parsed.
    pub fn get(&self) -> Result<Arc<PolicyDocument>, Arc<FacadeError>> {
        self.cell
            .get_or_init(|| {
                self.loads.fetch_add(1, Ordering::Relaxed);
                match self.source.load() {
                    Ok(policy) => {
                        debug!(
                            source = %self.source.describe(),
                            policy = %policy.name,
                            "loaded default validation policy"
                        );
                        Ok(Arc::new(policy))
                    }
                    Err(e) => {
                        error!(
                            source = %self.source.describe(),
                            error = %e,
                            "unable to load the default validation policy"
                        );
                        Err(Arc::new(e))
                    }
                }
            })
            .clone()
    }

    /// Returns `true` once a load has been attempted.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Number of times the source has been asked to load (0 or 1).
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn describe_source(&self) -> String {
        self.source.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Source that counts how often it is loaded.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl PolicySource for CountingSource {
        fn describe(&self) -> String {
            "counting".into()
        }

        fn load(&self) -> Result<PolicyDocument, FacadeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FacadeError::EmptyDocument);
            }
            Ok(PolicyDocument::new("counted"))
        }
    }

    #[test]
    fn test_embedded_policy_parses() {
        let policy = EmbeddedPolicy.load().unwrap();
        assert_eq!(policy.name, "QES AdESQC TL based");
        assert!(policy.constraint_sections.iter().any(|s| s == "SignatureConstraints"));
        assert!(policy.constraint_sections.iter().any(|s| s == "Cryptographic"));
        assert!(policy.constraint_sections.iter().any(|s| s == "Model"));
    }

    #[test]
    fn test_default_loaded_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let default = DefaultPolicy::new(CountingSource {
            calls: calls.clone(),
            fail: false,
        });
        assert!(!default.is_initialized());

        let first = default.get().unwrap();
        let second = default.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(default.load_count(), 1);
        assert!(default.is_initialized());
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let default = DefaultPolicy::new(CountingSource {
            calls: calls.clone(),
            fail: false,
        });

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    assert_eq!(default.get().unwrap().name, "counted");
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let default = DefaultPolicy::new(CountingSource {
            calls: calls.clone(),
            fail: true,
        });

        assert!(default.get().is_err());
        assert!(default.get().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_file_policy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"<ConstraintsParameters Name="Operator policy"><Revocation/></ConstraintsParameters>"#)
            .unwrap();

        let default = DefaultPolicy::new(FilePolicy::new(file.path()));
        let policy = default.get().unwrap();
        assert_eq!(policy.name, "Operator policy");
        assert_eq!(policy.constraint_sections, vec!["Revocation".to_string()]);
    }

    #[test]
    fn test_missing_file_policy() {
        let dir = tempfile::tempdir().unwrap();
        let source = FilePolicy::new(dir.path().join("absent.xml"));
        assert!(matches!(source.load(), Err(FacadeError::IoError(_))));
    }
}
