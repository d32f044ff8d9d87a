//! # Common: Replay Domain Model
//!
//! **Role**: Shared vocabulary between the XML facades, the default-policy cache
//! and the request resolver.
//!
//! **Core Types**:
//! - `DiagnosticDocument`: an unmarshalled diagnostic-data snapshot (signatures,
//!   used certificates with their chains, the recorded validation date).
//! - `PolicyDocument`: the acceptance-constraint rules governing a replay.
//! - `ValidationRequest`: the fully resolved input handed to a process executor.
//! - `ProcessKind`: certificate vs. signature validation, decided once.
//!
//! Everything here is plain data. Parsing lives in `facade`, selection in `resolver`.

pub mod diagnostic;
pub mod policy;
pub mod request;

pub use diagnostic::{ChainItem, DiagnosticDocument, SignatureRecord, UsedCertificate};
pub use policy::PolicyDocument;
pub use request::{PolicyOrigin, ProcessKind, ValidationRequest};
