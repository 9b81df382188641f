//! Modelos neutrales del motor (Artifact, contexto de ejecución, fingerprint).

pub mod artifact;
pub mod context;
pub mod fingerprint;
pub mod typed_artifact;

pub use artifact::{Artifact, ArtifactKind};
pub use context::ExecutionContext;
pub use fingerprint::StageFingerprintInput;
pub use typed_artifact::{ArtifactDecodeError, ArtifactSpec};
