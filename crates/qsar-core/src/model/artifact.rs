//! Artifact neutral del pipeline.
//!
//! Un `Artifact` es la unidad de datos que fluye entre stages. El motor no
//! interpreta su semántica: `payload` es JSON genérico y `hash` se calcula
//! sobre el JSON canonicalizado, sirviendo de identidad para trazabilidad.
//! `metadata` no entra al hash.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tipos neutrales de artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// JSON genérico sin semántica para el motor.
    GenericJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Hash canónico del payload; lo asigna el motor al almacenar.
    pub hash: String,
    pub payload: Value,
    pub metadata: Option<Value>,
}

impl Artifact {
    /// Constructor interno; preferir `ArtifactSpec::into_artifact`.
    pub(crate) fn new_unhashed(kind: ArtifactKind, payload: Value, metadata: Option<Value>) -> Self {
        Self { kind,
               hash: String::new(),
               payload,
               metadata }
    }
}
