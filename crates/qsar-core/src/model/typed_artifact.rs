//! Tipado fuerte opcional sobre `Artifact`, manteniendo el núcleo agnóstico.
//!
//! Los tipos de dominio que quieran fluir por el pipeline implementan
//! `ArtifactSpec` (normalmente vía el macro `typed_artifact!`): serializan a
//! un payload JSON con `schema_version` estable y se decodifican verificando
//! kind, versión y una validación semántica ligera.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{Artifact, ArtifactKind};

/// Errores al decodificar un artifact tipado.
#[derive(Debug, Error)]
pub enum ArtifactDecodeError {
    #[error("artifact kind mismatch (expected {expected:?}, found {found:?})")]
    KindMismatch { expected: ArtifactKind, found: ArtifactKind },
    #[error("artifact schema version mismatch (expected {expected}, found {found:?})")]
    VersionMismatch { expected: u32, found: Option<u32> },
    #[error("artifact deserialize: {0}")]
    Deserialize(String),
    #[error("artifact validation: {0}")]
    Validation(String),
}

pub trait ArtifactSpec: Sized + Serialize + DeserializeOwned + Clone {
    /// Kind asociado (permite distinguir en runtime).
    const KIND: ArtifactKind;
    /// Versión de esquema; incrementar en cambios incompatibles.
    const SCHEMA_VERSION: u32 = 1;

    /// Validación semántica ligera, sin efectos secundarios.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Serializa a `Artifact` sin hash (lo añadirá el motor).
    fn into_artifact(self) -> Artifact {
        let mut value = serde_json::to_value(&self).expect("serialize artifact spec");
        if let Value::Object(map) = &mut value {
            map.entry("schema_version".to_string()).or_insert(Value::from(Self::SCHEMA_VERSION));
        }
        Artifact::new_unhashed(Self::KIND, value, None)
    }

    /// Decodifica desde el artifact neutro verificando kind y versión.
    fn from_artifact(a: &Artifact) -> Result<Self, ArtifactDecodeError> {
        if a.kind != Self::KIND {
            return Err(ArtifactDecodeError::KindMismatch { expected: Self::KIND,
                                                           found: a.kind.clone() });
        }
        let found = a.payload.get("schema_version").and_then(|v| v.as_u64()).map(|v| v as u32);
        match found {
            Some(v) if v == Self::SCHEMA_VERSION => {}
            other => {
                return Err(ArtifactDecodeError::VersionMismatch { expected: Self::SCHEMA_VERSION,
                                                                  found: other })
            }
        }
        let decoded: Self = serde_json::from_value(a.payload.clone())
            .map_err(|e| ArtifactDecodeError::Deserialize(e.to_string()))?;
        decoded.validate().map_err(ArtifactDecodeError::Validation)?;
        Ok(decoded)
    }
}
