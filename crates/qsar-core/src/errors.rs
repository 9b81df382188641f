//! Errores del motor y taxonomía de fallos de stage.
//!
//! `StageFailure` es el contrato observable de error del pipeline: viaja
//! serializado dentro del evento `StageFailed`, por lo que debe mantenerse
//! estable. `EngineError` cubre además las violaciones de protocolo del
//! propio motor (run ya completado, índice inválido, etc.).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallos tipados producidos por los stages del pipeline de predicción.
/// Ninguno se reintenta: el run se detiene en el primer fallo.
#[derive(Debug, Error, PartialEq, Clone, Serialize, Deserialize)]
pub enum StageFailure {
    /// La cadena SMILES está vacía o no parsea a una estructura válida.
    #[error("invalid molecule: {0}")]
    InvalidMolecule(String),
    /// La herramienta externa de descriptores falló o produjo salida inválida.
    #[error("descriptor computation failed: {0}")]
    DescriptorComputation(String),
    /// Una feature esperada por el modelo no está en la tabla de descriptores.
    #[error("expected feature missing from descriptor table: {0}")]
    MissingFeature(String),
    /// El artefacto del modelo no se pudo cargar o es inconsistente.
    #[error("model artifact load failed: {0}")]
    ModelLoad(String),
    /// El ancho del vector escalado no coincide con el del clasificador.
    #[error("feature vector width {got} does not match model width {expected}")]
    FeatureMismatch { expected: usize, got: usize },
    /// Error de E/S sobre los archivos de trabajo transitorios.
    #[error("io failure: {0}")]
    Io(String),
}

#[derive(Debug, Error, PartialEq, Clone, Serialize, Deserialize)]
pub enum EngineError {
    #[error("run already completed")]
    RunCompleted,
    #[error("run has failed previously (stop-on-failure invariant)")]
    RunHasFailed,
    #[error("invalid stage index")]
    InvalidStageIndex,
    #[error("missing required input artifact")]
    MissingInput,
    #[error("first stage must be a source")]
    FirstStageMustBeSource,
    #[error(transparent)]
    Stage(#[from] StageFailure),
    #[error("internal: {0}")]
    Internal(String),
}
