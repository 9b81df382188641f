use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ModelError {
    /// El artefacto no existe, no parsea o viola sus invariantes internos.
    /// Fatal al arranque, nunca por corrida.
    #[error("model load: {0}")]
    Load(String),

    /// Una feature que el modelo espera no está en la tabla de descriptores.
    #[error("feature '{0}' expected by the model is missing from the descriptor table")]
    MissingFeature(String),

    /// El ancho del vector no coincide con el del clasificador.
    #[error("feature vector width {got} does not match model width {expected}")]
    FeatureMismatch { expected: usize, got: usize },
}
