use thiserror::Error;

/// Errores del dominio químico.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum DomainError {
    /// La cadena SMILES no representa una estructura válida.
    #[error("invalid SMILES: {0}")]
    InvalidSmiles(String),

    #[error("depiction failed: {0}")]
    Depiction(String),
}
