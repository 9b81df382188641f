use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Artifact;

/// Contexto entregado a `StageDefinition::run`.
pub struct ExecutionContext {
    /// Artifact único encadenado; `None` para el primer stage.
    pub input: Option<Artifact>,
    /// Parámetros canónicos del stage.
    pub params: Value,
}

impl ExecutionContext {
    pub fn params_as<P: DeserializeOwned>(&self) -> Result<P, serde_json::Error> {
        serde_json::from_value(self.params.clone())
    }
}
