use serde_json::Value;

use super::run_result::StageRunResult;
use crate::model::ExecutionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Source,
    Transform,
    Sink,
}

/// Interfaz neutral de un stage. Implementaciones deben ser puras respecto a
/// inputs + params: misma entrada, mismo resultado.
pub trait StageDefinition {
    /// Identificador estable y único dentro del pipeline.
    fn id(&self) -> &str;

    /// Nombre amigable opcional.
    fn name(&self) -> &str {
        self.id()
    }

    /// Parámetros base deterministas.
    fn base_params(&self) -> Value;

    /// Ejecución del stage. Sólo puede usar inputs + params.
    fn run(&self, ctx: &ExecutionContext) -> StageRunResult;

    /// Tipo general del stage.
    fn kind(&self) -> StageKind;

    /// Hash de la definición del stage (id + kind + params + tipo).
    fn definition_hash(&self) -> String {
        let hash_input = serde_json::json!({
            "id": self.id(),
            "kind": format!("{:?}", self.kind()),
            "base_params": self.base_params(),
        });
        crate::hashing::hash_value(&hash_input)
    }
}
