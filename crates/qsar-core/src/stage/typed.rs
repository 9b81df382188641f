//! Interfaz de alto nivel para definir stages con tipos fuertes
//! (Params / Input / Output) y fallo tipado.
//!
//! Implementadores escriben `run_typed` con tipos concretos; el adaptador de
//! abajo convierte esa ejecución a la interfaz neutra `StageDefinition`. Los
//! errores de decodificación de input/params no entran en pánico: se mapean a
//! fallos tipados para que queden registrados en el log de eventos.

use serde::{de::DeserializeOwned, Serialize};

use super::{StageKind, StageRunResult};
use crate::errors::StageFailure;
use crate::model::ArtifactSpec;

/// Resultado tipado de ejecutar un `TypedStage`.
pub enum StageRunResultTyped<Out: ArtifactSpec + Clone> {
    Success { outputs: Vec<Out> },
    Failure { error: StageFailure },
}

impl<Out: ArtifactSpec + Clone> StageRunResultTyped<Out> {
    /// Convierte a `StageRunResult` neutro serializando los outputs vía
    /// `ArtifactSpec::into_artifact`.
    pub fn into_neutral(self) -> StageRunResult {
        match self {
            StageRunResultTyped::Success { outputs } => {
                let arts = outputs.into_iter().map(|o| o.into_artifact()).collect();
                StageRunResult::Success { outputs: arts }
            }
            StageRunResultTyped::Failure { error } => StageRunResult::Failure { error },
        }
    }
}

pub trait TypedStage {
    /// Parámetros deserializables y clonables (soportan `Default`).
    type Params: DeserializeOwned + Serialize + Clone + Default;
    /// Tipo concreto esperado como input (para `Source` se ignora).
    type Input: ArtifactSpec + Clone;
    /// Tipo concreto producido como output.
    type Output: ArtifactSpec + Clone;

    /// Identificador estable del stage dentro del pipeline.
    fn id(&self) -> &'static str;

    fn name(&self) -> &str {
        self.id()
    }

    fn kind(&self) -> StageKind;

    fn params_default(&self) -> Self::Params {
        Default::default()
    }

    /// Ejecución tipada. Para `Source`, `input` será `None`.
    fn run_typed(&self, input: Option<Self::Input>, params: Self::Params) -> StageRunResultTyped<Self::Output>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedStage` implementa `StageDefinition` neutro.
// -------------------------------------------------------------
impl<T> crate::stage::StageDefinition for T
    where T: TypedStage + 'static + std::fmt::Debug
{
    fn id(&self) -> &str {
        <Self as TypedStage>::id(self)
    }

    fn name(&self) -> &str {
        <Self as TypedStage>::name(self)
    }

    fn base_params(&self) -> serde_json::Value {
        serde_json::to_value(self.params_default()).expect("serialize default params")
    }

    fn run(&self, ctx: &crate::model::ExecutionContext) -> StageRunResult {
        // Params inválidos caen a los defaults del stage.
        let params: <Self as TypedStage>::Params = ctx.params_as().unwrap_or_else(|_| self.params_default());

        // Un input presente pero indecodificable es un error de cableado del
        // pipeline; se reporta como fallo, no como pánico.
        let typed_in: Option<<Self as TypedStage>::Input> = match ctx.input.as_ref() {
            None => None,
            Some(a) => match <Self as TypedStage>::Input::from_artifact(a) {
                Ok(v) => Some(v),
                Err(e) => {
                    return StageRunResult::Failure { error: StageFailure::Io(format!("stage {}: {e}",
                                                                                    <Self as TypedStage>::id(self))) }
                }
            },
        };

        <Self as TypedStage>::run_typed(self, typed_in, params).into_neutral()
    }

    fn kind(&self) -> StageKind {
        <Self as TypedStage>::kind(self)
    }

    fn definition_hash(&self) -> String {
        let hash_input = serde_json::json!({
            "id": <Self as TypedStage>::id(self),
            "kind": format!("{:?}", <Self as TypedStage>::kind(self)),
            "base_params": crate::stage::StageDefinition::base_params(self),
            "type": std::any::type_name::<T>(),
        });
        crate::hashing::hash_value(&hash_input)
    }
}
