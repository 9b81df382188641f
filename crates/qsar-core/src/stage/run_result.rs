use crate::errors::StageFailure;
use crate::model::Artifact;

/// Resultado neutro de ejecutar un stage.
pub enum StageRunResult {
    Success { outputs: Vec<Artifact> },
    Failure { error: StageFailure },
}
