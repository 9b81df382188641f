//! Mapeo de los errores de cada capa a la taxonomía `StageFailure` del core.
//!
//! Los crates de dominio/descriptores/modelo no conocen al core, y ambos
//! tipos son foráneos aquí, así que el mapeo va en funciones libres en lugar
//! de impls `From`.

use qsar_core::StageFailure;
use qsar_descriptors::DescriptorError;
use qsar_domain::DomainError;
use qsar_model::ModelError;

pub fn domain_failure(e: DomainError) -> StageFailure {
    match e {
        DomainError::InvalidSmiles(msg) => StageFailure::InvalidMolecule(msg),
        DomainError::Depiction(msg) => StageFailure::Io(msg),
    }
}

pub fn descriptor_failure(e: DescriptorError) -> StageFailure {
    match e {
        DescriptorError::Io(io) => StageFailure::Io(io.to_string()),
        other => StageFailure::DescriptorComputation(other.to_string()),
    }
}

pub fn model_failure(e: ModelError) -> StageFailure {
    match e {
        ModelError::Load(msg) => StageFailure::ModelLoad(msg),
        ModelError::MissingFeature(name) => StageFailure::MissingFeature(name),
        ModelError::FeatureMismatch { expected, got } => StageFailure::FeatureMismatch { expected, got },
    }
}
