//! Definiciones relacionadas a stages.
//!
//! Un stage es una unidad determinista que transforma a lo sumo un `Artifact`
//! de entrada en un artifact de salida. Este módulo define:
//! - `StageDefinition`: interfaz neutral usada por el motor.
//! - `TypedStage`: interfaz de alto nivel con tipos fuertes y fallo tipado.
//! - `Pipe` para construir pipelines validando IO en compilación.

pub mod definition;
pub mod macros;
pub mod pipeline;
mod run_result;
mod status;
pub mod typed;

pub use definition::{StageDefinition, StageKind};
pub use pipeline::{Pipe, SameAs};
pub use run_result::StageRunResult;
pub use status::StageStatus;
pub use typed::{StageRunResultTyped, TypedStage};
