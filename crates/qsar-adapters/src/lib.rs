//! qsar-adapters: capa de adaptación Dominio ↔ Core.
//!
//! Este crate provee:
//! - Artifacts tipados neutrales (sin semántica en el core) que fluyen entre
//!   los stages del pipeline de predicción.
//! - Los seis stages del pipeline (acquire → depict → descriptors → features
//!   → classify → report) como stages tipados sobre esos artifacts.
//! - `build_prediction_engine` / `run_prediction`: el cableado completo del
//!   pipeline, listo para el CLI y los tests de integración.
//!
//! Nota: el core sólo conoce `Artifact { kind, hash, payload, metadata }`;
//! aquí nos apoyamos en artifacts tipados que serializan a payload JSON y en
//! los macros del core para stages tipados.

pub mod artifacts;
pub mod failures;
pub mod pipeline;
pub mod stages;

pub use artifacts::{DepictionArtifact, DescriptorsArtifact, MoleculeArtifact, PredictionArtifact, ReportArtifact,
                    ScaledFeaturesArtifact};
pub use pipeline::{build_prediction_engine, run_prediction, PredictionOutcome};
pub use stages::{AcquireMoleculeStage, ClassifyStage, ComputeDescriptorsStage, RenderDepictionStage, ReportStage,
                 SelectScaleStage};
