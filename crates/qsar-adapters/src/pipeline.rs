//! Cableado del pipeline de predicción completo.
//!
//! `build_prediction_engine` arma los seis stages en orden con chequeo de
//! tipos en compilación; `run_prediction` lo ejecuta hasta el final (o hasta
//! el primer fallo) y decodifica los artifacts de cada stage en un
//! `PredictionOutcome` listo para presentación.

use std::sync::Arc;

use qsar_core::event::InMemoryRunLog;
use qsar_core::repo::InMemoryRunRepository;
use qsar_core::{ArtifactSpec, EngineError, PipelineEngine, RunEventKind, StageFailure};
use qsar_descriptors::DescriptorProvider;
use qsar_model::PredictionModel;
use tracing::{info, warn};

use crate::artifacts::{DepictionArtifact, DescriptorsArtifact, MoleculeArtifact, PredictionArtifact, ReportArtifact,
                       ScaledFeaturesArtifact};
use crate::stages::{AcquireMoleculeStage, ClassifyStage, ComputeDescriptorsStage, RenderDepictionStage, ReportStage,
                    SelectScaleStage};

pub type PredictionEngine = PipelineEngine<InMemoryRunLog, InMemoryRunRepository>;

/// Arma el motor con los seis stages del pipeline en orden.
pub fn build_prediction_engine(smiles: &str,
                               provider: Arc<dyn DescriptorProvider>,
                               model: Arc<PredictionModel>)
                               -> PredictionEngine {
    PipelineEngine::in_memory().first_stage(AcquireMoleculeStage::new(smiles.to_string()))
                               .add_stage(RenderDepictionStage::new())
                               .add_stage(ComputeDescriptorsStage::new(provider))
                               .add_stage(SelectScaleStage::new(model.clone()))
                               .add_stage(ClassifyStage::new(model))
                               .add_stage(ReportStage::new())
                               .build()
}

/// Resultado decodificado de un run: los artifacts de cada stage que llegó a
/// terminar, más el primer fallo si el run se detuvo.
#[derive(Debug, Default)]
pub struct PredictionOutcome {
    pub molecule: Option<MoleculeArtifact>,
    pub depiction: Option<DepictionArtifact>,
    pub descriptors: Option<DescriptorsArtifact>,
    pub features: Option<ScaledFeaturesArtifact>,
    pub prediction: Option<PredictionArtifact>,
    pub report: Option<ReportArtifact>,
    pub failure: Option<StageFailure>,
    pub run_fingerprint: Option<String>,
}

impl PredictionOutcome {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none() && self.report.is_some()
    }
}

/// Ejecuta el pipeline completo para un SMILES y decodifica el resultado.
pub fn run_prediction(smiles: &str,
                      provider: Arc<dyn DescriptorProvider>,
                      model: Arc<PredictionModel>)
                      -> PredictionOutcome {
    info!(model_target = %model.target, provider = provider.provider_id(), "starting prediction run");
    let mut engine = build_prediction_engine(smiles, provider, model);

    match engine.run() {
        Ok(run_id) => info!(%run_id, "prediction run completed"),
        Err(EngineError::Stage(failure)) => warn!(%failure, "prediction run stopped at first failure"),
        Err(other) => warn!(%other, "prediction run aborted"),
    }

    collect_outcome(&engine)
}

/// Decodifica el output tipado del stage `stage_id`, si terminó.
fn decode_stage_output<T>(engine: &PredictionEngine, stage_id: &str) -> Option<T>
    where T: ArtifactSpec + Clone
{
    let events = engine.events()?;
    events.iter().find_map(|e| match &e.kind {
                     RunEventKind::StageFinished { stage_id: id, outputs, .. } if id == stage_id => {
                         let artifact = engine.get_artifact(outputs.first()?)?;
                         T::from_artifact(artifact).ok()
                     }
                     _ => None,
                 })
}

fn collect_outcome(engine: &PredictionEngine) -> PredictionOutcome {
    PredictionOutcome { molecule: decode_stage_output(engine, "acquire_molecule"),
                        depiction: decode_stage_output(engine, "render_depiction"),
                        descriptors: decode_stage_output(engine, "compute_descriptors"),
                        features: decode_stage_output(engine, "select_scale"),
                        prediction: decode_stage_output(engine, "classify"),
                        report: decode_stage_output(engine, "report"),
                        failure: engine.first_failure(),
                        run_fingerprint: engine.run_fingerprint() }
}

// Modelo de ejemplo compartido por los tests del crate y de integración.
#[doc(hidden)]
pub mod tests_support {
    use qsar_model::PredictionModel;

    pub fn example_model() -> PredictionModel {
        let raw = serde_json::json!({
            "target": "PARP-1",
            "feat_names": ["SsssN", "MAXDN", "DELS"],
            "scaling": {
                "SsssN": {"mean": 2.09, "std": 1.87},
                "MAXDN": {"mean": 2.28, "std": 0.96},
                "DELS":  {"mean": 35.08, "std": 15.83}
            },
            "classifier": {"weights": [-0.7412, 0.5638, 0.4121], "intercept": -0.1883},
            "class_labels": ["active", "inactive"]
        }).to_string();
        PredictionModel::from_json_str(&raw).unwrap()
    }
}
