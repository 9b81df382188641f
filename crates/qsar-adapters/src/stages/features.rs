//! SelectScaleStage (Transform).
//!
//! Proyecta la tabla completa de descriptores al subconjunto que el modelo
//! declara (en su orden) y aplica el escalado z-score con las estadísticas
//! guardadas en el propio artefacto del modelo. Una feature ausente en la
//! tabla detiene el run con `MissingFeature`.

use std::sync::Arc;

use qsar_core::{typed_stage, StageKind};
use qsar_model::PredictionModel;

use crate::artifacts::{DescriptorsArtifact, ScaledFeaturesArtifact};
use crate::failures::model_failure;

typed_stage! {
    stage SelectScaleStage {
        id: "select_scale",
        kind: StageKind::Transform,
        input: DescriptorsArtifact,
        output: ScaledFeaturesArtifact,
        params: (),
        fields { model: Arc<PredictionModel> }
        , run(me, inp, _p) {
            let raw = me.model.select_features(&inp.names, &inp.values).map_err(model_failure)?;
            let scaled = me.model.scale_features(&raw).map_err(model_failure)?;
            Ok(ScaledFeaturesArtifact { smiles: inp.smiles,
                                        feat_names: me.model.feat_names.clone(),
                                        raw,
                                        scaled,
                                        schema_version: 1 })
        }
    }
}

#[cfg(test)]
mod tests {
    use qsar_core::stage::{StageRunResultTyped, TypedStage};
    use qsar_core::StageFailure;

    use super::*;
    use crate::pipeline::tests_support::example_model;

    fn descriptors_input(names: &[&str], values: &[f64]) -> DescriptorsArtifact {
        DescriptorsArtifact { smiles: "CCO".into(),
                              provider: "static".into(),
                              names: names.iter().map(|s| s.to_string()).collect(),
                              values: values.to_vec(),
                              schema_version: 1 }
    }

    #[test]
    fn proyecta_en_el_orden_del_modelo() {
        let model = Arc::new(example_model());
        let stage = SelectScaleStage::new(model.clone());
        // Tabla con ruido extra y en otro orden.
        let inp = descriptors_input(&["DELS", "Zagreb", "SsssN", "MAXDN"], &[35.08, 99.0, 2.09, 2.28]);
        match stage.run_typed(Some(inp), ()) {
            StageRunResultTyped::Success { outputs } => {
                assert_eq!(outputs[0].feat_names, model.feat_names);
                assert_eq!(outputs[0].raw, vec![2.09, 2.28, 35.08]);
                // Valores iguales a la media escalan a cero.
                for z in &outputs[0].scaled {
                    assert!(z.abs() < 1e-9);
                }
            }
            StageRunResultTyped::Failure { error } => panic!("fallo inesperado: {error}"),
        }
    }

    #[test]
    fn feature_ausente_detiene_con_missing_feature() {
        let stage = SelectScaleStage::new(Arc::new(example_model()));
        let inp = descriptors_input(&["SsssN", "DELS"], &[2.0, 30.0]);
        match stage.run_typed(Some(inp), ()) {
            StageRunResultTyped::Failure { error } => {
                assert_eq!(error, StageFailure::MissingFeature("MAXDN".into()));
            }
            StageRunResultTyped::Success { .. } => panic!("debió fallar"),
        }
    }
}
