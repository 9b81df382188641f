//! ClassifyStage (Transform).
//!
//! Aplica el clasificador lineal del modelo al vector escalado y traduce la
//! clase cruda a etiqueta vía `class_labels`. La polaridad (qué clase cruda
//! significa "active") es dato del artefacto del modelo, no del código.

use std::sync::Arc;

use qsar_core::{typed_stage, StageKind};
use qsar_model::PredictionModel;

use crate::artifacts::{PredictionArtifact, ScaledFeaturesArtifact};
use crate::failures::model_failure;

typed_stage! {
    stage ClassifyStage {
        id: "classify",
        kind: StageKind::Transform,
        input: ScaledFeaturesArtifact,
        output: PredictionArtifact,
        params: (),
        fields { model: Arc<PredictionModel> }
        , run(me, inp, _p) {
            let (raw_class, activity) = me.model.predict(&inp.scaled).map_err(model_failure)?;
            Ok(PredictionArtifact { smiles: inp.smiles,
                                    target: me.model.target.clone(),
                                    raw_class,
                                    label: activity.to_string(),
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

    fn scaled_input(scaled: Vec<f64>) -> ScaledFeaturesArtifact {
        ScaledFeaturesArtifact { smiles: "CCO".into(),
                                 feat_names: vec!["SsssN".into(), "MAXDN".into(), "DELS".into()],
                                 raw: scaled.clone(),
                                 scaled,
                                 schema_version: 1 }
    }

    #[test]
    fn etiqueta_segun_class_labels() {
        let model = Arc::new(example_model());
        let stage = ClassifyStage::new(model.clone());
        match stage.run_typed(Some(scaled_input(vec![0.0, 0.0, 0.0])), ()) {
            StageRunResultTyped::Success { outputs } => {
                let out = &outputs[0];
                assert_eq!(out.target, model.target);
                assert_eq!(out.label, model.class_labels[out.raw_class as usize]);
            }
            StageRunResultTyped::Failure { error } => panic!("fallo inesperado: {error}"),
        }
    }

    #[test]
    fn ancho_incorrecto_detiene_con_feature_mismatch() {
        let stage = ClassifyStage::new(Arc::new(example_model()));
        match stage.run_typed(Some(scaled_input(vec![0.0, 0.0])), ()) {
            StageRunResultTyped::Failure { error } => {
                assert_eq!(error, StageFailure::FeatureMismatch { expected: 3, got: 2 });
            }
            StageRunResultTyped::Success { .. } => panic!("debió fallar"),
        }
    }
}
