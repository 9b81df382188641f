//! ReportStage (Sink).
//!
//! Construye la frase de resumen que consume la capa de presentación. El
//! formato es estable: los tests de integración lo verifican literal.

use qsar_core::{typed_stage, StageKind};

use crate::artifacts::{PredictionArtifact, ReportArtifact};

typed_stage! {
    stage ReportStage {
        id: "report",
        kind: StageKind::Sink,
        input: PredictionArtifact,
        output: ReportArtifact,
        params: (),
        run(_me, inp, _p) {
            let message = format!("This compound is expected to be {} {}.", inp.target, inp.label);
            Ok(ReportArtifact { smiles: inp.smiles,
                                label: inp.label,
                                message,
                                schema_version: 1 })
        }
    }
}

#[cfg(test)]
mod tests {
    use qsar_core::stage::{StageRunResultTyped, TypedStage};

    use super::*;

    #[test]
    fn frase_de_resumen_estable() {
        let stage = ReportStage::new();
        let inp = PredictionArtifact { smiles: "CCO".into(),
                                       target: "PARP-1".into(),
                                       raw_class: 0,
                                       label: "active".into(),
                                       schema_version: 1 };
        match stage.run_typed(Some(inp), ()) {
            StageRunResultTyped::Success { outputs } => {
                assert_eq!(outputs[0].message, "This compound is expected to be PARP-1 active.");
            }
            StageRunResultTyped::Failure { error } => panic!("fallo inesperado: {error}"),
        }
    }
}
