//! qsar-core: motor lineal determinista para pipelines de predicción.
//!
//! Un pipeline es una secuencia fija de stages (Source -> Transform* -> Sink)
//! donde cada stage consume a lo sumo un `Artifact` y produce otro. El motor
//! emite eventos append-only por run y calcula fingerprints canónicos, de modo
//! que una misma entrada produce exactamente la misma secuencia de eventos y
//! el mismo fingerprint de run.
//!
//! La política es stop-on-failure: un `StageFailed` detiene el run y el error
//! tipado (`StageFailure`) queda registrado en el log de eventos.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod repo;
pub mod stage;

pub use engine::PipelineEngine;
pub use errors::{EngineError, StageFailure};
pub use event::{InMemoryRunLog, RunEvent, RunEventKind, RunLog};
pub use model::{Artifact, ArtifactKind, ArtifactSpec, ExecutionContext};
pub use repo::{build_pipeline_definition, InMemoryRunRepository, PipelineDefinition, RunRepository};
pub use stage::{Pipe, SameAs, StageDefinition, StageKind, StageRunResult, StageRunResultTyped, StageStatus, TypedStage};

#[cfg(test)]
mod tests {
    use super::*;

    // Pipeline de juguete declarado con los macros del crate: una fuente que
    // emite un texto, un transform que lo anota y un sink que lo consume.
    typed_artifact!(TextoArtifact { texto: String });

    typed_stage! {
        source FuenteStage {
            id: "fuente",
            output: TextoArtifact,
            params: (),
            run(_me, _p) {
                Ok(TextoArtifact { texto: "hola".into(), schema_version: 1 })
            }
        }
    }

    typed_stage! {
        stage AnotaStage {
            id: "anota",
            kind: StageKind::Transform,
            input: TextoArtifact,
            output: TextoArtifact,
            params: (),
            run(_me, inp, _p) {
                Ok(TextoArtifact { texto: format!("{}!", inp.texto), schema_version: 1 })
            }
        }
    }

    typed_stage! {
        stage FallaStage {
            id: "falla",
            kind: StageKind::Transform,
            input: TextoArtifact,
            output: TextoArtifact,
            params: (),
            run(_me, _inp, _p) {
                Err(StageFailure::InvalidMolecule("entrada vacía".into()))
            }
        }
    }

    typed_stage! {
        stage CierreStage {
            id: "cierre",
            kind: StageKind::Sink,
            input: TextoArtifact,
            output: TextoArtifact,
            params: (),
            run(_me, inp, _p) {
                Ok(inp)
            }
        }
    }

    #[test]
    fn run_completo_emite_eventos_y_fingerprint() {
        let mut engine = PipelineEngine::in_memory()
            .first_stage(FuenteStage::new())
            .add_stage(AnotaStage::new())
            .add_stage(CierreStage::new())
            .build();

        let run_id = engine.run().expect("el run debe completar");
        let events = engine.events_for(run_id);
        assert!(events.iter().any(|e| matches!(e.kind, RunEventKind::RunCompleted { .. })));
        assert!(engine.run_fingerprint().is_some());
    }

    #[test]
    fn fallo_detiene_el_run_y_registra_error_tipado() {
        let mut engine = PipelineEngine::in_memory()
            .first_stage(FuenteStage::new())
            .add_stage(FallaStage::new())
            .add_stage(CierreStage::new())
            .build();

        let err = engine.run().expect_err("el run debe fallar en 'falla'");
        match err {
            EngineError::Stage(StageFailure::InvalidMolecule(_)) => {}
            other => panic!("error inesperado: {other:?}"),
        }

        let events = engine.events().expect("debe haber eventos");
        assert!(events.iter().any(|e| matches!(
            &e.kind,
            RunEventKind::StageFailed { stage_id, .. } if stage_id == "falla"
        )));
        // El sink nunca arranca (stop-on-failure).
        assert!(!events.iter().any(|e| matches!(
            &e.kind,
            RunEventKind::StageStarted { stage_id, .. } if stage_id == "cierre"
        )));
        assert!(engine.run_fingerprint().is_none());
    }

    #[test]
    fn dos_runs_identicos_comparten_fingerprint() {
        let build = || {
            PipelineEngine::in_memory()
                .first_stage(FuenteStage::new())
                .add_stage(AnotaStage::new())
                .add_stage(CierreStage::new())
                .build()
        };
        let mut a = build();
        let mut b = build();
        a.run().unwrap();
        b.run().unwrap();
        assert_eq!(a.run_fingerprint(), b.run_fingerprint());
        assert_eq!(a.event_variants(), b.event_variants());
    }

    #[test]
    fn step_avanza_de_a_un_stage() {
        let mut engine = PipelineEngine::in_memory()
            .first_stage(FuenteStage::new())
            .add_stage(AnotaStage::new())
            .add_stage(CierreStage::new())
            .build();

        engine.step().expect("fuente");
        let variants = engine.event_variants().unwrap();
        assert_eq!(variants, vec!["I", "S", "F"]);

        engine.step().expect("anota");
        engine.step().expect("cierre");
        assert!(matches!(engine.step(), Err(EngineError::RunCompleted)));
        assert!(engine.run_fingerprint().is_some());
    }

    #[test]
    fn pipe_construye_definicion_con_hash_estable() {
        let build = || {
            Pipe::new(FuenteStage::new()).then(AnotaStage::new())
                                         .then(CierreStage::new())
                                         .build()
        };
        let a = build();
        let b = build();
        assert_eq!(a.len(), 3);
        assert_eq!(a.definition_hash, b.definition_hash);
    }
}
