//! Implementación del `PipelineEngine`.
//!
//! El motor orquesta la ejecución lineal de stages sobre un `RunLog`
//! append-only, encadenando el output de cada stage como input del siguiente
//! y garantizando determinismo mediante fingerprints canónicos.

use std::collections::HashMap;

use serde_json::json;
use uuid::Uuid;

use crate::errors::EngineError;
use crate::event::{RunEventKind, RunLog};
use crate::hashing::hash_value;
use crate::model::{Artifact, ExecutionContext, StageFingerprintInput};
use crate::repo::{PipelineDefinition, RunRepository};
use crate::StageDefinition;

pub struct PipelineEngine<L, R>
    where L: RunLog,
          R: RunRepository
{
    run_log: L,
    repository: R,
    artifact_store: HashMap<String, Artifact>,
    default_run_id: Option<Uuid>,
    default_definition: Option<PipelineDefinition>,
}

impl PipelineEngine<crate::event::InMemoryRunLog, crate::repo::InMemoryRunRepository> {
    /// Builder con stores en memoria (el caso común: un run por proceso).
    #[inline]
    pub fn in_memory() -> crate::engine::EngineBuilderInit<crate::event::InMemoryRunLog, crate::repo::InMemoryRunRepository> {
        crate::engine::EngineBuilderInit { run_log: crate::event::InMemoryRunLog::default(),
                                           repository: crate::repo::InMemoryRunRepository::new() }
    }
}

impl<L, R> PipelineEngine<L, R>
    where L: RunLog,
          R: RunRepository
{
    pub fn with_stores(run_log: L, repository: R) -> Self {
        Self { run_log,
               repository,
               artifact_store: HashMap::new(),
               default_run_id: None,
               default_definition: None }
    }

    /// Recupera un artifact por su hash.
    pub fn get_artifact(&self, hash: &str) -> Option<&Artifact> {
        self.artifact_store.get(hash)
    }

    pub fn set_default_definition(&mut self, definition: PipelineDefinition) {
        self.default_definition = Some(definition);
    }

    pub fn default_run_id(&self) -> Option<Uuid> {
        self.default_run_id
    }

    /// Genera un `run_id` por defecto si no existe aún y lo retorna.
    pub fn ensure_default_run_id(&mut self) -> Uuid {
        if self.default_run_id.is_none() {
            self.default_run_id = Some(Uuid::new_v4());
        }
        self.default_run_id.unwrap()
    }

    /// Ejecuta el pipeline completo y retorna el id del run.
    pub fn run(&mut self) -> Result<Uuid, EngineError> {
        let run_id = self.ensure_default_run_id();
        let def = self.default_definition
                      .take()
                      .ok_or_else(|| EngineError::Internal("no default definition configured".into()))?;
        let result = self.run_to_completion(run_id, &def);
        self.default_definition = Some(def);
        result
    }

    /// Avanza un stage en el pipeline por defecto.
    pub fn step(&mut self) -> Result<(), EngineError> {
        let run_id = self.ensure_default_run_id();
        let def = self.default_definition
                      .take()
                      .ok_or_else(|| EngineError::Internal("no default definition configured".into()))?;
        let result = self.next_with(run_id, &def);
        self.default_definition = Some(def);
        result
    }

    pub fn run_to_completion(&mut self, run_id: Uuid, definition: &PipelineDefinition) -> Result<Uuid, EngineError> {
        loop {
            match self.next_with(run_id, definition) {
                Ok(()) => continue,
                Err(EngineError::RunCompleted) => return Ok(run_id),
                Err(e) => return Err(e),
            }
        }
    }

    /// Asegura el `RunInitialized` y devuelve los eventos actuales del run.
    fn load_or_init(&mut self, run_id: Uuid, definition: &PipelineDefinition) -> Vec<crate::event::RunEvent> {
        let mut events = self.run_log.list(run_id);
        let has_init = events.iter().any(|e| matches!(e.kind, RunEventKind::RunInitialized { .. }));
        if !has_init {
            let ev = self.run_log
                         .append_kind(run_id,
                                      RunEventKind::RunInitialized { definition_hash: definition.definition_hash.clone(),
                                                                     stage_count: definition.len() });
            events.push(ev);
        }
        self.default_run_id = Some(run_id);
        events
    }

    fn next_with(&mut self, run_id: Uuid, definition: &PipelineDefinition) -> Result<(), EngineError> {
        let events = self.load_or_init(run_id, definition);
        let instance = self.repository.load(run_id, &events, definition);

        if instance.completed {
            return Err(EngineError::RunCompleted);
        }
        if instance.failed {
            return Err(EngineError::RunHasFailed);
        }

        let cursor = instance.cursor;
        if cursor >= definition.len() {
            return Err(EngineError::RunCompleted);
        }

        let stage_def = &definition.stages[cursor];
        let input = if cursor == 0 {
            None
        } else {
            instance.stages
                    .get(cursor - 1)
                    .and_then(|s| s.outputs.first())
                    .and_then(|h| self.artifact_store.get(h).cloned())
        };

        let ctx = ExecutionContext { input,
                                     params: stage_def.base_params() };

        let _started = self.run_log.append_kind(run_id,
                                                RunEventKind::StageStarted { stage_index: cursor,
                                                                             stage_id: stage_def.id().to_string() });

        match stage_def.run(&ctx) {
            crate::stage::StageRunResult::Success { outputs } => {
                self.handle_stage_success(run_id, cursor, stage_def.as_ref(), outputs, definition)
            }
            crate::stage::StageRunResult::Failure { error } => {
                self.handle_stage_failure(run_id, cursor, stage_def.as_ref(), error)
            }
        }
    }

    fn hash_and_store_outputs(&mut self, outputs: &mut [Artifact]) -> Vec<String> {
        let mut hashes: Vec<String> = Vec::with_capacity(outputs.len());
        for o in outputs.iter_mut() {
            let h = hash_value(&o.payload);
            o.hash = h.clone();
            self.artifact_store.insert(h.clone(), o.clone());
            hashes.push(h);
        }
        hashes
    }

    fn handle_stage_success(&mut self,
                            run_id: Uuid,
                            cursor: usize,
                            stage_def: &dyn StageDefinition,
                            mut outputs: Vec<Artifact>,
                            definition: &PipelineDefinition)
                            -> Result<(), EngineError> {
        let output_hashes = self.hash_and_store_outputs(&mut outputs);
        let fp = self.stage_fingerprint(cursor, stage_def, &output_hashes, definition);

        let _finished = self.run_log.append_kind(run_id,
                                                 RunEventKind::StageFinished { stage_index: cursor,
                                                                               stage_id: stage_def.id().to_string(),
                                                                               outputs: output_hashes,
                                                                               fingerprint: fp });

        if cursor + 1 == definition.len() {
            self.complete_run(run_id, definition);
        }
        Ok(())
    }

    fn handle_stage_failure(&mut self,
                            run_id: Uuid,
                            cursor: usize,
                            stage_def: &dyn StageDefinition,
                            error: crate::errors::StageFailure)
                            -> Result<(), EngineError> {
        let fp_json = json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": stage_def.definition_hash(),
            "stage_index": cursor,
            "params": stage_def.base_params(),
        });
        let fp = hash_value(&fp_json);

        let _ = self.run_log.append_kind(run_id,
                                         RunEventKind::StageFailed { stage_index: cursor,
                                                                     stage_id: stage_def.id().to_string(),
                                                                     error: error.clone(),
                                                                     fingerprint: fp });
        Err(EngineError::Stage(error))
    }

    fn stage_fingerprint(&self,
                         cursor: usize,
                         stage_def: &dyn StageDefinition,
                         output_hashes: &[String],
                         definition: &PipelineDefinition)
                         -> String {
        let params = stage_def.base_params();
        let input = StageFingerprintInput { engine_version: crate::constants::ENGINE_VERSION,
                                            definition_hash: &definition.definition_hash,
                                            stage_index: cursor,
                                            output_hashes,
                                            params: &params };
        let fp_json = serde_json::to_value(&input).expect("serialize fingerprint input");
        hash_value(&fp_json)
    }

    fn complete_run(&mut self, run_id: Uuid, definition: &PipelineDefinition) {
        let events = self.run_log.list(run_id);
        let stage_fps: Vec<String> = events.iter()
                                           .filter_map(|e| match &e.kind {
                                               RunEventKind::StageFinished { fingerprint, .. } => Some(fingerprint.clone()),
                                               _ => None,
                                           })
                                           .collect();

        let run_fp = hash_value(&json!({
                                    "engine_version": crate::constants::ENGINE_VERSION,
                                    "definition_hash": definition.definition_hash,
                                    "stage_fingerprints": stage_fps,
                                }));

        let _ = self.run_log
                    .append_kind(run_id, RunEventKind::RunCompleted { run_fingerprint: run_fp });
    }

    /// Lista eventos de un run arbitrario.
    pub fn events_for(&self, run_id: Uuid) -> Vec<crate::event::RunEvent> {
        self.run_log.list(run_id)
    }

    /// Lista eventos del run por defecto.
    pub fn events(&self) -> Option<Vec<crate::event::RunEvent>> {
        self.default_run_id.map(|rid| self.run_log.list(rid))
    }

    /// Variante compacta de eventos del run por defecto; útil en asserts de
    /// determinismo.
    pub fn event_variants(&self) -> Option<Vec<&'static str>> {
        self.events().map(|events| {
                         events.iter()
                               .map(|e| match e.kind {
                                   RunEventKind::RunInitialized { .. } => "I",
                                   RunEventKind::StageStarted { .. } => "S",
                                   RunEventKind::StageFinished { .. } => "F",
                                   RunEventKind::StageFailed { .. } => "X",
                                   RunEventKind::RunCompleted { .. } => "C",
                               })
                               .collect()
                     })
    }

    /// Fingerprint del run por defecto, si completó.
    pub fn run_fingerprint(&self) -> Option<String> {
        let evs = self.events()?;
        evs.iter().rev().find_map(|e| match &e.kind {
                            RunEventKind::RunCompleted { run_fingerprint } => Some(run_fingerprint.clone()),
                            _ => None,
                        })
    }

    /// Primer fallo tipado registrado en el run por defecto, si lo hay.
    pub fn first_failure(&self) -> Option<crate::errors::StageFailure> {
        let evs = self.events()?;
        evs.iter().find_map(|e| match &e.kind {
                      RunEventKind::StageFailed { error, .. } => Some(error.clone()),
                      _ => None,
                  })
    }
}
