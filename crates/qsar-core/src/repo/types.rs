//! Estado reconstruido (`RunInstance`) y definición inmutable
//! (`PipelineDefinition`).
//!
//! El repositorio aplica un replay lineal: consume eventos en orden y
//! actualiza un `RunInstance`. No almacena artifacts completos, sólo hashes,
//! para mantener neutralidad.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::{RunEvent, RunEventKind};
use crate::stage::{StageDefinition, StageStatus};

pub struct RunInstance {
    pub id: Uuid,
    pub stages: Vec<StageSlot>,
    /// Índice del próximo stage pendiente.
    pub cursor: usize,
    pub completed: bool,
    pub failed: bool,
}

/// Estado de un stage dentro de la instancia.
pub struct StageSlot {
    pub stage_id: String,
    pub status: StageStatus,
    pub fingerprint: Option<String>,
    pub outputs: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Reconstruye (`replay`) el estado de un run a partir de sus eventos.
pub trait RunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &PipelineDefinition) -> RunInstance;
}

/// Definición inmutable del pipeline: la secuencia de stages y el hash de sus
/// ids en orden.
pub struct PipelineDefinition {
    pub stages: Vec<Box<dyn StageDefinition>>,
    pub definition_hash: String,
}

impl PipelineDefinition {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Construye la definición derivando el hash de los ids en orden.
pub fn build_pipeline_definition(stages: Vec<Box<dyn StageDefinition>>) -> PipelineDefinition {
    use crate::hashing::{hash_str, to_canonical_json};
    let ids: Vec<String> = stages.iter().map(|s| s.id().to_string()).collect();
    let canonical = to_canonical_json(&serde_json::json!(ids));
    PipelineDefinition { stages,
                         definition_hash: hash_str(&canonical) }
}

#[derive(Debug, Default)]
pub struct InMemoryRunRepository;

impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self
    }
}

impl RunRepository for InMemoryRunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &PipelineDefinition) -> RunInstance {
        let mut stages: Vec<StageSlot> = definition.stages
                                                   .iter()
                                                   .map(|s| StageSlot { stage_id: s.id().to_string(),
                                                                        status: StageStatus::Pending,
                                                                        fingerprint: None,
                                                                        outputs: vec![],
                                                                        started_at: None,
                                                                        finished_at: None })
                                                   .collect();
        let mut completed = false;
        let mut failed = false;
        for ev in events {
            match &ev.kind {
                RunEventKind::RunInitialized { .. } => {}
                RunEventKind::StageStarted { stage_index, .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::Running;
                        slot.started_at = Some(ev.ts);
                    }
                }
                RunEventKind::StageFinished { stage_index,
                                              fingerprint,
                                              outputs,
                                              .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::FinishedOk;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.outputs = outputs.clone();
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::StageFailed { stage_index, fingerprint, .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                    failed = true;
                }
                RunEventKind::RunCompleted { .. } => completed = true,
            }
        }
        let cursor = stages.iter()
                           .position(|s| matches!(s.status, StageStatus::Pending))
                           .unwrap_or(stages.len());
        RunInstance { id: run_id,
                      stages,
                      cursor,
                      completed,
                      failed }
    }
}
