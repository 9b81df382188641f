//! Tipos de evento del run.
//!
//! Cada ejecución del `PipelineEngine` emite eventos a un `RunLog`
//! append-only; el `RunRepository` reconstruye el estado por replay. El enum
//! `RunEventKind` es el contrato observable y estable del motor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StageFailure;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`: fija la `definition_hash` y la cantidad
    /// de stages.
    RunInitialized { definition_hash: String, stage_count: usize },
    /// Un stage comenzó su ejecución. No implica éxito.
    StageStarted { stage_index: usize, stage_id: String },
    /// Un stage terminó correctamente, con sus outputs (hashes) y fingerprint.
    StageFinished {
        stage_index: usize,
        stage_id: String,
        outputs: Vec<String>,
        fingerprint: String,
    },
    /// Un stage terminó con un fallo terminal tipado (stop-on-failure).
    StageFailed {
        stage_index: usize,
        stage_id: String,
        error: StageFailure,
        fingerprint: String,
    },
    /// Cierre del run con fingerprint agregado (hash de los fingerprints de
    /// los stages exitosos en orden).
    RunCompleted { run_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    /// Asignado por el `RunLog` (orden de append).
    pub seq: u64,
    pub run_id: Uuid,
    pub kind: RunEventKind,
    /// Metadato; no entra en el fingerprint.
    pub ts: DateTime<Utc>,
}
