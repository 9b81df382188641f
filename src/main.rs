//! Demo binario: ejecuta el pipeline de predicción sin dependencias externas
//! (estimador offline + modelo empaquetado) e imprime la traza de eventos.
//!
//! Para predicciones reales usar `qsar-cli predict` con PADEL_JAR configurado.

use std::sync::Arc;

use qsar_adapters::build_prediction_engine;
use qsar_core::RunEventKind;
use qsar_descriptors::OfflineDescriptorProvider;
use qsar_model::PredictionModel;
use tracing_subscriber::EnvFilter;

// Inhibidor PARP-1 de referencia (olaparib).
const DEMO_SMILES: &str = "C1CC1C(=O)N2CCN(CC2)C(=O)C3=C(C=CC(=C3)CC4=NNC(=O)C5=CC=CC=C54)F";

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .with_target(false)
                             .init();

    let model = match PredictionModel::from_path(std::path::Path::new("models/parp1_linear.json")) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            eprintln!("[demo] modelo inválido: {e}");
            std::process::exit(5);
        }
    };

    let mut engine = build_prediction_engine(DEMO_SMILES, Arc::new(OfflineDescriptorProvider::new()), model);

    match engine.run() {
        Ok(run_id) => println!("run {run_id} completado"),
        Err(e) => println!("run detenido: {e}"),
    }

    for ev in engine.events().unwrap_or_default() {
        match &ev.kind {
            RunEventKind::RunInitialized { stage_count, .. } => {
                println!("[{}] init ({stage_count} stages)", ev.seq);
            }
            RunEventKind::StageStarted { stage_id, .. } => println!("[{}] -> {stage_id}", ev.seq),
            RunEventKind::StageFinished { stage_id, fingerprint, .. } => {
                println!("[{}] ok {stage_id} fp={}", ev.seq, &fingerprint[..12]);
            }
            RunEventKind::StageFailed { stage_id, error, .. } => {
                println!("[{}] FALLO {stage_id}: {error}", ev.seq);
            }
            RunEventKind::RunCompleted { run_fingerprint } => {
                println!("[{}] run fp={}", ev.seq, &run_fingerprint[..12]);
            }
        }
    }
}
