//! Tests de integración del pipeline completo de predicción.
//!
//! Cubren los cuatro escenarios extremo a extremo: corrida exitosa con el
//! SMILES de referencia, SMILES vacío, SMILES imparseable y un modelo que
//! espera una feature ausente de la tabla.

use std::sync::Arc;

use qsar_adapters::pipeline::tests_support::example_model;
use qsar_adapters::{build_prediction_engine, run_prediction};
use qsar_core::{RunEventKind, StageFailure};
use qsar_descriptors::{DescriptorTable, OfflineDescriptorProvider, StaticDescriptorProvider};
use qsar_model::PredictionModel;

// Inhibidor PARP-1 de referencia (olaparib).
const EXAMPLE_SMILES: &str = "C1CC1C(=O)N2CCN(CC2)C(=O)C3=C(C=CC(=C3)CC4=NNC(=O)C5=CC=CC=C54)F";

fn reference_table() -> DescriptorTable {
    DescriptorTable::new(vec!["SsssN".into(), "MAXDN".into(), "DELS".into(), "Zagreb".into()],
                         vec![3.41, 2.65, 48.2, 156.0])
}

#[test]
fn corrida_exitosa_produce_reporte_y_fingerprint() {
    let outcome = run_prediction(EXAMPLE_SMILES,
                                 StaticDescriptorProvider::shared(reference_table()),
                                 Arc::new(example_model()));

    assert!(outcome.succeeded(), "fallo inesperado: {:?}", outcome.failure);
    assert!(outcome.run_fingerprint.is_some());

    let molecule = outcome.molecule.expect("molecule artifact");
    assert_eq!(molecule.smiles, EXAMPLE_SMILES);

    let depiction = outcome.depiction.expect("depiction artifact");
    assert!(depiction.svg.starts_with("<svg"));

    let features = outcome.features.expect("features artifact");
    assert_eq!(features.feat_names, vec!["SsssN".to_string(), "MAXDN".to_string(), "DELS".to_string()]);
    assert_eq!(features.raw, vec![3.41, 2.65, 48.2]);

    let report = outcome.report.expect("report artifact");
    let prediction = outcome.prediction.expect("prediction artifact");
    assert!(report.message == format!("This compound is expected to be PARP-1 {}.", prediction.label));
    assert!(prediction.label == "active" || prediction.label == "inactive");
}

#[test]
fn corridas_identicas_comparten_fingerprint() {
    let run = || {
        run_prediction(EXAMPLE_SMILES,
                       StaticDescriptorProvider::shared(reference_table()),
                       Arc::new(example_model()))
    };
    let a = run();
    let b = run();
    assert_eq!(a.run_fingerprint, b.run_fingerprint);
    assert_eq!(a.prediction.map(|p| p.raw_class), b.prediction.map(|p| p.raw_class));
}

#[test]
fn smiles_vacio_no_arranca_el_computo_de_descriptores() {
    let mut engine = build_prediction_engine("",
                                             Arc::new(OfflineDescriptorProvider::new()),
                                             Arc::new(example_model()));
    let err = engine.run().expect_err("el run debe fallar");
    let _ = err;

    let events = engine.events().expect("eventos del run");
    let started_descriptors = events.iter().any(|e| {
                                        matches!(&e.kind,
                RunEventKind::StageStarted { stage_id, .. } if stage_id == "compute_descriptors")
                                    });
    assert!(!started_descriptors, "compute_descriptors no debe haber arrancado");

    let failure = engine.first_failure().expect("fallo registrado");
    assert!(matches!(failure, StageFailure::InvalidMolecule(_)));
}

#[test]
fn smiles_imparseable_falla_como_invalid_molecule() {
    let outcome = run_prediction("not_a_smiles",
                                 Arc::new(OfflineDescriptorProvider::new()),
                                 Arc::new(example_model()));
    assert!(!outcome.succeeded());
    assert!(matches!(outcome.failure, Some(StageFailure::InvalidMolecule(_))));
    assert!(outcome.depiction.is_none());
    assert!(outcome.report.is_none());
}

#[test]
fn feature_ausente_falla_como_missing_feature() {
    // Modelo que exige una feature que ningún proveedor de la tabla emite.
    let raw = serde_json::json!({
        "target": "PARP-1",
        "feat_names": ["SsssN", "NoSuchFeature"],
        "scaling": {
            "SsssN": {"mean": 2.09, "std": 1.87},
            "NoSuchFeature": {"mean": 0.0, "std": 1.0}
        },
        "classifier": {"weights": [0.5, 0.5], "intercept": 0.0},
        "class_labels": ["active", "inactive"]
    }).to_string();
    let model = PredictionModel::from_json_str(&raw).expect("modelo de prueba");

    let outcome = run_prediction(EXAMPLE_SMILES,
                                 StaticDescriptorProvider::shared(reference_table()),
                                 Arc::new(model));
    assert_eq!(outcome.failure, Some(StageFailure::MissingFeature("NoSuchFeature".into())));
    // Los stages previos sí terminaron.
    assert!(outcome.descriptors.is_some());
    assert!(outcome.features.is_none());
}
