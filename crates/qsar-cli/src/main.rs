//! CLI de predicción de actividad PARP-1.
//!
//! Uso:
//!   qsar-cli predict --smiles '<SMILES>' [--model <ruta.json>]
//!                    [--padel-jar <ruta.jar>] [--svg <salida.svg>]
//!                    [--descriptors]
//!
//! Configuración por entorno (se carga `.env` si existe):
//!   QSAR_MODEL_PATH          ruta del artefacto de modelo (default:
//!                            models/parp1_linear.json)
//!   PADEL_JAR                jar de PaDEL-Descriptor; si falta, se usa el
//!                            estimador offline (sólo demos)
//!   PADEL_JAVA               binario de java (default: java)
//!   PADEL_THREADS            paralelismo interno de la herramienta
//!   PADEL_DESCRIPTOR_TYPES   xml de definición de fingerprints
//!
//! Códigos de salida: 0 ok, 2 uso inválido, 3 molécula inválida, 4 fallo del
//! pipeline, 5 artefacto de modelo inválido.

use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use qsar_adapters::run_prediction;
use qsar_core::StageFailure;
use qsar_descriptors::{DescriptorProvider, OfflineDescriptorProvider, PadelConfig, PadelDescriptorProvider};
use qsar_model::PredictionModel;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_MODEL_PATH: &str = "models/parp1_linear.json";

struct PredictArgs {
    smiles: String,
    model_path: PathBuf,
    padel_jar: Option<PathBuf>,
    svg_out: Option<PathBuf>,
    show_descriptors: bool,
}

fn usage() -> ! {
    eprintln!("Uso: qsar-cli predict --smiles '<SMILES>' [--model <ruta.json>] [--padel-jar <ruta.jar>] [--svg <salida.svg>] [--descriptors]");
    exit(2);
}

fn parse_predict_args(args: &[String]) -> PredictArgs {
    let mut smiles: Option<String> = None;
    let mut model_path: Option<PathBuf> = None;
    let mut padel_jar: Option<PathBuf> = None;
    let mut svg_out: Option<PathBuf> = None;
    let mut show_descriptors = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--smiles" => {
                i += 1;
                if i < args.len() {
                    smiles = Some(args[i].clone());
                }
            }
            "--model" => {
                i += 1;
                if i < args.len() {
                    model_path = Some(PathBuf::from(&args[i]));
                }
            }
            "--padel-jar" => {
                i += 1;
                if i < args.len() {
                    padel_jar = Some(PathBuf::from(&args[i]));
                }
            }
            "--svg" => {
                i += 1;
                if i < args.len() {
                    svg_out = Some(PathBuf::from(&args[i]));
                }
            }
            "--descriptors" => {
                show_descriptors = true;
            }
            other => {
                eprintln!("[qsar predict] flag desconocido: {other}");
                usage();
            }
        }
        i += 1;
    }

    let smiles = match smiles {
        Some(s) => s,
        None => usage(),
    };
    let model_path = model_path.or_else(|| std::env::var("QSAR_MODEL_PATH").ok().map(PathBuf::from))
                               .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

    PredictArgs { smiles,
                  model_path,
                  padel_jar,
                  svg_out,
                  show_descriptors }
}

/// Tabla completa nombre/valor, una columna por línea, en el orden del
/// proveedor.
fn format_descriptor_table(names: &[String], values: &[f64]) -> String {
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in names.iter().zip(values) {
        out.push_str(&format!("  {name:<width$}  {value}\n"));
    }
    out
}

/// PaDEL si hay jar configurado (flag o entorno); estimador offline si no.
fn build_provider(padel_jar: Option<PathBuf>) -> Arc<dyn DescriptorProvider> {
    let jar = padel_jar.or_else(|| std::env::var("PADEL_JAR").ok().map(PathBuf::from));
    match jar {
        Some(jar_path) => {
            let mut config = PadelConfig::new(jar_path);
            if let Ok(java) = std::env::var("PADEL_JAVA") {
                config.java_bin = java;
            }
            if let Some(threads) = std::env::var("PADEL_THREADS").ok().and_then(|t| t.parse().ok()) {
                config.threads = threads;
            }
            if let Ok(types) = std::env::var("PADEL_DESCRIPTOR_TYPES") {
                config.descriptor_types = Some(PathBuf::from(types));
            }
            Arc::new(PadelDescriptorProvider::new(config))
        }
        None => {
            warn!("PADEL_JAR no configurado; usando estimador offline (los descriptores NO son los reales)");
            Arc::new(OfflineDescriptorProvider::new())
        }
    }
}

fn run_predict(args: PredictArgs) -> i32 {
    let model = match PredictionModel::from_path(&args.model_path) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            eprintln!("[qsar predict] modelo inválido ({}): {e}", args.model_path.display());
            return 5;
        }
    };
    let provider = build_provider(args.padel_jar);

    let outcome = run_prediction(&args.smiles, provider, model);

    if let Some(mol) = &outcome.molecule {
        println!("Molécula     : {}", mol.smiles);
        println!("Fórmula      : {} ({} átomos pesados)", mol.formula, mol.heavy_atoms);
    }
    if let Some(desc) = &outcome.descriptors {
        println!("Descriptores : {} columnas (proveedor: {})", desc.names.len(), desc.provider);
        if args.show_descriptors {
            print!("{}", format_descriptor_table(&desc.names, &desc.values));
        }
    }
    if let Some(feats) = &outcome.features {
        println!("Features     :");
        for ((name, raw), scaled) in feats.feat_names.iter().zip(&feats.raw).zip(&feats.scaled) {
            println!("  {name:<8} {raw:>10.4}  ->  {scaled:>8.4}");
        }
    }
    if let (Some(svg_path), Some(dep)) = (&args.svg_out, &outcome.depiction) {
        match std::fs::write(svg_path, &dep.svg) {
            Ok(()) => println!("Depiction    : {}", svg_path.display()),
            Err(e) => eprintln!("[qsar predict] no se pudo escribir el SVG: {e}"),
        }
    }

    match (&outcome.report, &outcome.failure) {
        (Some(report), None) => {
            println!();
            println!("{}", report.message);
            0
        }
        (_, Some(StageFailure::InvalidMolecule(msg))) => {
            eprintln!("[qsar predict] SMILES inválido: {msg}");
            3
        }
        (_, Some(StageFailure::ModelLoad(msg))) => {
            eprintln!("[qsar predict] modelo inválido: {msg}");
            5
        }
        (_, Some(failure)) => {
            eprintln!("[qsar predict] el pipeline se detuvo: {failure}");
            4
        }
        (None, None) => {
            eprintln!("[qsar predict] el pipeline no produjo reporte");
            4
        }
    }
}

fn main() {
    // Cargar .env si existe; la configuración explícita tiene prioridad.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .with_target(false)
                             .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "predict" {
        let parsed = parse_predict_args(&args[2..]);
        exit(run_predict(parsed));
    }
    usage();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_descriptors_activa_el_volcado() {
        let parsed = parse_predict_args(&args(&["--smiles", "CCO", "--descriptors"]));
        assert!(parsed.show_descriptors);
        assert_eq!(parsed.smiles, "CCO");

        let parsed = parse_predict_args(&args(&["--smiles", "CCO"]));
        assert!(!parsed.show_descriptors);
    }

    #[test]
    fn tabla_completa_una_columna_por_linea() {
        let names = vec!["SsssN".to_string(), "PubchemFP0".to_string()];
        let out = format_descriptor_table(&names, &[2.5, 1.0]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("SsssN") && lines[0].contains("2.5"));
        assert!(lines[1].contains("PubchemFP0") && lines[1].contains('1'));
    }
}
