use serde::Serialize;
use serde_json::Value;

/// Insumos para calcular el fingerprint de un stage. NO es el fingerprint
/// final (string hash) sino el modelo previo a canonicalizar.
#[derive(Serialize)]
pub struct StageFingerprintInput<'a> {
    pub engine_version: &'a str,
    pub definition_hash: &'a str,
    pub stage_index: usize,
    pub output_hashes: &'a [String],
    pub params: &'a Value,
}
