//! Invocación del generador externo de descriptores (PaDEL-Descriptor).
//!
//! Contrato de archivos (transitorio, no estable):
//! - entrada: `molecule.smi` con una línea `<SMILES>\t<id>`.
//! - salida: `descriptors.csv` con una columna `Name` más las columnas de
//!   features; la columna identificadora se descarta antes de usar la fila.
//!
//! Cada corrida usa un directorio temporal con nombre único
//! (`tempfile::TempDir`), liberado en todos los caminos de salida, de modo
//! que corridas concurrentes nunca compartan archivos de trabajo.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::{DescriptorError, DescriptorProvider, DescriptorTable};

/// Identificador que acompaña al SMILES en el archivo de moléculas.
const MOLECULE_ID: &str = "mol_001";

/// Configuración fija de la herramienta. Los flags químicos replican la
/// configuración con la que se calcularon los descriptores de entrenamiento:
/// detección de aromaticidad, estandarización de nitro y tautómeros, remoción
/// de sales, fingerprints y descriptores 2D.
#[derive(Debug, Clone)]
pub struct PadelConfig {
    /// Binario de java.
    pub java_bin: String,
    /// Ruta al jar de PaDEL-Descriptor.
    pub jar_path: PathBuf,
    /// Definición de fingerprint (p. ej. `PubchemFingerprinter.xml`); si es
    /// `None`, la herramienta usa su set por defecto.
    pub descriptor_types: Option<PathBuf>,
    /// Paralelismo interno de la herramienta, acotado.
    pub threads: u32,
}

impl PadelConfig {
    pub fn new(jar_path: impl Into<PathBuf>) -> Self {
        Self { java_bin: "java".to_string(),
               jar_path: jar_path.into(),
               descriptor_types: None,
               threads: 2 }
    }

    /// Acota el paralelismo a un rango razonable.
    pub fn bounded_threads(&self) -> u32 {
        self.threads.clamp(1, 8)
    }
}

#[derive(Debug)]
pub struct PadelDescriptorProvider {
    config: PadelConfig,
}

impl PadelDescriptorProvider {
    pub fn new(config: PadelConfig) -> Self {
        Self { config }
    }

    fn build_command(&self, mol_dir: &Path, out_file: &Path) -> Command {
        let mut cmd = Command::new(&self.config.java_bin);
        cmd.arg("-jar")
           .arg(&self.config.jar_path)
           .arg("-dir")
           .arg(mol_dir)
           .arg("-file")
           .arg(out_file)
           .arg("-2d")
           .arg("-fingerprints")
           .arg("-detectaromaticity")
           .arg("-standardizenitro")
           .arg("-standardizetautomers")
           .arg("-removesalt")
           .arg("-retainorder")
           .arg("-threads")
           .arg(self.config.bounded_threads().to_string());
        if let Some(types) = &self.config.descriptor_types {
            cmd.arg("-descriptortypes").arg(types);
        }
        cmd
    }
}

impl DescriptorProvider for PadelDescriptorProvider {
    fn compute(&self, smiles: &str) -> Result<DescriptorTable, DescriptorError> {
        // Directorio de trabajo aislado por corrida; se limpia al salir de
        // esta función, incluso en error.
        let workdir = tempfile::Builder::new().prefix("qsar-padel-").tempdir()?;
        let mol_path = workdir.path().join("molecule.smi");
        let out_path = workdir.path().join("descriptors.csv");

        fs::write(&mol_path, format!("{smiles}\t{MOLECULE_ID}\n"))?;

        let mut cmd = self.build_command(workdir.path(), &out_path);
        debug!(command = ?cmd, "invoking descriptor tool");

        let output = cmd.output().map_err(|source| DescriptorError::ToolLaunch { command: self.config.java_bin.clone(),
                                                                                 source })?;
        if !output.status.success() {
            return Err(DescriptorError::ToolExit { status: output.status.to_string(),
                                                   stderr: String::from_utf8_lossy(&output.stderr).trim().to_string() });
        }
        if !out_path.is_file() {
            return Err(DescriptorError::OutputMissing { path: out_path.display().to_string() });
        }

        parse_descriptor_csv(&out_path)
    }

    fn provider_id(&self) -> &'static str {
        "padel"
    }
}

/// Parsea la primera fila de datos del CSV de descriptores, descartando la
/// columna identificadora `Name`.
pub fn parse_descriptor_csv(path: &Path) -> Result<DescriptorTable, DescriptorError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DescriptorError::Csv(e.to_string()))?;
    let headers = reader.headers().map_err(|e| DescriptorError::Csv(e.to_string()))?.clone();

    let record = reader.records()
                       .next()
                       .ok_or_else(|| DescriptorError::Csv("descriptor CSV has no data rows".into()))?
                       .map_err(|e| DescriptorError::Csv(e.to_string()))?;

    let mut names = Vec::with_capacity(headers.len().saturating_sub(1));
    let mut values = Vec::with_capacity(names.capacity());
    for (header, raw) in headers.iter().zip(record.iter()) {
        if header == "Name" {
            continue;
        }
        let value: f64 = raw.trim()
                            .parse()
                            .map_err(|_| DescriptorError::Csv(format!("column '{header}' has non-numeric value '{raw}'")))?;
        names.push(header.to_string());
        values.push(value);
    }

    if names.is_empty() {
        return Err(DescriptorError::Csv("descriptor CSV has no feature columns".into()));
    }
    Ok(DescriptorTable::new(names, values))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parsea_csv_y_descarta_la_columna_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("descriptors.csv");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "Name,SsssN,MAXDN,DELS,PubchemFP0").unwrap();
        writeln!(f, "mol_001,2.5,1.10,30.2,1").unwrap();

        let table = parse_descriptor_csv(&path).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.get("Name").is_none());
        assert_eq!(table.get("SsssN"), Some(2.5));
        assert_eq!(table.get("PubchemFP0"), Some(1.0));
    }

    #[test]
    fn csv_sin_filas_es_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "Name,SsssN\n").unwrap();
        assert!(matches!(parse_descriptor_csv(&path), Err(DescriptorError::Csv(_))));
    }

    #[test]
    fn celda_no_numerica_es_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "Name,SsssN\nmol_001,oops\n").unwrap();
        assert!(matches!(parse_descriptor_csv(&path), Err(DescriptorError::Csv(_))));
    }

    #[test]
    fn comando_incluye_flags_fijos_y_threads_acotados() {
        let mut cfg = PadelConfig::new("/opt/padel/PaDEL-Descriptor.jar");
        cfg.threads = 99;
        let provider = PadelDescriptorProvider::new(cfg);
        let cmd = provider.build_command(Path::new("/tmp/in"), Path::new("/tmp/out.csv"));
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(args.contains(&"-fingerprints".to_string()));
        assert!(args.contains(&"-removesalt".to_string()));
        // 99 hilos se acotan a 8.
        let t = args.iter().position(|a| a == "-threads").unwrap();
        assert_eq!(args[t + 1], "8");
    }
}
