//! Proveedores de descriptores sin herramienta externa.
//!
//! `OfflineDescriptorProvider` deriva una tabla determinista del grafo
//! molecular parseado. Los valores imitan el rango de los descriptores que el
//! modelo consume (SsssN, MAXDN, DELS) pero NO son los descriptores PaDEL
//! reales: sirven para demos sin Java y para los tests de integración del
//! pipeline, donde lo que importa es el cableado, no la química.

use std::sync::Arc;

use qsar_domain::{BondOrder, Molecule};
use tracing::warn;

use crate::{DescriptorError, DescriptorProvider, DescriptorTable};

#[derive(Debug, Default, Clone)]
pub struct OfflineDescriptorProvider;

impl OfflineDescriptorProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorProvider for OfflineDescriptorProvider {
    fn compute(&self, smiles: &str) -> Result<DescriptorTable, DescriptorError> {
        let molecule = Molecule::from_smiles(smiles)
            .map_err(|e| DescriptorError::Csv(format!("offline estimator: {e}")))?;

        let atoms = molecule.atoms();
        let mut degree = vec![0usize; atoms.len()];
        let mut pi_bonds = 0usize;
        for b in molecule.bonds() {
            degree[b.a] += 1;
            degree[b.b] += 1;
            if matches!(b.order, BondOrder::Double | BondOrder::Triple | BondOrder::Aromatic) {
                pi_bonds += 1;
            }
        }

        let is_hetero = |e: &str| e != "C" && e != "H";

        // Sustitutos deterministas de los tres descriptores continuos.
        let ssss_n = atoms.iter()
                          .zip(&degree)
                          .filter(|(a, &d)| a.element == "N" && d >= 3)
                          .count() as f64;
        let maxdn = atoms.iter()
                         .zip(&degree)
                         .filter(|(a, _)| is_hetero(&a.element))
                         .map(|(_, &d)| d as f64 * 0.8)
                         .fold(0.0f64, f64::max);
        let dels = atoms.iter()
                        .zip(&degree)
                        .map(|(a, &d)| if is_hetero(&a.element) { d as f64 * 2.5 } else { d as f64 * 0.5 })
                        .sum::<f64>()
                   + pi_bonds as f64;

        // Unas columnas extra tipo fingerprint para que la proyección tenga
        // algo que descartar, como en la tabla real de ~881 columnas.
        let halogens = atoms.iter()
                            .filter(|a| matches!(a.element.as_str(), "F" | "Cl" | "Br" | "I"))
                            .count();
        let names = vec!["SsssN".to_string(),
                         "MAXDN".to_string(),
                         "DELS".to_string(),
                         "FPHeavyAtoms".to_string(),
                         "FPAromaticAtoms".to_string(),
                         "FPHeteroAtoms".to_string(),
                         "FPHalogens".to_string(),
                         "FPRingBondFraction".to_string()];
        let aromatic = atoms.iter().filter(|a| a.aromatic).count();
        let hetero = atoms.iter().filter(|a| is_hetero(&a.element)).count();
        let ring_fraction = if molecule.bonds().is_empty() {
            0.0
        } else {
            pi_bonds as f64 / molecule.bonds().len() as f64
        };
        let values = vec![ssss_n,
                          maxdn,
                          dels,
                          molecule.heavy_atom_count() as f64,
                          aromatic as f64,
                          hetero as f64,
                          halogens as f64,
                          ring_fraction];

        Ok(DescriptorTable::new(names, values))
    }

    fn provider_id(&self) -> &'static str {
        "offline-estimator"
    }
}

/// Devuelve siempre la misma tabla, ignorando el SMILES. Pensado para tests
/// que necesitan controlar exactamente qué columnas existen.
#[derive(Debug, Clone)]
pub struct StaticDescriptorProvider {
    table: DescriptorTable,
}

impl StaticDescriptorProvider {
    pub fn new(table: DescriptorTable) -> Self {
        Self { table }
    }

    pub fn shared(table: DescriptorTable) -> Arc<dyn DescriptorProvider> {
        Arc::new(Self::new(table))
    }
}

impl DescriptorProvider for StaticDescriptorProvider {
    fn compute(&self, smiles: &str) -> Result<DescriptorTable, DescriptorError> {
        if smiles.trim().is_empty() {
            warn!("static provider invoked with empty SMILES");
        }
        Ok(self.table.clone())
    }

    fn provider_id(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimador_offline_es_determinista() {
        let p = OfflineDescriptorProvider::new();
        let a = p.compute("c1ccccc1CCN(C)C").unwrap();
        let b = p.compute("c1ccccc1CCN(C)C").unwrap();
        assert_eq!(a, b);
        assert!(a.get("SsssN").is_some());
        assert!(a.get("MAXDN").is_some());
        assert!(a.get("DELS").is_some());
    }

    #[test]
    fn moleculas_distintas_dan_tablas_distintas() {
        let p = OfflineDescriptorProvider::new();
        let a = p.compute("CCO").unwrap();
        let b = p.compute("c1ccccc1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn estimador_offline_rechaza_smiles_invalido() {
        let p = OfflineDescriptorProvider::new();
        assert!(p.compute("not_a_smiles").is_err());
    }
}
