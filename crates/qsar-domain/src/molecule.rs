use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::smiles::{self, Atom, Bond};
use crate::DomainError;

/// Estructura molecular validada a partir de una cadena SMILES.
///
/// El constructor es la única vía de creación: si `from_smiles` devuelve
/// `Ok`, la cadena parseó y el grafo es consistente. La identidad de la
/// molécula es su `structure_key` (SHA-256 del SMILES normalizado), no la
/// cadena cruda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    smiles: String,
    structure_key: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl Molecule {
    pub fn from_smiles(smiles_str: &str) -> Result<Self, DomainError> {
        let parsed = smiles::parse(smiles_str)?;
        let normalized = smiles_str.trim().to_string();
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let structure_key = format!("{:x}", hasher.finalize());
        Ok(Molecule { smiles: normalized,
                      structure_key,
                      atoms: parsed.atoms,
                      bonds: parsed.bonds })
    }

    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    pub fn structure_key(&self) -> &str {
        &self.structure_key
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.element != "H").count()
    }

    /// Fórmula tipo Hill (C primero, H después, resto alfabético) con
    /// hidrógenos implícitos estimados por valencia estándar. Es una
    /// aproximación presentacional; los descriptores reales vienen de la
    /// herramienta externa.
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut hydrogens = 0usize;

        for (idx, atom) in self.atoms.iter().enumerate() {
            if atom.element == "H" {
                hydrogens += 1;
                continue;
            }
            *counts.entry(atom.element.clone()).or_insert(0) += 1;
            hydrogens += self.implicit_hydrogens(idx, atom);
        }

        let mut out = String::new();
        let write_elem = |elem: &str, n: usize, out: &mut String| {
            if n == 1 {
                out.push_str(elem);
            } else if n > 1 {
                out.push_str(&format!("{elem}{n}"));
            }
        };

        if let Some(&n) = counts.get("C") {
            write_elem("C", n, &mut out);
            write_elem("H", hydrogens, &mut out);
            for (elem, &n) in &counts {
                if elem != "C" {
                    write_elem(elem, n, &mut out);
                }
            }
        } else {
            write_elem("H", hydrogens, &mut out);
            for (elem, &n) in &counts {
                write_elem(elem, n, &mut out);
            }
        }
        out
    }

    fn implicit_hydrogens(&self, idx: usize, atom: &Atom) -> usize {
        if let Some(h) = atom.explicit_h {
            return h as usize;
        }
        let Some(&valence) = smiles::DEFAULT_VALENCE.get(atom.element.as_str()) else {
            return 0;
        };
        let mut used: i32 = self.bonds
                                .iter()
                                .filter(|b| b.a == idx || b.b == idx)
                                .map(|b| b.order.valence_units() as i32)
                                .sum();
        // Un átomo aromático participa del sistema π: ocupa un slot extra.
        if atom.aromatic {
            used += 1;
        }
        used -= atom.charge as i32;
        (valence as i32 - used).max(0) as usize
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} ({} heavy atoms, {})>", self.smiles, self.heavy_atom_count(), self.formula())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_de_etanol() {
        let m = Molecule::from_smiles("CCO").unwrap();
        assert_eq!(m.formula(), "C2H6O");
        assert_eq!(m.heavy_atom_count(), 3);
    }

    #[test]
    fn formula_de_benceno() {
        let m = Molecule::from_smiles("c1ccccc1").unwrap();
        assert_eq!(m.formula(), "C6H6");
    }

    #[test]
    fn structure_key_estable_y_sensible_al_contenido() {
        let a = Molecule::from_smiles("CCO").unwrap();
        let b = Molecule::from_smiles(" CCO ").unwrap();
        let c = Molecule::from_smiles("CCC").unwrap();
        assert_eq!(a.structure_key(), b.structure_key());
        assert_ne!(a.structure_key(), c.structure_key());
        assert_eq!(a.structure_key().len(), 64);
    }

    #[test]
    fn rechaza_smiles_invalido() {
        assert!(Molecule::from_smiles("not_a_smiles").is_err());
        assert!(Molecule::from_smiles("").is_err());
    }
}
