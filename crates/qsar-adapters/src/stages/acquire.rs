//! AcquireMoleculeStage (Source).
//!
//! Valida el SMILES de entrada parseándolo a una `Molecule` del dominio y
//! emite el `MoleculeArtifact` que abre el pipeline. Un SMILES vacío o
//! imparseable corta el run aquí mismo: ningún stage posterior arranca.

use qsar_core::{typed_stage, StageFailure};
use qsar_domain::Molecule;

use crate::artifacts::MoleculeArtifact;
use crate::failures::domain_failure;

typed_stage! {
    source AcquireMoleculeStage {
        id: "acquire_molecule",
        output: MoleculeArtifact,
        params: (),
        fields { smiles: String }
        , run(me, _p) {
            let trimmed = me.smiles.trim();
            if trimmed.is_empty() {
                return Err(StageFailure::InvalidMolecule("empty SMILES string".to_string()));
            }
            let mol = Molecule::from_smiles(trimmed).map_err(domain_failure)?;
            Ok(MoleculeArtifact { smiles: mol.smiles().to_string(),
                                  structure_key: mol.structure_key().to_string(),
                                  formula: mol.formula(),
                                  heavy_atoms: mol.heavy_atom_count(),
                                  schema_version: 1 })
        }
    }
}
