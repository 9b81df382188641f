//! RenderDepictionStage (Transform).
//!
//! Reconstruye la molécula desde el SMILES validado y genera su SVG
//! determinista. El parseo ya pasó en `acquire_molecule`, así que un fallo
//! aquí indica un problema de renderizado, no de entrada.

use qsar_core::{typed_stage, StageKind};
use qsar_domain::{depiction, Molecule};

use crate::artifacts::{DepictionArtifact, MoleculeArtifact};
use crate::failures::domain_failure;

typed_stage! {
    stage RenderDepictionStage {
        id: "render_depiction",
        kind: StageKind::Transform,
        input: MoleculeArtifact,
        output: DepictionArtifact,
        params: (),
        run(_me, inp, _p) {
            let mol = Molecule::from_smiles(&inp.smiles).map_err(domain_failure)?;
            let svg = depiction::render_svg(&mol).map_err(domain_failure)?;
            Ok(DepictionArtifact { smiles: inp.smiles,
                                   structure_key: inp.structure_key,
                                   svg,
                                   schema_version: 1 })
        }
    }
}

#[cfg(test)]
mod tests {
    use qsar_core::stage::{StageRunResultTyped, TypedStage};

    use super::*;

    fn molecule_input(smiles: &str) -> MoleculeArtifact {
        let mol = Molecule::from_smiles(smiles).unwrap();
        MoleculeArtifact { smiles: mol.smiles().to_string(),
                           structure_key: mol.structure_key().to_string(),
                           formula: mol.formula(),
                           heavy_atoms: mol.heavy_atom_count(),
                           schema_version: 1 }
    }

    #[test]
    fn produce_svg_y_conserva_el_smiles() {
        let stage = RenderDepictionStage::new();
        match stage.run_typed(Some(molecule_input("c1ccccc1")), ()) {
            StageRunResultTyped::Success { outputs } => {
                assert_eq!(outputs[0].smiles, "c1ccccc1");
                assert!(outputs[0].svg.starts_with("<svg"));
            }
            StageRunResultTyped::Failure { error } => panic!("fallo inesperado: {error}"),
        }
    }
}
