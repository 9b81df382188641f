//! ComputeDescriptorsStage (Transform).
//!
//! Delegación al seam `DescriptorProvider`: la implementación real invoca
//! PaDEL-Descriptor en un subprocess; en tests y demos se inyecta un
//! proveedor determinista en memoria. El id del proveedor queda grabado en
//! el artifact de salida, por lo que entra en el hash y en el fingerprint
//! del run.

use std::sync::Arc;

use qsar_core::{typed_stage, StageKind};
use qsar_descriptors::DescriptorProvider;

use crate::artifacts::{DepictionArtifact, DescriptorsArtifact};
use crate::failures::descriptor_failure;

typed_stage! {
    stage ComputeDescriptorsStage {
        id: "compute_descriptors",
        kind: StageKind::Transform,
        input: DepictionArtifact,
        output: DescriptorsArtifact,
        params: (),
        fields { provider: Arc<dyn DescriptorProvider> }
        , run(me, inp, _p) {
            let table = me.provider.compute(&inp.smiles).map_err(descriptor_failure)?;
            Ok(DescriptorsArtifact { smiles: inp.smiles,
                                     provider: me.provider.provider_id().to_string(),
                                     names: table.names().to_vec(),
                                     values: table.values().to_vec(),
                                     schema_version: 1 })
        }
    }
}

#[cfg(test)]
mod tests {
    use qsar_core::stage::{StageRunResultTyped, TypedStage};
    use qsar_descriptors::{DescriptorTable, StaticDescriptorProvider};

    use super::*;

    #[test]
    fn copia_la_tabla_y_el_id_del_proveedor() {
        let table = DescriptorTable::new(vec!["SsssN".into(), "MAXDN".into()], vec![1.5, 2.25]);
        let stage = ComputeDescriptorsStage::new(StaticDescriptorProvider::shared(table));
        let inp = DepictionArtifact { smiles: "CCO".into(),
                                      structure_key: "k".into(),
                                      svg: "<svg/>".into(),
                                      schema_version: 1 };
        match stage.run_typed(Some(inp), ()) {
            StageRunResultTyped::Success { outputs } => {
                assert_eq!(outputs[0].provider, "static");
                assert_eq!(outputs[0].names, vec!["SsssN".to_string(), "MAXDN".to_string()]);
                assert_eq!(outputs[0].values, vec![1.5, 2.25]);
            }
            StageRunResultTyped::Failure { error } => panic!("fallo inesperado: {error}"),
        }
    }
}
