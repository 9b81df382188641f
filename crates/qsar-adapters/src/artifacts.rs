//! Artifacts tipados neutrales que fluyen entre los stages del pipeline.
//!
//! Estos tipos no introducen semántica en el core; sólo definen la forma del
//! `payload` JSON que se serializa a `qsar_core::Artifact` con
//! `ArtifactKind::GenericJson` y un `schema_version` estable. El hash lo
//! calcula el motor a partir del payload canónico, por lo que el orden y
//! contenido de los campos debe mantenerse estable.
//!
//! Como entre stages fluye un único artifact, cada uno arrastra el SMILES de
//! entrada: los stages aguas abajo lo necesitan para trazabilidad y para
//! reconstruir la molécula cuando haga falta.

use qsar_core::typed_artifact;

// Molécula validada: SMILES parseado, clave estructural estable y resumen.
typed_artifact!(MoleculeArtifact {
    smiles: String,
    structure_key: String,
    formula: String,
    heavy_atoms: usize,
});

// Representación 2D en SVG de la molécula validada.
typed_artifact!(DepictionArtifact {
    smiles: String,
    structure_key: String,
    svg: String,
});

// Tabla completa de descriptores: vectores paralelos nombre/valor, en el
// orden en que el proveedor los emitió.
typed_artifact!(DescriptorsArtifact {
    smiles: String,
    provider: String,
    names: Vec<String>,
    values: Vec<f64>,
});

// Subconjunto de features del modelo, crudas y ya escaladas (z-score), en el
// orden que el modelo declara.
typed_artifact!(ScaledFeaturesArtifact {
    smiles: String,
    feat_names: Vec<String>,
    raw: Vec<f64>,
    scaled: Vec<f64>,
});

// Veredicto del clasificador: clase cruda (0/1) y etiqueta legible.
typed_artifact!(PredictionArtifact {
    smiles: String,
    target: String,
    raw_class: u8,
    label: String,
});

// Resumen final para presentación.
typed_artifact!(ReportArtifact {
    smiles: String,
    label: String,
    message: String,
});
