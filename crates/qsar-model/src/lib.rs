//! qsar-model: artefacto de modelo serializado y sus operaciones puras.
//!
//! El artefacto es un único documento JSON que empaqueta el clasificador
//! lineal, la lista ordenada de features que espera y los parámetros de
//! escalado z-score por feature. Guardar el escalado junto al modelo (y no
//! como literales en el código) elimina el riesgo de que las estadísticas de
//! entrenamiento y el código deriven por separado: si se reentrena, cambia un
//! solo archivo.

pub mod artifact;
pub mod error;

pub use artifact::{Activity, FeatureScaling, LinearClassifier, PredictionModel};
pub use error::ModelError;
