//! El artefacto de modelo: clasificador + feat_names + escalado, juntos.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ModelError;

/// Parámetros de normalización z-score de una feature, tomados de las
/// estadísticas del set de entrenamiento.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaling {
    pub mean: f64,
    pub std: f64,
}

/// Clasificador binario lineal: signo de `weights · x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LinearClassifier {
    /// Función de decisión cruda.
    pub fn decision(&self, x: &[f64]) -> Result<f64, ModelError> {
        if x.len() != self.weights.len() {
            return Err(ModelError::FeatureMismatch { expected: self.weights.len(),
                                                     got: x.len() });
        }
        Ok(self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + self.intercept)
    }
}

/// Etiqueta de actividad contra el target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Active,
    Inactive,
}

impl Activity {
    /// Etiquetas canónicas admitidas en `class_labels`. Cualquier otra grafía
    /// se rechaza al cargar el artefacto: una polaridad que "casi" coincide
    /// es exactamente el tipo de deriva silenciosa que no debe pasar de la
    /// validación.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "active" => Some(Activity::Active),
            "inactive" => Some(Activity::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::Active => write!(f, "active"),
            Activity::Inactive => write!(f, "inactive"),
        }
    }
}

/// Artefacto completo del modelo entrenado.
///
/// La polaridad de etiquetas es dato, no código: `class_labels[i]` nombra la
/// clase cruda `i` del clasificador. El artefacto PARP-1 que se distribuye
/// conserva la codificación original del entrenamiento (0 = active,
/// 1 = inactive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionModel {
    /// Nombre del target biológico (presentacional).
    pub target: String,
    /// Features que el modelo espera, en el orden del vector de pesos.
    pub feat_names: Vec<String>,
    /// Escalado z-score por feature; debe cubrir todas las `feat_names`.
    pub scaling: BTreeMap<String, FeatureScaling>,
    pub classifier: LinearClassifier,
    /// Nombre de clase para el label crudo 0 y 1, en ese orden.
    pub class_labels: [String; 2],
}

impl PredictionModel {
    /// Carga y valida el artefacto desde disco. Cualquier problema aquí es
    /// `ModelError::Load`: el artefacto se considera corrupto en bloque.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ModelError::Load(format!("cannot read '{}': {e}", path.display())))?;
        let model = Self::from_json_str(&raw)?;
        info!(target_name = %model.target, features = model.feat_names.len(), "model artifact loaded");
        Ok(model)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ModelError> {
        let model: PredictionModel =
            serde_json::from_str(raw).map_err(|e| ModelError::Load(format!("malformed artifact: {e}")))?;
        model.validate()?;
        Ok(model)
    }

    /// Invariantes internos del artefacto.
    fn validate(&self) -> Result<(), ModelError> {
        if self.feat_names.is_empty() {
            return Err(ModelError::Load("feat_names is empty".into()));
        }
        if self.classifier.weights.len() != self.feat_names.len() {
            return Err(ModelError::Load(format!("classifier has {} weights but {} feat_names",
                                                self.classifier.weights.len(),
                                                self.feat_names.len())));
        }
        for name in &self.feat_names {
            let Some(s) = self.scaling.get(name) else {
                return Err(ModelError::Load(format!("feature '{name}' has no scaling parameters")));
            };
            if !s.std.is_finite() || s.std == 0.0 || !s.mean.is_finite() {
                return Err(ModelError::Load(format!("feature '{name}' has degenerate scaling parameters")));
            }
        }
        for label in &self.class_labels {
            if Activity::from_label(label).is_none() {
                return Err(ModelError::Load(format!("unknown class label '{label}' (expected \"active\" or \"inactive\")")));
            }
        }
        if self.class_labels[0] == self.class_labels[1] {
            return Err(ModelError::Load("class labels must be distinct".into()));
        }
        Ok(())
    }

    /// Proyección pura: extrae de la fila `(names, values)` exactamente las
    /// features del modelo, en el orden del modelo, sin alterar valores.
    pub fn select_features(&self, names: &[String], values: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.feat_names
            .iter()
            .map(|feat| {
                // `get` cubre también filas con menos valores que nombres:
                // una feature nombrada pero sin valor cuenta como ausente.
                names.iter()
                     .position(|n| n == feat)
                     .and_then(|i| values.get(i).copied())
                     .ok_or_else(|| ModelError::MissingFeature(feat.clone()))
            })
            .collect()
    }

    /// Transformación afín pura: `(v - mean) / std` por feature, en el orden
    /// del modelo. Asume un vector ya proyectado por `select_features`.
    pub fn scale_features(&self, selected: &[f64]) -> Result<Vec<f64>, ModelError> {
        if selected.len() != self.feat_names.len() {
            return Err(ModelError::FeatureMismatch { expected: self.feat_names.len(),
                                                     got: selected.len() });
        }
        Ok(self.feat_names
               .iter()
               .zip(selected)
               .map(|(name, &v)| {
                   // validate() garantiza la entrada de escalado.
                   let s = self.scaling[name];
                   (v - s.mean) / s.std
               })
               .collect())
    }

    /// Evalúa el clasificador sobre el vector escalado y mapea el label
    /// crudo a `Activity` según `class_labels`.
    pub fn predict(&self, scaled: &[f64]) -> Result<(u8, Activity), ModelError> {
        let decision = self.classifier.decision(scaled)?;
        let raw: u8 = if decision > 0.0 { 1 } else { 0 };
        let label = &self.class_labels[raw as usize];
        // validate() garantiza etiquetas canónicas; esto sólo cubre modelos
        // construidos por fuera de `from_json_str`.
        let activity = Activity::from_label(label)
            .ok_or_else(|| ModelError::Load(format!("unknown class label '{label}'")))?;
        Ok((raw, activity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact_json() -> String {
        serde_json::json!({
            "target": "PARP-1",
            "feat_names": ["SsssN", "MAXDN", "DELS"],
            "scaling": {
                "SsssN": {"mean": 2.09, "std": 1.87},
                "MAXDN": {"mean": 2.28, "std": 0.96},
                "DELS":  {"mean": 35.08, "std": 15.83}
            },
            "classifier": {"weights": [-0.62, 0.84, 0.31], "intercept": -0.05},
            "class_labels": ["active", "inactive"]
        }).to_string()
    }

    #[test]
    fn carga_y_valida_un_artefacto_bien_formado() {
        let m = PredictionModel::from_json_str(&artifact_json()).unwrap();
        assert_eq!(m.feat_names.len(), 3);
        assert_eq!(m.class_labels[0], "active");
    }

    #[test]
    fn artefacto_malformado_es_model_load() {
        assert!(matches!(PredictionModel::from_json_str("{not json"), Err(ModelError::Load(_))));
        // Pesos y features con anchos distintos.
        let mut v: serde_json::Value = serde_json::from_str(&artifact_json()).unwrap();
        v["classifier"]["weights"] = serde_json::json!([1.0]);
        assert!(matches!(PredictionModel::from_json_str(&v.to_string()), Err(ModelError::Load(_))));
        // Falta el escalado de una feature.
        let mut v: serde_json::Value = serde_json::from_str(&artifact_json()).unwrap();
        v["scaling"].as_object_mut().unwrap().remove("DELS");
        assert!(matches!(PredictionModel::from_json_str(&v.to_string()), Err(ModelError::Load(_))));
        // Desviación estándar cero.
        let mut v: serde_json::Value = serde_json::from_str(&artifact_json()).unwrap();
        v["scaling"]["MAXDN"]["std"] = serde_json::json!(0.0);
        assert!(matches!(PredictionModel::from_json_str(&v.to_string()), Err(ModelError::Load(_))));
    }

    #[test]
    fn etiquetas_no_canonicas_se_rechazan_al_cargar() {
        // "Active"/"Inactive" (u otra grafía) no deben cargar: antes pasaban
        // la validación y toda predicción salía "inactive".
        let mut v: serde_json::Value = serde_json::from_str(&artifact_json()).unwrap();
        v["class_labels"] = serde_json::json!(["Active", "Inactive"]);
        assert!(matches!(PredictionModel::from_json_str(&v.to_string()), Err(ModelError::Load(_))));

        let mut v: serde_json::Value = serde_json::from_str(&artifact_json()).unwrap();
        v["class_labels"] = serde_json::json!(["actif", "inactif"]);
        assert!(matches!(PredictionModel::from_json_str(&v.to_string()), Err(ModelError::Load(_))));

        // La polaridad invertida sí es válida: es dato, no grafía.
        let mut v: serde_json::Value = serde_json::from_str(&artifact_json()).unwrap();
        v["class_labels"] = serde_json::json!(["inactive", "active"]);
        let m = PredictionModel::from_json_str(&v.to_string()).unwrap();
        let (raw, act) = m.predict(&[10.0, -10.0, -10.0]).unwrap();
        assert_eq!((raw, act), (0, Activity::Inactive));
    }

    #[test]
    fn seleccion_es_proyeccion_pura_en_orden_del_modelo() {
        let m = PredictionModel::from_json_str(&artifact_json()).unwrap();
        let names: Vec<String> = ["DELS", "Extra1", "SsssN", "MAXDN", "Extra2"].iter().map(|s| s.to_string()).collect();
        let values = [30.0, 99.0, 2.5, 1.1, -7.0];
        let selected = m.select_features(&names, &values).unwrap();
        // Orden del modelo, valores intactos, extras descartados.
        assert_eq!(selected, vec![2.5, 1.1, 30.0]);
    }

    #[test]
    fn feature_faltante_es_missing_feature() {
        let m = PredictionModel::from_json_str(&artifact_json()).unwrap();
        let names: Vec<String> = ["SsssN", "MAXDN"].iter().map(|s| s.to_string()).collect();
        let err = m.select_features(&names, &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, ModelError::MissingFeature("DELS".into()));
    }

    #[test]
    fn fila_con_mas_nombres_que_valores_no_entra_en_panico() {
        let m = PredictionModel::from_json_str(&artifact_json()).unwrap();
        // "DELS" figura en los nombres pero la fila de valores quedó corta.
        let names: Vec<String> = ["SsssN", "MAXDN", "DELS"].iter().map(|s| s.to_string()).collect();
        let err = m.select_features(&names, &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, ModelError::MissingFeature("DELS".into()));
    }

    #[test]
    fn escalado_es_afin_y_reversible() {
        let m = PredictionModel::from_json_str(&artifact_json()).unwrap();
        let raw = [2.5, 1.1, 30.0];
        let scaled = m.scale_features(&raw).unwrap();
        assert!((scaled[0] - (2.5 - 2.09) / 1.87).abs() < 1e-12);
        // Round-trip dentro de tolerancia flotante.
        for (i, name) in m.feat_names.iter().enumerate() {
            let s = m.scaling[name];
            let back = scaled[i] * s.std + s.mean;
            assert!((back - raw[i]).abs() < 1e-9, "round-trip de {name}");
        }
    }

    #[test]
    fn prediccion_determinista_y_con_polaridad_de_datos() {
        let m = PredictionModel::from_json_str(&artifact_json()).unwrap();
        let scaled = m.scale_features(&[2.5, 1.1, 30.0]).unwrap();
        let (raw1, act1) = m.predict(&scaled).unwrap();
        let (raw2, act2) = m.predict(&scaled).unwrap();
        assert_eq!((raw1, act1), (raw2, act2));
        // class_labels[0] = active: decisión <= 0 es "active".
        let (raw, act) = m.predict(&[-10.0, 10.0, 10.0]).unwrap();
        assert_eq!(raw, 1);
        assert_eq!(act, Activity::Inactive);
        let (raw, act) = m.predict(&[10.0, -10.0, -10.0]).unwrap();
        assert_eq!(raw, 0);
        assert_eq!(act, Activity::Active);
    }

    #[test]
    fn ancho_invalido_es_feature_mismatch() {
        let m = PredictionModel::from_json_str(&artifact_json()).unwrap();
        assert_eq!(m.predict(&[1.0]).unwrap_err(),
                   ModelError::FeatureMismatch { expected: 3, got: 1 });
        assert_eq!(m.scale_features(&[1.0, 2.0]).unwrap_err(),
                   ModelError::FeatureMismatch { expected: 3, got: 2 });
    }
}
