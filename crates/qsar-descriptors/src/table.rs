use serde::{Deserialize, Serialize};

/// Una fila de descriptores con nombre: el resultado del proveedor para una
/// molécula, ya sin la columna identificadora.
///
/// `names` y `values` son paralelos y conservan el orden de columnas de la
/// fuente; la proyección hacia las features del modelo se hace por nombre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorTable {
    names: Vec<String>,
    values: Vec<f64>,
}

impl DescriptorTable {
    /// Construye la fila recortando ambos vectores al largo común: una
    /// columna nombrada sin valor (o viceversa) no existe para la tabla, y
    /// aguas abajo se reporta como feature ausente en lugar de indexar mal.
    pub fn new(mut names: Vec<String>, mut values: Vec<f64>) -> Self {
        let len = names.len().min(values.len());
        names.truncate(len);
        values.truncate(len);
        Self { names, values }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Busca un valor por nombre de feature. `get` sobre `values` cubre
    /// instancias deserializadas que no pasaron por `new`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names.iter().position(|n| n == name).and_then(|i| self.values.get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_por_nombre() {
        let t = DescriptorTable::new(vec!["A".into(), "B".into()], vec![1.0, 2.0]);
        assert_eq!(t.get("B"), Some(2.0));
        assert_eq!(t.get("C"), None);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn vectores_desparejos_se_recortan_al_largo_comun() {
        let t = DescriptorTable::new(vec!["A".into(), "B".into(), "C".into()], vec![1.0, 2.0]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("B"), Some(2.0));
        // La columna sin valor no existe: cuenta como feature ausente.
        assert_eq!(t.get("C"), None);
    }

    #[test]
    fn instancia_deserializada_desparejada_no_entra_en_panico() {
        let t: DescriptorTable = serde_json::from_str(r#"{"names":["A","B"],"values":[1.0]}"#).unwrap();
        assert_eq!(t.get("A"), Some(1.0));
        assert_eq!(t.get("B"), None);
    }
}
