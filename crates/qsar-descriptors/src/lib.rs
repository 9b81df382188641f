//! qsar-descriptors: cálculo de la tabla de descriptores/fingerprints.
//!
//! El cálculo real lo hace una herramienta externa (PaDEL-Descriptor) vía
//! subprocess bloqueante; este crate define el seam (`DescriptorProvider`) y
//! tres implementaciones:
//! - `PadelDescriptorProvider`: la invocación real, con directorio de trabajo
//!   temporal único por corrida y limpieza garantizada.
//! - `OfflineDescriptorProvider`: estimador determinista para demos y tests
//!   sin Java; NO calcula los fingerprints reales.
//! - `StaticDescriptorProvider`: devuelve una tabla fija (tests).

pub mod error;
pub mod offline;
pub mod padel;
pub mod table;

pub use error::DescriptorError;
pub use offline::{OfflineDescriptorProvider, StaticDescriptorProvider};
pub use padel::{PadelConfig, PadelDescriptorProvider};
pub use table::DescriptorTable;

/// Seam de cálculo de descriptores. Las implementaciones deben ser
/// deterministas: mismo SMILES y misma configuración, misma tabla.
pub trait DescriptorProvider: Send + Sync + std::fmt::Debug {
    fn compute(&self, smiles: &str) -> Result<DescriptorTable, DescriptorError>;

    /// Nombre estable del proveedor; entra en los params del stage y por lo
    /// tanto en el fingerprint del run.
    fn provider_id(&self) -> &'static str;
}
