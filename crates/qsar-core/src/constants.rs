//! Constantes del motor.
//!
//! `ENGINE_VERSION` participa en el cálculo de fingerprints: un cambio de
//! versión invalida determinísticamente los fingerprints aunque la definición
//! y los datos no cambien. Mantener estable mientras no haya cambios
//! incompatibles en el contrato de eventos o hashing.

pub const ENGINE_VERSION: &str = "Q1.0";
