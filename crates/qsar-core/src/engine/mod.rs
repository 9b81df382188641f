//! Motor de ejecución determinista y su builder tipado.

pub mod builder;
pub mod core;

pub use builder::{EngineBuilder, EngineBuilderInit};
pub use core::PipelineEngine;
