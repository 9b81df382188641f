//! Los seis stages del pipeline de predicción.

pub mod acquire;
pub mod classify;
pub mod depict;
pub mod descriptors;
pub mod features;
pub mod report;

pub use acquire::AcquireMoleculeStage;
pub use classify::ClassifyStage;
pub use depict::RenderDepictionStage;
pub use descriptors::ComputeDescriptorsStage;
pub use features::SelectScaleStage;
pub use report::ReportStage;
