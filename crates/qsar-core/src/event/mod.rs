//! Eventos de run y trait `RunLog`.

mod log;
mod types;

pub use log::{InMemoryRunLog, RunLog};
pub use types::{RunEvent, RunEventKind};
