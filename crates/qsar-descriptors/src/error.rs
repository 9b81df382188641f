use thiserror::Error;

/// Fallos del cálculo de descriptores. Todos terminan reportados como
/// `DescriptorComputation` en el log del run; aquí se conserva la causa.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to launch descriptor tool '{command}': {source}")]
    ToolLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("descriptor tool exited with {status}: {stderr}")]
    ToolExit { status: String, stderr: String },

    #[error("descriptor tool produced no output file at {path}")]
    OutputMissing { path: String },

    #[error("descriptor CSV: {0}")]
    Csv(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
