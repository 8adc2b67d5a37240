use thiserror::Error;

#[derive(Error, Debug)]
pub enum CtfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Unsupported file extension: {path}")]
    UnsupportedFormat { path: String },

    #[error("Snapshot for {found} applied to {expected}")]
    SnapshotMismatch { found: u32, expected: u32 },

    #[error("Unknown {kind} in scenario: {id}")]
    UnknownScenarioRef { kind: &'static str, id: u32 },

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

impl CtfError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            CtfError::Io(_) => true,
            CtfError::SnapshotMismatch { .. } => true,
            CtfError::InvalidConfig { .. } => false,
            CtfError::InvalidScenario(_) => false,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CtfError>;
