use thiserror::Error;

use crate::pipeline::processing::validator::ValidationErrors;

/// The value type an embedded extractor was building when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataClass {
    WaterHeating,
    Wall,
    Upgrade,
}

impl std::fmt::Display for DataClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataClass::WaterHeating => "WaterHeating",
            DataClass::Wall => "Wall",
            DataClass::Upgrade => "Upgrade",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug)]
pub enum EnerguideError {
    #[error("Invalid XML fragment: {0}")]
    MalformedFragment(String),

    #[error("Missing value: {0}")]
    MissingValue(String),

    #[error("Invalid embedded data for {data_class}: {message}")]
    InvalidEmbeddedData {
        data_class: DataClass,
        message: String,
    },

    #[error("{0}")]
    InvalidInputData(ValidationErrors),

    #[error("Invalid group size: {0}")]
    InvalidGroupSize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EnerguideError {
    pub fn embedded(data_class: DataClass, message: impl Into<String>) -> Self {
        EnerguideError::InvalidEmbeddedData {
            data_class,
            message: message.into(),
        }
    }

    /// The extractor that raised this error, if it came from one.
    pub fn data_class(&self) -> Option<DataClass> {
        match self {
            EnerguideError::InvalidEmbeddedData { data_class, .. } => Some(*data_class),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnerguideError>;
