use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Failed to parse table {path}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Decode {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialization(#[source] serde_json::Error),
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ExtractError {
    fn user_message(&self) -> String {
        match self {
            ExtractError::Io(e) => format!("I/O error: {}", e),
            ExtractError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ExtractError::InvalidPath { path } => {
                format!("Invalid directory: {}", path)
            }
            ExtractError::Csv { path, source } => {
                format!("Could not parse table {}: {}", path, source)
            }
            ExtractError::Decode { path, source } => {
                format!("Could not decode {}: {}", path, source)
            }
            ExtractError::Serialization(e) => {
                format!("Could not produce the JSON document: {}", e)
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ExtractError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            ExtractError::InvalidPath { .. } => Some(
                "Run the extractor from the solver output directory, or point --dir at it.".to_string()
            ),
            ExtractError::Serialization(_) => Some(
                "Try --nan string if the results contain non-finite values.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ExtractError {
    fn from(error: toml::de::Error) -> Self {
        ExtractError::Config {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            ExtractError::Io(error.into())
        } else {
            ExtractError::Serialization(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
