use thiserror::Error;

/// Main error type for the Cover-Compositor library
#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Image processing error: {0}")]
    Composite(#[from] CompositeError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors produced by the compositing core
#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("Failed to decode image: {reason}")]
    DecodeFailed { reason: String },

    #[error("Image has invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to encode image: {reason}")]
    EncodeFailed { reason: String },
}

/// Errors from the model catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Model not found: {id}")]
    ModelNotFound { id: i64 },

    #[error("Model name already exists: {name}")]
    DuplicateName { name: String },

    #[error("Failed to load catalog file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save catalog file: {path}")]
    SaveFailed { path: String },
}

/// Errors from template and cover file storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Template file not found: {path}")]
    TemplateNotFound { path: String },

    #[error("Generated cover not found: {name}")]
    CoverNotFound { name: String },

    #[error("Rejected unsafe filename: {name}")]
    UnsafeFilename { name: String },

    #[error("Failed to write file: {path} - {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CoverError
pub type Result<T> = std::result::Result<T, CoverError>;

impl CoverError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Composite(CompositeError::DecodeFailed { .. }) => {
                "Could not read the image. Please check it is a valid PNG or JPEG file.".to_string()
            }
            Self::Catalog(CatalogError::DuplicateName { name }) => {
                format!("A model named '{}' already exists.", name)
            }
            Self::Storage(StorageError::TemplateNotFound { .. }) => {
                "Mobile cover template not found!".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
