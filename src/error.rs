use std::path::PathBuf;
use thiserror::Error;

/// A target or option selector that does not match any supported grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Unknown selector '{0}'")]
    UnknownSelector(String),

    #[error("Unknown option selector '{0}'")]
    UnknownOptionSelector(String),

    /// storeAttribute target without a trailing `@attr` part
    #[error("Attribute locator '{0}' has no @attribute suffix")]
    MissingAttribute(String),
}

/// Errors that abort the conversion of a single document
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("HTML parse error: no command table found")]
    DocumentParse,

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Template file {} is not accessible", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
