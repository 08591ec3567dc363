//! Error types for marc-readable

use thiserror::Error;

/// Main error type for parsing, mapping and collaborator operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("record has no identifier control field (001)")]
    MissingIdentifier,

    #[error("MARCXML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unable to determine filename: the server sent no Content-Disposition header, pass an explicit filename")]
    FilenameUnavailable,

    #[error("unsupported archive format: {0}")]
    UnsupportedArchive(String),

    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("7z archive error: {0}")]
    SevenZ(#[from] sevenz_rust::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type alias for marc-readable operations
pub type Result<T> = std::result::Result<T, Error>;
