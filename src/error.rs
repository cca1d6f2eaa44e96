//! Error types for docshift operations.
//!
//! Each error class maps to a distinct process exit code in the driver, so a
//! caller can tell a missing plugin from an unresolvable converter name from
//! a conversion failure without parsing stderr.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a converter plugin or converting a
/// document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("plugin path does not exist: {0}")]
    PluginPathMissing(PathBuf),

    #[error("input file does not exist: {0}")]
    InputMissing(PathBuf),

    #[error("failed to ensure output directory exists: {0}")]
    OutputDir(#[source] std::io::Error),

    #[error("plugin library error: {0}")]
    Library(#[from] libloading::Error),

    #[error("plugin does not satisfy the converter contract: {0}")]
    Contract(String),

    #[error("could not find converter: {0}")]
    NotFound(String),

    #[error("failed to instantiate converter: {0}")]
    Instantiation(String),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl Error {
    /// Process exit code for this error class.
    ///
    /// Codes are stable: scripts may rely on them to distinguish failure
    /// modes. `0` is reserved for success and is never returned here.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidArguments(_) => 1,
            Error::PluginPathMissing(_) => 2,
            Error::InputMissing(_) => 3,
            Error::OutputDir(_) => 4,
            Error::Library(_) | Error::Contract(_) => 5,
            Error::NotFound(_) => 6,
            Error::Instantiation(_) => 7,
            Error::Io(_) | Error::Xml(_) | Error::Utf8(_) | Error::MissingElement(_) => 8,
            Error::Unexpected(_) => 9,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let errors = [
            Error::InvalidArguments("x".into()),
            Error::PluginPathMissing(PathBuf::from("p")),
            Error::InputMissing(PathBuf::from("i")),
            Error::OutputDir(std::io::Error::other("d")),
            Error::Contract("c".into()),
            Error::NotFound("n".into()),
            Error::Instantiation("i".into()),
            Error::MissingElement("e".into()),
            Error::Unexpected("u".into()),
        ];

        let codes: Vec<u8> = errors.iter().map(Error::exit_code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_conversion_failures_share_a_code() {
        let io = Error::Io(std::io::Error::other("boom"));
        let xml = Error::MissingElement("root".into());
        assert_eq!(io.exit_code(), 8);
        assert_eq!(xml.exit_code(), 8);
    }
}
