use std::path::PathBuf;

use thiserror::Error as SuperError;

use crate::keys::{Field, TagFormat};

/// Failures of the underlying tag containers
#[derive(SuperError, Debug)]
pub enum ContainerError {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Tag library error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
    #[error("Ogg paging error: {0}")]
    Ogg(#[from] ogg_pager::PageError),
    #[error("Malformed {format} container: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },
    #[error("Invalid tag item {key}: {reason}")]
    InvalidItem { key: String, reason: String },
    #[error("Stripping is not supported by {0} containers")]
    StripUnsupported(&'static str),
    #[error("Injected failure")]
    Injected,
}

impl ContainerError {
    pub(crate) fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }
}

/// Engine errors
#[derive(SuperError, Debug)]
pub enum Error {
    #[error("Gain value cannot be encoded: {0}")]
    InvalidGainValue(f64),
    #[error("Field {field:?} is not defined for {format:?} tags")]
    UnsupportedField { field: Field, format: TagFormat },
    #[error("Container format is not supported: {0}")]
    UnsupportedFormat(String),
    #[error("Album data requested but the scan of {0} has none")]
    MissingAlbumData(PathBuf),
    #[error("Invalid ID3v2 version {0}; only 2, 3 and 4 are supported")]
    InvalidId3Version(i32),
    #[error("Couldn't open {path}: {source}")]
    ContainerOpenFailed {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },
    #[error("Couldn't write to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },
    #[error("Couldn't clear tags of {path}: {source}")]
    ClearFailed {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },
}

impl Error {
    pub(crate) fn open_failed(path: impl Into<PathBuf>, source: impl Into<ContainerError>) -> Self {
        Self::ContainerOpenFailed {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Short name of the error kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidGainValue(_) => "InvalidGainValue",
            Error::UnsupportedField { .. } => "UnsupportedField",
            Error::UnsupportedFormat(_) => "UnsupportedFormat",
            Error::MissingAlbumData(_) => "MissingAlbumData",
            Error::InvalidId3Version(_) => "InvalidId3Version",
            Error::ContainerOpenFailed { .. } => "ContainerOpenFailed",
            Error::WriteFailed { .. } => "WriteFailed",
            Error::ClearFailed { .. } => "ClearFailed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Error::InvalidGainValue(f64::NAN).kind(), "InvalidGainValue");
        assert_eq!(Error::InvalidId3Version(5).kind(), "InvalidId3Version");
        let e = Error::open_failed("a.mp3", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(e.kind(), "ContainerOpenFailed");
        assert!(e.to_string().starts_with("Couldn't open a.mp3"));
    }
}
