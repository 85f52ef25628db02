use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Legacy binary document (.doc/.wps, OLE2 container). These predate the
    /// zipped package format and need conversion in Word/WPS first.
    #[error("legacy binary document format; save as .docx and retry")]
    LegacyFormat,

    /// Preset name not in the built-in table. Raised before any document I/O.
    #[error("unknown preset {0:?} (available: official, academic, legal)")]
    UnknownPreset(String),

    /// The input is not a well-formed DOCX package.
    #[error("invalid document package: {0}")]
    InvalidPackage(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::InvalidPackage(format!("malformed XML: {e}"))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::InvalidPackage(format!("bad archive: {e}"))
    }
}
