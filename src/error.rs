use thiserror::Error;

/// Fatal conditions while reading a balance report. Malformed rows are not
/// errors; they are skipped by the row normalizer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("no account table found (expected a header with code, name, debit and credit columns)")]
    NoAccountTable,

    #[error("account table found but no account rows could be read")]
    NoRecords,
}

#[derive(Error, Debug)]
pub enum ViradaError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "xlsx")]
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ViradaError>;
