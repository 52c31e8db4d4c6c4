use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarbonError {
    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Factor table error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, CarbonError>;

#[cfg(feature = "python")]
impl From<CarbonError> for pyo3::PyErr {
    fn from(err: CarbonError) -> pyo3::PyErr {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for CarbonError {
    fn from(err: pyo3::PyErr) -> Self {
        CarbonError::General(err.to_string())
    }
}
