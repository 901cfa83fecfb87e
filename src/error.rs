//! 错误处理

#[allow(unused)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("option none, {0}")]
    OptionNone(String),

    #[error("type conversion failed, {0}")]
    TypeConversion(String),

    #[error("py error, {0}")]
    PyErr(#[from] pyo3::PyErr),
    #[error("pythonize error, {0}")]
    PythonizeError(#[from] pythonize::PythonizeError),
    #[error("py downcast error, {0}")]
    PyDowncastError(String),

    #[error("numpy error, {0}")]
    NotContiguousError(#[from] numpy::NotContiguousError),
    #[error("strum error, {0}")]
    ParseEnumString(String),

    #[error("script not found: {0}")]
    ScriptNotFound(String),
    #[error("[-] Adetailer: ControlNet option not available in WEBUI version lower than 1.6.0 due to updates in ControlNet")]
    UnsupportedWebui,
    #[error("processing request has no init image")]
    NoInitImage,

    #[error("invalid parameter, {0}")]
    InvalidParameter(String),
}

impl From<Error> for pyo3::PyErr {
    fn from(e: Error) -> Self {
        match e {
            Error::PyErr(e) => e,
            e => pyo3::PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()),
        }
    }
}
