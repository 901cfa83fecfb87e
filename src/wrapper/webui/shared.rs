//! 全局选项包装

use pyo3::{
    pyclass, pymethods,
    types::{PyAnyMethods, PyModule},
    Bound, Py, PyAny, PyResult, Python,
};

use crate::{
    error::Error,
    host::{FlagOverride, OptionStore},
};

/// 允许脚本控制 ControlNet 的选项键
pub const ALLOW_SCRIPT_CONTROL_KEY: &str = "control_net_allow_script_control";

/// shared.opts.data 选项表
pub struct WebuiOpts {
    data: Py<PyAny>,
}

impl WebuiOpts {
    pub fn fetch(py: Python<'_>) -> Result<Self, Error> {
        let shared = PyModule::import(py, "modules.shared")?;
        let data = shared.getattr("opts")?.getattr("data")?;
        Ok(Self {
            data: data.unbind(),
        })
    }
}

impl OptionStore for WebuiOpts {
    type Value = Py<PyAny>;

    fn contains(&self, key: &str) -> Result<bool, Error> {
        Python::with_gil(|py| Ok(self.data.bind(py).contains(key)?))
    }

    fn get(&self, key: &str) -> Result<Py<PyAny>, Error> {
        Python::with_gil(|py| Ok(self.data.bind(py).get_item(key)?.unbind()))
    }

    fn set(&mut self, key: &str, value: Py<PyAny>) -> Result<(), Error> {
        Python::with_gil(|py| Ok(self.data.bind(py).set_item(key, value)?))
    }

    fn set_true(&mut self, key: &str) -> Result<(), Error> {
        Python::with_gil(|py| Ok(self.data.bind(py).set_item(key, true)?))
    }
}

/// 作用域内强制开启脚本控制的上下文管理器
///
/// ```py
/// with cn_allow_script_control():
///     ...
/// ```
#[pyclass]
pub struct ScriptControlScope {
    guard: Option<FlagOverride<Py<PyAny>>>,
}

#[pymethods]
impl ScriptControlScope {
    #[new]
    pub fn new() -> Self {
        Self { guard: None }
    }

    fn __enter__(&mut self, py: Python<'_>) -> PyResult<()> {
        let mut opts = WebuiOpts::fetch(py)?;
        self.guard = Some(FlagOverride::engage(&mut opts, ALLOW_SCRIPT_CONTROL_KEY)?);
        Ok(())
    }

    #[pyo3(signature = (exc_type=None, exc_value=None, traceback=None))]
    fn __exit__(
        &mut self,
        py: Python<'_>,
        exc_type: Option<Bound<'_, PyAny>>,
        exc_value: Option<Bound<'_, PyAny>>,
        traceback: Option<Bound<'_, PyAny>>,
    ) -> PyResult<bool> {
        let _ = (exc_type, exc_value, traceback);
        if let Some(guard) = self.guard.take() {
            let mut opts = WebuiOpts::fetch(py)?;
            guard.release(&mut opts)?;
        }
        // 异常不在这里吞掉
        Ok(false)
    }
}

impl Default for ScriptControlScope {
    fn default() -> Self {
        Self::new()
    }
}
