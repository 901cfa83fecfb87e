use log::warn;
use pyo3::{
    pyfunction, pymodule,
    types::{PyModule, PyModuleMethods},
    wrap_pyfunction, Bound, PyResult, Python,
};

pub mod controlnet;
mod error;
pub mod host;
pub mod wrapper;

use controlnet::ControlNetBridge;
use wrapper::webui::ScriptControlScope;

/// 模块级便捷函数: 按领域关键字过滤 ControlNet 模型名
///
/// 扩展缺失或注册表不可达时返回空表, 不抛异常
#[pyfunction]
fn get_cn_models(py: Python<'_>) -> PyResult<Vec<String>> {
    if !wrapper::controlnet::is_extension_active(py) {
        return Ok(Vec::new());
    }
    match wrapper::controlnet::all_model_names(py) {
        Ok(names) => Ok(controlnet::filter_model_names(names)),
        Err(e) => {
            warn!("controlnet registry unreachable: {e}");
            Ok(Vec::new())
        }
    }
}

/// 作用域内允许脚本控制 ControlNet 的上下文管理器
#[pyfunction]
fn cn_allow_script_control() -> ScriptControlScope {
    ScriptControlScope::new()
}

/// A Python module implemented in Rust.
#[pymodule]
#[pyo3(name = "adetailer_controlnet")] // 需要与包名保持一致
fn py_init(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    let _ = env_logger::try_init();

    m.add_function(wrap_pyfunction!(get_cn_models, m)?)?;
    m.add_function(wrap_pyfunction!(cn_allow_script_control, m)?)?;

    m.add_class::<ControlNetBridge>()?;
    m.add_class::<ScriptControlScope>()?;

    m.add_submodule(&controlnet::submodule(py)?)?;
    Ok(())
}
