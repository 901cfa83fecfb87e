//! ControlNet 桥接
//!
//! 检测 ControlNet 扩展是否可用, 过滤模型名, 构造单次使用的
//! ControlNetUnit 并注入到宿主的常驻脚本管线

use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

mod bridge;
mod models;
mod resize_mode;
mod unit;

pub use bridge::ControlNetBridge;
pub use models::{default_module_for, filter_model_names};
pub use resize_mode::ResizeMode;
pub use unit::{full_on_mask, ControlNetUnit};

/// ControlNet 模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "controlnet")?;
    submodule.add_class::<ControlNetBridge>()?;
    Ok(submodule)
}
