//! ControlNet 扩展包装
//!
//! 依赖:
//! - python: lib_controlnet (sd-forge 内置 ControlNet)

use log::warn;
use numpy::{IntoPyArray, PyArrayDyn, PyUntypedArrayMethods};
use pyo3::{
    types::{PyAnyMethods, PyDict, PyDictMethods, PyModule},
    Bound, PyAny, Python,
};
use pythonize::pythonize;

use crate::{
    controlnet::{ControlNetUnit, ResizeMode},
    error::Error,
};

/// ControlNet 扩展是否在宿主中激活
///
/// 先扫描扩展注册表, 再退回到直接导入 lib_controlnet;
/// 任何 python 侧错误都按 "不可用" 处理, 不向上传播
pub fn is_extension_active(py: Python<'_>) -> bool {
    match probe_extension(py) {
        Ok(active) => active,
        Err(e) => {
            warn!("controlnet probe failed: {e}");
            false
        }
    }
}

fn probe_extension(py: Python<'_>) -> Result<bool, Error> {
    let extensions = PyModule::import(py, "modules.extensions")?;
    for extension in extensions.getattr("active")?.call0()?.try_iter()? {
        let extension = extension?;
        if !extension.getattr("enabled")?.extract::<bool>()? {
            continue;
        }
        let name = extension.getattr("name")?.extract::<String>()?;
        if name.to_lowercase().contains("controlnet") {
            return Ok(true);
        }
    }
    // 内置版不一定出现在注册表里
    Ok(PyModule::import(py, "lib_controlnet").is_ok())
}

/// ControlNet 注册表中的全部模型名
pub fn all_model_names(py: Python<'_>) -> Result<Vec<String>, Error> {
    let global_state = PyModule::import(py, "lib_controlnet.global_state")?;
    let names = global_state
        .getattr("get_all_controlnet_names")?
        .call0()?
        .extract::<Vec<String>>()?;
    Ok(names)
}

/// 由首张输入图构造条件图像对: 原图 + 同形状全 255 掩码
pub fn conditioning_image_pair<'py>(
    py: Python<'py>,
    init_image: &Bound<'py, PyAny>,
) -> Result<Bound<'py, PyDict>, Error> {
    let numpy = PyModule::import(py, "numpy")?;
    let image = numpy.getattr("asarray")?.call1((init_image,))?;
    let array = image
        .downcast::<PyArrayDyn<u8>>()
        .map_err(|e| Error::PyDowncastError(e.to_string()))?;

    let mask = crate::controlnet::full_on_mask(array.shape()).into_pyarray(py);

    let pair = PyDict::new(py);
    pair.set_item("image", &image)?;
    pair.set_item("mask", mask)?;
    Ok(pair)
}

/// ControlNet 自带的像素完美分辨率启发式
pub fn pixel_perfect_resolution(
    py: Python<'_>,
    image: &Bound<'_, PyAny>,
    target_h: u32,
    target_w: u32,
    resize_mode: ResizeMode,
) -> Result<u32, Error> {
    let external_code = PyModule::import(py, "lib_controlnet.external_code")?;
    let resize_mode = external_code
        .getattr("resize_mode_from_value")?
        .call1((resize_mode.to_string(),))?;

    let kwargs = PyDict::new(py);
    kwargs.set_item("target_H", target_h)?;
    kwargs.set_item("target_W", target_w)?;
    kwargs.set_item("resize_mode", resize_mode)?;

    let resolution = external_code
        .getattr("pixel_perfect_resolution")?
        .call((image,), Some(&kwargs))?
        .extract::<u32>()?;
    Ok(resolution)
}

/// 把 Rust 侧的单元配置变成 ControlNet 的 python 对象
pub fn build_unit_object<'py>(
    py: Python<'py>,
    unit: &ControlNetUnit,
    image_pair: &Bound<'py, PyDict>,
) -> Result<Bound<'py, PyAny>, Error> {
    let kwargs = pythonize(py, unit)?;
    let kwargs = kwargs
        .downcast::<PyDict>()
        .map_err(|e| Error::PyDowncastError(e.to_string()))?;
    kwargs.set_item("image", image_pair)?;

    let external_code = PyModule::import(py, "lib_controlnet.external_code")?;
    let unit_cls = external_code.getattr("ControlNetUnit")?;
    Ok(unit_cls.call((), Some(kwargs))?)
}
