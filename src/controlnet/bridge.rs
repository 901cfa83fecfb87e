//! ControlNet 桥接对象

use log::{info, warn};
use pyo3::{pyclass, pymethods, types::PyAnyMethods, Bound, PyAny, PyResult, Python};

use crate::{
    controlnet::{default_module_for, filter_model_names, ControlNetUnit},
    error::Error,
    host::inject_script,
    wrapper::{
        controlnet::{
            all_model_names, build_unit_object, conditioning_image_pair, is_extension_active,
            pixel_perfect_resolution,
        },
        webui::WebuiRequest,
    },
};

/// 宿主脚本表里 ControlNet 脚本的标题
const CONTROLNET_SCRIPT_TITLE: &str = "ControlNet";

/// Adetailer 与 ControlNet 扩展之间的桥
///
/// 可用性状态放在对象上, 由调用方显式传递, 不用模块级全局量
#[pyclass(subclass)]
pub struct ControlNetBridge {
    /// ControlNet 扩展是否安装且激活, 构造时探测一次
    controlnet_exists: bool,
    /// 调用方是否已确认初始化, init_controlnet 之前注入是空操作
    cn_available: bool,
}

#[pymethods]
impl ControlNetBridge {
    #[new]
    fn new(py: Python<'_>) -> Self {
        // 初始化全局日志
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .try_init();

        let controlnet_exists = is_extension_active(py);
        if !controlnet_exists {
            info!("controlnet extension not found, bridge stays inactive");
        }
        Self {
            controlnet_exists,
            cn_available: false,
        }
    }

    #[getter]
    fn cn_available(&self) -> bool {
        self.cn_available
    }

    /// 幂等, 无失败路径
    fn init_controlnet(&mut self) {
        self.cn_available = true;
    }

    /// 注册表里匹配领域关键字的模型名, 注册表不可达时退化为空表
    fn get_cn_models(&self, py: Python<'_>) -> Vec<String> {
        if !self.controlnet_exists {
            return Vec::new();
        }
        match all_model_names(py) {
            Ok(names) => filter_model_names(names),
            Err(e) => {
                warn!("controlnet registry unreachable: {e}");
                Vec::new()
            }
        }
    }

    /// 构造单次使用的 ControlNetUnit 并注入请求的常驻脚本管线
    ///
    /// 对 `p` 的就地修改是唯一副作用; 不可用或 model == "None" 时
    /// 完全不碰 `p`
    #[pyo3(signature = (p, model, module=None, weight=1.0, guidance_start=0.0, guidance_end=1.0))]
    fn get_controlnet_script_args(
        &self,
        p: &Bound<'_, PyAny>,
        model: &str,
        module: Option<&str>,
        weight: f64,
        guidance_start: f64,
        guidance_end: f64,
    ) -> PyResult<()> {
        if !self.cn_available || model == "None" {
            return Ok(());
        }
        self.inject(p, model, module, weight, guidance_start, guidance_end)
            .map_err(Into::into)
    }
}

impl ControlNetBridge {
    fn inject(
        &self,
        p: &Bound<'_, PyAny>,
        model: &str,
        module: Option<&str>,
        weight: f64,
        guidance_start: f64,
        guidance_end: f64,
    ) -> Result<(), Error> {
        let py = p.py();
        let mut request = WebuiRequest::new(p.clone());

        let init_image = request.init_image()?;
        let image_pair = conditioning_image_pair(py, &init_image)?;
        let image = image_pair
            .as_any()
            .get_item("image")?;

        let resolution = pixel_perfect_resolution(
            py,
            &image,
            request.height()?,
            request.width()?,
            request.resize_mode()?,
        )?;

        let module = module.or_else(|| default_module_for(model));
        let unit = ControlNetUnit::new(
            model,
            module,
            weight,
            guidance_start,
            guidance_end,
            resolution,
        )?;
        let unit_obj = build_unit_object(py, &unit, &image_pair)?;

        inject_script(&mut request, CONTROLNET_SCRIPT_TITLE, vec![unit_obj])?;
        Ok(())
    }
}
