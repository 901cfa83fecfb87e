//! 处理请求包装
//!
//! 把 StableDiffusionProcessing 对象适配成 ScriptPipeline 能力接口

use pyo3::{
    types::{PyAnyMethods, PyList, PyListMethods, PyModule},
    Bound, PyAny,
};

use crate::{
    controlnet::ResizeMode,
    error::Error,
    host::{ArgSpan, ScriptPipeline},
};

/// 一次生成请求, 宿主独占所有权, 注入是一次性副作用
pub struct WebuiRequest<'py> {
    inner: Bound<'py, PyAny>,
}

impl<'py> WebuiRequest<'py> {
    pub fn new(inner: Bound<'py, PyAny>) -> Self {
        Self { inner }
    }

    /// 首张输入图, 注入的条件图像由它派生
    pub fn init_image(&self) -> Result<Bound<'py, PyAny>, Error> {
        let images = self
            .inner
            .getattr("init_images")
            .map_err(|_| Error::NoInitImage)?;
        images.get_item(0).map_err(|_| Error::NoInitImage)
    }

    pub fn height(&self) -> Result<u32, Error> {
        Ok(self.inner.getattr("height")?.extract::<u32>()?)
    }

    pub fn width(&self) -> Result<u32, Error> {
        Ok(self.inner.getattr("width")?.extract::<u32>()?)
    }

    pub fn resize_mode(&self) -> Result<ResizeMode, Error> {
        let value = self.inner.getattr("resize_mode")?.extract::<i64>()?;
        ResizeMode::from_host_value(value)
    }

    /// img2img 全局脚本表, 注入时浅拷贝后挂到请求上
    fn global_runner(&self) -> Result<Bound<'py, PyAny>, Error> {
        let scripts = PyModule::import(self.inner.py(), "modules.scripts")?;
        Ok(scripts.getattr("scripts_img2img")?)
    }

    fn shallow_copy(&self, obj: &Bound<'py, PyAny>) -> Result<Bound<'py, PyAny>, Error> {
        let copy = PyModule::import(self.inner.py(), "copy")?;
        Ok(copy.getattr("copy")?.call1((obj,))?)
    }
}

impl<'py> ScriptPipeline for WebuiRequest<'py> {
    type Args = Vec<Bound<'py, PyAny>>;

    fn supports_script_args(&self) -> bool {
        // webui < 1.6.0 的请求对象没有这个字段
        self.inner.hasattr("script_args_value").unwrap_or(false)
    }

    fn script_titles(&self) -> Result<Vec<String>, Error> {
        let mut titles = Vec::new();
        for script in self.global_runner()?.getattr("scripts")?.try_iter()? {
            titles.push(script?.getattr("title")?.call0()?.extract::<String>()?);
        }
        Ok(titles)
    }

    fn install_single_script(
        &mut self,
        index: usize,
        args: Self::Args,
    ) -> Result<ArgSpan, Error> {
        let py = self.inner.py();

        let runner = self.shallow_copy(&self.global_runner()?)?;
        runner.setattr("alwayson_scripts", PyList::empty(py))?;
        self.inner.setattr("scripts", &runner)?;
        self.inner.setattr("script_args_value", PyList::empty(py))?;

        let script = self.shallow_copy(&runner.getattr("scripts")?.get_item(index)?)?;

        let script_args = self
            .inner
            .getattr("script_args_value")?
            .downcast_into::<PyList>()
            .map_err(|e| Error::PyDowncastError(e.to_string()))?;

        let span = ArgSpan {
            from: script_args.len(),
            to: script_args.len() + args.len(),
        };
        script.setattr("args_from", span.from)?;
        script.setattr("args_to", span.to)?;

        runner
            .getattr("alwayson_scripts")?
            .downcast_into::<PyList>()
            .map_err(|e| Error::PyDowncastError(e.to_string()))?
            .append(&script)?;
        for arg in args {
            script_args.append(arg)?;
        }

        Ok(span)
    }
}
