//! 脚本管线

use log::info;

use crate::error::Error;

/// 参数块在扁平参数缓冲区中的位置
///
/// `from..to` 必须正好覆盖注入的参数块, 否则宿主解包时会错位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpan {
    pub from: usize,
    pub to: usize,
}

/// 常驻脚本管线的能力接口
///
/// 宿主请求对象需要提供: 有序脚本表 + 带偏移记录的扁平参数缓冲区
pub trait ScriptPipeline {
    /// 单个脚本的参数块类型
    type Args;

    /// 请求对象是否携带可写的参数缓冲区
    ///
    /// 旧版 webui 没有 `script_args_value` 字段, 注入前先做类型化探测,
    /// 而不是事后按异常文本分类
    fn supports_script_args(&self) -> bool;

    /// 脚本表中所有脚本的标题, 顺序与宿主注册顺序一致
    fn script_titles(&self) -> Result<Vec<String>, Error>;

    /// 清空常驻脚本表与参数缓冲区, 挂上第 `index` 个脚本的浅拷贝,
    /// 其偏移记录必须正好覆盖 `args`
    fn install_single_script(&mut self, index: usize, args: Self::Args)
        -> Result<ArgSpan, Error>;
}

/// 按标题查找脚本, 返回脚本表下标
pub fn find_script(titles: &[String], title: &str) -> Result<usize, Error> {
    titles
        .iter()
        .position(|t| t == title)
        .ok_or_else(|| Error::ScriptNotFound(title.to_string()))
}

/// 把单个脚本及其参数块注入请求
///
/// 能力探测与脚本查找都在任何修改之前完成, 失败时请求对象保持原样
pub fn inject_script<P: ScriptPipeline>(
    pipeline: &mut P,
    title: &str,
    args: P::Args,
) -> Result<ArgSpan, Error> {
    if !pipeline.supports_script_args() {
        return Err(Error::UnsupportedWebui);
    }

    let index = find_script(&pipeline.script_titles()?, title)?;
    let span = pipeline.install_single_script(index, args)?;

    info!(
        "Added script: {} at positions {}-{}",
        title, span.from, span.to
    );
    Ok(span)
}
