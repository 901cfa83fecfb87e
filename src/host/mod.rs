//! 宿主能力接口
//!
//! webui 的请求对象与全局选项都是鸭子类型, 这里收敛为显式的
//! 能力接口, python 适配层与测试共用同一套核心逻辑

mod options;
mod pipeline;

pub use options::{FlagOverride, OptionStore};
pub use pipeline::{find_script, inject_script, ArgSpan, ScriptPipeline};
