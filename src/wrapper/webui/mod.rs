//! webui 宿主包装
//!
//! 依赖:
//! - python: modules.scripts, modules.shared, modules.extensions

mod processing;
mod shared;

pub use processing::WebuiRequest;
pub use shared::{ScriptControlScope, WebuiOpts, ALLOW_SCRIPT_CONTROL_KEY};
