// python 包装
pub mod controlnet;
pub mod webui;
