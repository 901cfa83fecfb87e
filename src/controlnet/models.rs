//! 模型名过滤

use lazy_static::lazy_static;
use regex::Regex;

/// 关键字 -> 默认预处理模块
///
/// 顺序即关键字优先级, 同时用于拼接备选正则
const CN_MODEL_MODULES: [(&str, &str); 6] = [
    ("inpaint", "inpaint_global_harmonious"),
    ("scribble", "t2ia_sketch_pidi"),
    ("lineart", "lineart_coarse"),
    ("openpose", "openpose_full"),
    ("tile", "tile_resample"),
    ("depth", "depth_midas"),
];

lazy_static! {
    static ref CN_MODEL_REGEX: Regex = {
        let pattern = CN_MODEL_MODULES
            .iter()
            .map(|(keyword, _)| *keyword)
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&pattern).expect("valid keyword alternation")
    };
}

/// 保留包含任一领域关键字的模型名, 顺序不变
pub fn filter_model_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .filter(|name| CN_MODEL_REGEX.is_match(name))
        .collect()
}

/// 按模型名中出现的关键字给出默认预处理模块
pub fn default_module_for(model: &str) -> Option<&'static str> {
    CN_MODEL_MODULES
        .iter()
        .find(|(keyword, _)| model.contains(keyword))
        .map(|(_, module)| *module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_only_keyword_matches_in_order() {
        let names = vec![
            "control_v11p_sd15_inpaint [ebff9138]".to_string(),
            "control_v11p_sd15_canny [d14c016b]".to_string(),
            "control_v11f1p_sd15_depth [cfd03158]".to_string(),
            "control_v11p_sd15_openpose [cab727d4]".to_string(),
            "control_v11e_sd15_ip2p [c4bb465c]".to_string(),
        ];

        let filtered = filter_model_names(names);
        assert_eq!(
            filtered,
            vec![
                "control_v11p_sd15_inpaint [ebff9138]".to_string(),
                "control_v11f1p_sd15_depth [cfd03158]".to_string(),
                "control_v11p_sd15_openpose [cab727d4]".to_string(),
            ]
        );
    }

    #[test]
    fn test_filter_empty_input() {
        assert!(filter_model_names(Vec::new()).is_empty());
    }

    #[test]
    fn test_default_module_lookup() {
        assert_eq!(
            default_module_for("control_v11f1e_sd15_tile"),
            Some("tile_resample")
        );
        assert_eq!(
            default_module_for("control_v11p_sd15_scribble"),
            Some("t2ia_sketch_pidi")
        );
        assert_eq!(default_module_for("control_v11p_sd15_canny"), None);
    }
}
