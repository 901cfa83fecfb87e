//! ControlNetUnit 配置记录

use numpy::ndarray::{ArrayD, IxDyn};
use serde::Serialize;

use crate::error::Error;

/// 与输入图同形状的全开掩码, 整块区域都参与条件控制
pub fn full_on_mask(shape: &[usize]) -> ArrayD<u8> {
    ArrayD::from_elem(IxDyn(shape), 255)
}

/// 单次使用的 ControlNet 单元配置
///
/// 经 pythonize 转成 kwargs 后交给 ControlNet 的 python 构造器,
/// 图像对 (image + mask) 单独挂载, 不参与序列化
#[derive(Debug, Clone, Serialize)]
pub struct ControlNetUnit {
    pub enabled: bool,
    pub model: String,
    pub module: Option<String>,
    pub weight: f64,
    pub guidance_start: f64,
    pub guidance_end: f64,
    pub processor_res: u32,
}

impl ControlNetUnit {
    pub fn new(
        model: &str,
        module: Option<&str>,
        weight: f64,
        guidance_start: f64,
        guidance_end: f64,
        processor_res: u32,
    ) -> Result<Self, Error> {
        let unit = Self {
            enabled: true,
            model: model.to_string(),
            module: module.map(|m| m.to_string()),
            weight,
            guidance_start,
            guidance_end,
            processor_res,
        };
        unit.validate()?;
        Ok(unit)
    }

    /// 权重与引导区间都是扩散过程的比例值
    fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.guidance_start)
            || !(0.0..=1.0).contains(&self.guidance_end)
        {
            return Err(Error::InvalidParameter(format!(
                "guidance range must lie in [0, 1], got {}-{}",
                self.guidance_start, self.guidance_end
            )));
        }
        if self.guidance_start > self.guidance_end {
            return Err(Error::InvalidParameter(format!(
                "guidance start {} exceeds guidance end {}",
                self.guidance_start, self.guidance_end
            )));
        }
        if self.weight < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "weight must be non-negative, got {}",
                self.weight
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_is_enabled_and_keeps_fields() -> anyhow::Result<()> {
        let unit = ControlNetUnit::new("depth", Some("depth_midas"), 1.0, 0.0, 1.0, 512)?;
        assert!(unit.enabled);
        assert_eq!(unit.model, "depth");
        assert_eq!(unit.module.as_deref(), Some("depth_midas"));
        assert_eq!(unit.processor_res, 512);
        Ok(())
    }

    #[test]
    fn test_guidance_out_of_range_rejected() {
        assert!(ControlNetUnit::new("depth", None, 1.0, -0.1, 1.0, 512).is_err());
        assert!(ControlNetUnit::new("depth", None, 1.0, 0.0, 1.5, 512).is_err());
        assert!(ControlNetUnit::new("depth", None, 1.0, 0.8, 0.2, 512).is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        assert!(ControlNetUnit::new("depth", None, -1.0, 0.0, 1.0, 512).is_err());
    }

    #[test]
    fn test_full_on_mask_matches_image_shape() {
        let mask = full_on_mask(&[64, 64, 3]);
        assert_eq!(mask.shape(), &[64, 64, 3]);
        assert!(mask.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_serializes_to_kwargs_shape() -> anyhow::Result<()> {
        let unit = ControlNetUnit::new("tile", None, 0.5, 0.0, 0.9, 768)?;
        let json = serde_json::to_value(&unit)?;
        assert_eq!(json["enabled"], true);
        assert_eq!(json["model"], "tile");
        assert_eq!(json["module"], serde_json::Value::Null);
        assert_eq!(json["processor_res"], 768);
        Ok(())
    }
}
